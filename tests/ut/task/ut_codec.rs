// Copyright (C) 2023 Huawei Device Co., Ltd.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde_json::json;

use super::*;
use crate::task::config::{Action, ConfigBuilder, Mode, NetworkConfig, Version};
use crate::task::info::State;

// @tc.name: ut_codec_config_round_trip
// @tc.desc: Test that an encoded config decodes back to the same values
// @tc.precon: NA
// @tc.step: 1. Build an upload config with headers, forms and files
//           2. Encode it and decode the result
// @tc.expect: Every field of the decoded config equals the original
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_codec_config_round_trip() {
    let mut config = ConfigBuilder::new()
        .url("https://www.example.com/upload")
        .version(Version::API9)
        .action(Action::Upload)
        .mode(Mode::FrontEnd)
        .method("POST")
        .title("report")
        .file_spec(FileSpec::new("/data/files/report.txt"))
        .form_item(FormItem {
            name: "comment".to_string(),
            value: "quarterly".to_string(),
        })
        .network(NetworkConfig::Wifi)
        .retry(true)
        .begins(16)
        .ends(4096)
        .build();
    config.headers.insert("accept".to_string(), "*/*".to_string());
    config.extras.insert("origin".to_string(), "settings".to_string());

    let decoded = TaskConfig::from_json(&config.to_json());
    assert_eq!(decoded.url, config.url);
    assert_eq!(decoded.version, config.version);
    assert_eq!(decoded.method, config.method);
    assert_eq!(decoded.title, config.title);
    assert_eq!(decoded.headers, config.headers);
    assert_eq!(decoded.extras, config.extras);
    assert_eq!(decoded.form_items, config.form_items);
    assert_eq!(decoded.file_specs, config.file_specs);
    assert_eq!(decoded.common_data.action, Action::Upload);
    assert_eq!(decoded.common_data.mode, Mode::FrontEnd);
    assert_eq!(decoded.common_data.network, NetworkConfig::Wifi);
    assert!(decoded.common_data.retry);
    assert_eq!(decoded.common_data.begins, 16);
    assert_eq!(decoded.common_data.ends, 4096);
}

// @tc.name: ut_codec_config_tolerant_decode
// @tc.desc: Test that missing and mistyped fields keep their defaults
// @tc.precon: NA
// @tc.step: 1. Decode a document with a mistyped action, a mistyped url, an
//              unknown key and one valid field
// @tc.expect: Mistyped fields keep defaults, unknown keys are ignored, the
// valid field is applied
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_codec_config_tolerant_decode() {
    let document = json!({
        "action": "download",
        "url": 42,
        "begins": 7,
        "somethingElse": true,
    });
    let config = TaskConfig::from_json(&document);
    assert_eq!(config.common_data.action, Action::Download);
    assert!(config.url.is_empty());
    assert_eq!(config.common_data.begins, 7);
    assert_eq!(config.common_data.ends, -1);
}

// @tc.name: ut_codec_config_full_encode
// @tc.desc: Test that encoding always emits the complete field set
// @tc.precon: NA
// @tc.step: 1. Encode a default config
//           2. Check the presence of every wire key
// @tc.expect: All keys are present, empty collections encode as empty
// containers rather than being omitted
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_codec_config_full_encode() {
    let encoded = TaskConfig::default().to_json();
    for key in [
        "action", "url", "version", "mode", "network", "index", "begins", "ends", "priority",
        "overwrite", "metered", "roaming", "retry", "redirect", "gauge", "precise", "background",
        "title", "saveas", "proxy", "method", "token", "description", "data", "headers", "froms",
        "files", "extras",
    ] {
        assert!(encoded.get(key).is_some(), "missing key {}", key);
    }
    assert!(encoded["froms"].as_array().unwrap().is_empty());
    assert!(encoded["files"].as_array().unwrap().is_empty());
    assert!(encoded["headers"].as_object().unwrap().is_empty());
}

// @tc.name: ut_codec_progress_round_trip
// @tc.desc: Test progress snapshot encoding and decoding
// @tc.precon: NA
// @tc.step: 1. Build an advanced snapshot with extras
//           2. Encode it and decode the result
// @tc.expect: State, index, byte counters, sizes and extras round-trip
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_codec_progress_round_trip() {
    let mut progress = Progress::new(vec![512, -1]);
    progress.common_data.state = State::Running as u8;
    progress.common_data.index = 1;
    progress.common_data.total_processed = 600;
    progress.processed = vec![512, 88];
    progress
        .extras
        .insert("etag".to_string(), "abc123".to_string());

    let decoded = Progress::from_json(&progress.to_json());
    assert_eq!(decoded.common_data.state, State::Running as u8);
    assert_eq!(decoded.common_data.index, 1);
    assert_eq!(decoded.common_data.total_processed, 600);
    assert_eq!(decoded.sizes, vec![512, -1]);
    assert_eq!(decoded.processed, vec![512, 88]);
    assert_eq!(decoded.extras.get("etag").unwrap(), "abc123");
}

// @tc.name: ut_codec_task_state
// @tc.desc: Test history entry encoding and tolerant decoding
// @tc.precon: NA
// @tc.step: 1. Round-trip a full entry
//           2. Decode an entry with a mistyped response code
// @tc.expect: The full entry round-trips, the mistyped code keeps zero
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_codec_task_state() {
    let state = TaskState {
        path: "/data/files/report.txt".to_string(),
        response_code: 201,
        message: "Created".to_string(),
    };
    assert_eq!(TaskState::from_json(&state.to_json()), state);

    let partial = TaskState::from_json(&json!({
        "path": "/data/files/report.txt",
        "responseCode": "oops",
    }));
    assert_eq!(partial.path, "/data/files/report.txt");
    assert_eq!(partial.response_code, 0);
    assert!(partial.message.is_empty());
}

// @tc.name: ut_codec_file_spec_keys
// @tc.desc: Test file spec wire keys
// @tc.precon: NA
// @tc.step: 1. Encode a file spec
//           2. Decode the encoded document
// @tc.expect: The wire uses filename and mimeType keys and values round-trip
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_codec_file_spec_keys() {
    let spec = FileSpec::new("/data/files/report.txt");
    let encoded = spec.to_json();
    assert!(encoded.get("filename").is_some());
    assert!(encoded.get("mimeType").is_some());
    assert_eq!(FileSpec::from_json(&encoded), spec);
}

// @tc.name: ut_codec_info_round_trip
// @tc.desc: Test task information encoding and decoding
// @tc.precon: NA
// @tc.step: 1. Build an info snapshot with id, progress and history
//           2. Encode it and decode the result
// @tc.expect: The id travels as a string and every field round-trips
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_codec_info_round_trip() {
    let mut info = TaskInfo::new();
    info.common_data.task_id = 17;
    info.common_data.version = 2;
    info.common_data.tries = 1;
    info.url = "https://www.example.com/data.bin".to_string();
    info.mime_type = "application/octet-stream".to_string();
    info.progress.common_data.total_processed = 64;
    info.form_items.push(FormItem {
        name: "part".to_string(),
        value: "0".to_string(),
    });
    info.task_states.push(TaskState {
        path: "/data/storage/data.bin".to_string(),
        response_code: 206,
        message: "Partial Content".to_string(),
    });

    let encoded = info.to_json();
    assert_eq!(encoded["tid"], json!("17"));
    assert_eq!(encoded["froms"].as_array().unwrap().len(), 1);

    let decoded = TaskInfo::from_json(&encoded);
    assert_eq!(decoded.common_data.task_id, 17);
    assert_eq!(decoded.common_data.version, 2);
    assert_eq!(decoded.common_data.tries, 1);
    assert_eq!(decoded.url, info.url);
    assert_eq!(decoded.mime_type, info.mime_type);
    assert_eq!(decoded.progress.common_data.total_processed, 64);
    assert_eq!(decoded.form_items, info.form_items);
    assert_eq!(decoded.task_states.len(), 1);
    assert_eq!(decoded.task_states[0].response_code, 206);
}
