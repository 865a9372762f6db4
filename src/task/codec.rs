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

//! JSON wire codec for task entities.
//!
//! Decoding is deliberately tolerant: a field is only read when it is present
//! and carries the expected JSON type, anything else keeps the struct's
//! default value, and unknown keys are ignored. Encoding always emits the
//! complete fixed field set in stable key order, with empty collections
//! encoded as empty arrays or objects. The asymmetry lets old records decode
//! after the schema gains fields.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use super::config::TaskConfig;
use super::info::TaskInfo;
use super::notify::{Progress, TaskState};
use crate::utils::form_item::{FileSpec, FormItem};

pub(crate) fn opt_string(json: &Value, key: &str) -> Option<String> {
    json.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn opt_u64(json: &Value, key: &str) -> Option<u64> {
    json.get(key).and_then(Value::as_u64)
}

pub(crate) fn opt_i64(json: &Value, key: &str) -> Option<i64> {
    json.get(key).and_then(Value::as_i64)
}

pub(crate) fn opt_bool(json: &Value, key: &str) -> Option<bool> {
    json.get(key).and_then(Value::as_bool)
}

pub(crate) fn opt_array<'a>(json: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    json.get(key).and_then(Value::as_array)
}

pub(crate) fn opt_map(json: &Value, key: &str) -> Option<HashMap<String, String>> {
    let object = json.get(key).and_then(Value::as_object)?;
    let mut map = HashMap::new();
    for (k, v) in object {
        if let Some(v) = v.as_str() {
            map.insert(k.clone(), v.to_string());
        }
    }
    Some(map)
}

fn map_to_json(map: &HashMap<String, String>) -> Value {
    let mut object = Map::new();
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    for key in keys {
        object.insert(key.clone(), Value::String(map[key].clone()));
    }
    Value::Object(object)
}

impl FormItem {
    /// Encodes the form item with its full field set.
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "value": self.value,
        })
    }

    /// Decodes a form item, keeping defaults for missing or mistyped fields.
    pub fn from_json(json: &Value) -> Self {
        let mut item = FormItem::default();
        if let Some(v) = opt_string(json, "name") {
            item.name = v;
        }
        if let Some(v) = opt_string(json, "value") {
            item.value = v;
        }
        item
    }
}

impl FileSpec {
    /// Encodes the file spec with its full field set.
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "path": self.path,
            "filename": self.file_name,
            "mimeType": self.mime_type,
        })
    }

    /// Decodes a file spec, keeping defaults for missing or mistyped fields.
    pub fn from_json(json: &Value) -> Self {
        let mut spec = FileSpec::default();
        if let Some(v) = opt_string(json, "name") {
            spec.name = v;
        }
        if let Some(v) = opt_string(json, "path") {
            spec.path = v;
        }
        if let Some(v) = opt_string(json, "filename") {
            spec.file_name = v;
        }
        if let Some(v) = opt_string(json, "mimeType") {
            spec.mime_type = v;
        }
        spec
    }
}

impl TaskState {
    /// Encodes the history entry with its full field set.
    pub fn to_json(&self) -> Value {
        json!({
            "path": self.path,
            "responseCode": self.response_code,
            "message": self.message,
        })
    }

    /// Decodes a history entry, keeping defaults for missing or mistyped
    /// fields.
    pub fn from_json(json: &Value) -> Self {
        let mut state = TaskState::default();
        if let Some(v) = opt_string(json, "path") {
            state.path = v;
        }
        if let Some(v) = opt_u64(json, "responseCode") {
            state.response_code = v as u32;
        }
        if let Some(v) = opt_string(json, "message") {
            state.message = v;
        }
        state
    }
}

impl Progress {
    /// Encodes the progress snapshot with its full field set.
    pub fn to_json(&self) -> Value {
        json!({
            "state": self.common_data.state,
            "index": self.common_data.index,
            "processed": self.processed,
            "totalProcessed": self.common_data.total_processed,
            "sizes": self.sizes,
            "extras": map_to_json(&self.extras),
        })
    }

    /// Decodes a progress snapshot, keeping defaults for missing or mistyped
    /// fields.
    pub fn from_json(json: &Value) -> Self {
        let mut progress = Progress::new(vec![]);
        if let Some(v) = opt_u64(json, "state") {
            progress.common_data.state = v as u8;
        }
        if let Some(v) = opt_u64(json, "index") {
            progress.common_data.index = v as usize;
        }
        if let Some(v) = opt_u64(json, "totalProcessed") {
            progress.common_data.total_processed = v;
        }
        if let Some(values) = opt_array(json, "sizes") {
            progress.sizes = values.iter().filter_map(Value::as_i64).collect();
        }
        if let Some(values) = opt_array(json, "processed") {
            progress.processed = values.iter().filter_map(Value::as_u64).collect();
        }
        if let Some(map) = opt_map(json, "extras") {
            progress.extras = map;
        }
        progress
    }
}

impl TaskConfig {
    /// Encodes the config with its full field set in stable key order.
    pub fn to_json(&self) -> Value {
        json!({
            "action": self.common_data.action as u8,
            "url": self.url,
            "version": self.version as u8,
            "mode": self.common_data.mode as u8,
            "network": self.common_data.network as u8,
            "index": self.common_data.index,
            "begins": self.common_data.begins,
            "ends": self.common_data.ends,
            "priority": self.common_data.priority,
            "overwrite": self.common_data.overwrite,
            "metered": self.common_data.metered,
            "roaming": self.common_data.roaming,
            "retry": self.common_data.retry,
            "redirect": self.common_data.redirect,
            "gauge": self.common_data.gauge,
            "precise": self.common_data.precise,
            "background": self.common_data.background,
            "title": self.title,
            "saveas": self.saveas,
            "proxy": self.proxy,
            "method": self.method,
            "token": self.token,
            "description": self.description,
            "data": self.data,
            "headers": map_to_json(&self.headers),
            // "froms" is the historical wire spelling; peers expect it.
            "froms": self.form_items.iter().map(FormItem::to_json).collect::<Vec<_>>(),
            "files": self.file_specs.iter().map(FileSpec::to_json).collect::<Vec<_>>(),
            "extras": map_to_json(&self.extras),
        })
    }

    /// Decodes a config, keeping defaults for missing or mistyped fields.
    pub fn from_json(json: &Value) -> Self {
        let mut config = TaskConfig::default();
        let common = &mut config.common_data;
        if let Some(v) = opt_u64(json, "action") {
            common.action = (v as u8).into();
        }
        if let Some(v) = opt_u64(json, "mode") {
            common.mode = (v as u8).into();
        }
        if let Some(v) = opt_u64(json, "network") {
            common.network = (v as u8).into();
        }
        if let Some(v) = opt_u64(json, "index") {
            common.index = v as u32;
        }
        if let Some(v) = opt_u64(json, "begins") {
            common.begins = v;
        }
        if let Some(v) = opt_i64(json, "ends") {
            common.ends = v;
        }
        if let Some(v) = opt_u64(json, "priority") {
            common.priority = v as u32;
        }
        if let Some(v) = opt_bool(json, "overwrite") {
            common.overwrite = v;
        }
        if let Some(v) = opt_bool(json, "metered") {
            common.metered = v;
        }
        if let Some(v) = opt_bool(json, "roaming") {
            common.roaming = v;
        }
        if let Some(v) = opt_bool(json, "retry") {
            common.retry = v;
        }
        if let Some(v) = opt_bool(json, "redirect") {
            common.redirect = v;
        }
        if let Some(v) = opt_bool(json, "gauge") {
            common.gauge = v;
        }
        if let Some(v) = opt_bool(json, "precise") {
            common.precise = v;
        }
        if let Some(v) = opt_bool(json, "background") {
            common.background = v;
        }
        if let Some(v) = opt_u64(json, "version") {
            config.version = (v as u8).into();
        }
        if let Some(v) = opt_string(json, "url") {
            config.url = v;
        }
        if let Some(v) = opt_string(json, "title") {
            config.title = v;
        }
        if let Some(v) = opt_string(json, "saveas") {
            config.saveas = v;
        }
        if let Some(v) = opt_string(json, "proxy") {
            config.proxy = v;
        }
        if let Some(v) = opt_string(json, "method") {
            config.method = v;
        }
        if let Some(v) = opt_string(json, "token") {
            config.token = v;
        }
        if let Some(v) = opt_string(json, "description") {
            config.description = v;
        }
        if let Some(v) = opt_string(json, "data") {
            config.data = v;
        }
        if let Some(map) = opt_map(json, "headers") {
            config.headers = map;
        }
        if let Some(values) = opt_array(json, "froms") {
            config.form_items = values.iter().map(FormItem::from_json).collect();
        }
        if let Some(values) = opt_array(json, "files") {
            config.file_specs = values.iter().map(FileSpec::from_json).collect();
        }
        if let Some(map) = opt_map(json, "extras") {
            config.extras = map;
        }
        config
    }
}

impl TaskInfo {
    /// Encodes the info snapshot with its full field set in stable key order.
    pub fn to_json(&self) -> Value {
        json!({
            "tid": self.common_data.task_id.to_string(),
            "version": self.common_data.version,
            "url": self.url,
            "data": self.data,
            "token": self.token,
            "files": self.file_specs.iter().map(FileSpec::to_json).collect::<Vec<_>>(),
            "froms": self.form_items.iter().map(FormItem::to_json).collect::<Vec<_>>(),
            "title": self.title,
            "description": self.description,
            "action": self.common_data.action,
            "mode": self.common_data.mode,
            "mimeType": self.mime_type,
            "progress": self.progress.to_json(),
            "gauge": self.common_data.gauge,
            "ctime": self.common_data.ctime,
            "mtime": self.common_data.mtime,
            "retry": self.common_data.retry,
            "tries": self.common_data.tries,
            "faults": self.common_data.faults,
            "reason": self.common_data.reason,
            "priority": self.common_data.priority,
            "extras": map_to_json(&self.extras),
            "taskStates": self.task_states.iter().map(TaskState::to_json).collect::<Vec<_>>(),
        })
    }

    /// Decodes an info snapshot, keeping defaults for missing or mistyped
    /// fields.
    pub fn from_json(json: &Value) -> Self {
        let mut info = TaskInfo::new();
        let common = &mut info.common_data;
        // `tid` travels as a string on the wire.
        if let Some(v) = opt_string(json, "tid") {
            if let Ok(tid) = v.parse::<u32>() {
                common.task_id = tid;
            }
        }
        if let Some(v) = opt_u64(json, "version") {
            common.version = v as u8;
        }
        if let Some(v) = opt_u64(json, "action") {
            common.action = v as u8;
        }
        if let Some(v) = opt_u64(json, "mode") {
            common.mode = v as u8;
        }
        if let Some(v) = opt_bool(json, "gauge") {
            common.gauge = v;
        }
        if let Some(v) = opt_u64(json, "ctime") {
            common.ctime = v;
        }
        if let Some(v) = opt_u64(json, "mtime") {
            common.mtime = v;
        }
        if let Some(v) = opt_bool(json, "retry") {
            common.retry = v;
        }
        if let Some(v) = opt_u64(json, "tries") {
            common.tries = v as u32;
        }
        if let Some(v) = opt_u64(json, "faults") {
            common.faults = v as u8;
        }
        if let Some(v) = opt_u64(json, "reason") {
            common.reason = v as u8;
        }
        if let Some(v) = opt_u64(json, "priority") {
            common.priority = v as u32;
        }
        if let Some(v) = opt_string(json, "url") {
            info.url = v;
        }
        if let Some(v) = opt_string(json, "data") {
            info.data = v;
        }
        if let Some(v) = opt_string(json, "token") {
            info.token = v;
        }
        if let Some(v) = opt_string(json, "title") {
            info.title = v;
        }
        if let Some(v) = opt_string(json, "description") {
            info.description = v;
        }
        if let Some(v) = opt_string(json, "mimeType") {
            info.mime_type = v;
        }
        if let Some(v) = json.get("progress").filter(|v| v.is_object()) {
            info.progress = Progress::from_json(v);
        }
        if let Some(values) = opt_array(json, "files") {
            info.file_specs = values.iter().map(FileSpec::from_json).collect();
        }
        if let Some(values) = opt_array(json, "froms") {
            info.form_items = values.iter().map(FormItem::from_json).collect();
        }
        if let Some(values) = opt_array(json, "taskStates") {
            info.task_states = values.iter().map(TaskState::from_json).collect();
        }
        if let Some(map) = opt_map(json, "extras") {
            info.extras = map;
        }
        info
    }
}
