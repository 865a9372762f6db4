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

use super::*;
use crate::task::config::ConfigBuilder;
use crate::utils::form_item::FileSpec;

fn download_task(task_id: u32) -> RequestTask {
    let mut config = ConfigBuilder::new()
        .url("https://www.example.com/data.bin")
        .action(Action::Download)
        .saveas("/data/storage/data.bin")
        .build();
    config.common_data.task_id = task_id;
    RequestTask::new(config)
}

fn upload_task(task_id: u32, files: usize) -> RequestTask {
    let mut builder = ConfigBuilder::new();
    builder
        .url("https://www.example.com/upload")
        .action(Action::Upload);
    for i in 0..files {
        builder.file_spec(FileSpec::new(&format!("/data/files/part{}.bin", i)));
    }
    let mut config = builder.build();
    config.common_data.task_id = task_id;
    RequestTask::new(config)
}

// @tc.name: ut_transition_allowed
// @tc.desc: Test the lifecycle transition table
// @tc.precon: NA
// @tc.step: 1. Check legal transitions from each state
//           2. Check illegal transitions
// @tc.expect: Start, pause, resume, retry, stop and remove moves are legal,
// everything else is rejected
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_transition_allowed() {
    assert!(transition_allowed(State::Initialized, State::Running));
    assert!(transition_allowed(State::Running, State::Paused));
    assert!(transition_allowed(State::Paused, State::Running));
    assert!(transition_allowed(State::Running, State::Retrying));
    assert!(transition_allowed(State::Retrying, State::Running));
    assert!(transition_allowed(State::Running, State::Completed));
    assert!(transition_allowed(State::Retrying, State::Failed));
    assert!(transition_allowed(State::Initialized, State::Stopped));
    assert!(transition_allowed(State::Running, State::Stopped));
    assert!(transition_allowed(State::Completed, State::Removed));
    assert!(transition_allowed(State::Failed, State::Removed));
    assert!(transition_allowed(State::Stopped, State::Removed));

    assert!(!transition_allowed(State::Initialized, State::Completed));
    assert!(!transition_allowed(State::Paused, State::Completed));
    assert!(!transition_allowed(State::Completed, State::Running));
    assert!(!transition_allowed(State::Completed, State::Stopped));
    assert!(!transition_allowed(State::Running, State::Removed));
    assert!(!transition_allowed(State::Removed, State::Stopped));
    assert!(!transition_allowed(State::Running, State::Running));
}

// @tc.name: ut_task_new
// @tc.desc: Test fresh task construction
// @tc.precon: NA
// @tc.step: 1. Create a download task and a two-file upload task
// @tc.expect: Both start Initialized with unknown sizes, one slot per file
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_task_new() {
    let download = download_task(1);
    assert_eq!(download.state(), State::Initialized);
    assert_eq!(download.progress.sizes, vec![-1]);
    assert_eq!(download.tries, 0);

    let upload = upload_task(2, 2);
    assert_eq!(upload.progress.sizes, vec![-1, -1]);
    assert_eq!(upload.progress.processed, vec![0, 0]);
}

// @tc.name: ut_task_change_status
// @tc.desc: Test state changes through the transition guard
// @tc.precon: NA
// @tc.step: 1. Apply a legal transition
//           2. Apply an illegal transition
// @tc.expect: The legal move updates state, reason and the progress mirror;
// the illegal move returns false and changes nothing
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_task_change_status() {
    let mut task = download_task(1);
    assert!(task.change_status(State::Running, Reason::Default));
    assert_eq!(task.state(), State::Running);
    assert_eq!(task.progress.common_data.state, State::Running as u8);

    assert!(!task.change_status(State::Removed, Reason::UserOperation));
    assert_eq!(task.state(), State::Running);

    assert!(task.change_status(State::Stopped, Reason::UserOperation));
    assert_eq!(task.status.reason, Reason::UserOperation);
}

// @tc.name: ut_task_record_progress
// @tc.desc: Test that progress never moves backwards
// @tc.precon: NA
// @tc.step: 1. Record advancing byte counts
//           2. Record a stale lower report
//           3. Record an out-of-range file index
// @tc.expect: Counters only grow and the out-of-range report is dropped
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_task_record_progress() {
    let mut task = download_task(1);
    task.record_progress(0, 100, 100);
    assert_eq!(task.progress.processed[0], 100);
    assert_eq!(task.progress.common_data.total_processed, 100);

    task.record_progress(0, 40, 40);
    assert_eq!(task.progress.processed[0], 100);
    assert_eq!(task.progress.common_data.total_processed, 100);

    task.record_progress(5, 900, 900);
    assert_eq!(task.progress.processed.len(), 1);
    assert_eq!(task.progress.processed[0], 100);
}

// @tc.name: ut_task_pending_files
// @tc.desc: Test pending file detection for removal gating
// @tc.precon: NA
// @tc.step: 1. Check a download task
//           2. Check an upload task before and after its history fills
// @tc.expect: Only the upload with missing history entries reports pending
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_task_pending_files() {
    let download = download_task(1);
    assert!(!download.has_pending_files());

    let mut upload = upload_task(2, 2);
    assert!(upload.has_pending_files());
    upload.record_task_state(TaskState {
        path: "/data/files/part0.bin".to_string(),
        response_code: 200,
        message: "OK".to_string(),
    });
    assert!(upload.has_pending_files());
    upload.record_task_state(TaskState {
        path: "/data/files/part1.bin".to_string(),
        response_code: 500,
        message: "Internal Server Error".to_string(),
    });
    assert!(!upload.has_pending_files());
}

// @tc.name: ut_task_info_round_trip
// @tc.desc: Test snapshot and restore of a task
// @tc.precon: NA
// @tc.step: 1. Advance a task and snapshot it
//           2. Rebuild a task from the snapshot
// @tc.expect: State, reason, tries, progress and history survive the rebuild
// and faults classify the recorded reason
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_task_info_round_trip() {
    let mut task = download_task(7);
    task.change_status(State::Running, Reason::Default);
    task.record_progress(0, 64, 64);
    task.tries = 2;
    task.change_status(State::Failed, Reason::NetworkOffline);

    let info = task.info();
    assert_eq!(info.common_data.task_id, 7);
    assert_eq!(info.state(), State::Failed);
    assert_eq!(info.common_data.reason, Reason::NetworkOffline as u8);
    assert_eq!(info.common_data.faults, Faults::Disconnected as u8);
    assert_eq!(info.common_data.tries, 2);

    let restored = RequestTask::new_by_info(task.conf.clone(), info);
    assert_eq!(restored.state(), State::Failed);
    assert_eq!(restored.status.reason, Reason::NetworkOffline);
    assert_eq!(restored.tries, 2);
    assert_eq!(restored.progress.processed[0], 64);
}
