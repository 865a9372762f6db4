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

use std::collections::HashMap;

use super::config::{Action, Version};
use super::info::State;

/// Categories of events that can be subscribed to for task notifications.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubscribeType {
    /// Task has completed successfully.
    Complete = 0,
    /// Task has failed to complete.
    Fail,
    /// Task progress has updated.
    Progress,
    /// Task has been paused.
    Pause,
    /// Task has been removed.
    Remove,
    /// Task has been resumed.
    Resume,
    /// Response metadata has been received from the server.
    Response,
}

/// Contains task notification data handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct NotifyData {
    /// Current progress snapshot.
    pub progress: Progress,
    /// Action type (download or upload).
    pub action: Action,
    /// API version the task was created under.
    pub version: Version,
    /// Per-file transfer history accumulated so far.
    pub task_states: Vec<TaskState>,
    /// Unique task identifier.
    pub task_id: u32,
}

/// Core progress information shared across different components.
#[derive(Clone, Debug)]
pub struct CommonProgress {
    /// Current state of the task as a raw byte value.
    pub state: u8,
    /// Index of the current file being processed.
    pub index: usize,
    /// Total number of bytes processed across all files.
    pub total_processed: u64,
}

/// Comprehensive progress information for a task.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Core progress metadata.
    pub common_data: CommonProgress,
    /// Total size of each file in bytes. A value of -1 indicates unknown size.
    pub sizes: Vec<i64>,
    /// Number of bytes processed for each file.
    pub processed: Vec<u64>,
    /// Additional progress-related parameters.
    pub extras: HashMap<String, String>,
}

/// History entry for one completed sub-transfer.
///
/// A multi-file upload appends one entry per file as it finishes, successful
/// or not; a download appends a single entry on completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskState {
    /// Path of the file this entry describes.
    pub path: String,
    /// HTTP response code for the sub-transfer, 0 if none was received.
    pub response_code: u32,
    /// Human-readable status message.
    pub message: String,
}

impl Progress {
    /// Creates a new `Progress` with the specified file sizes, all files at
    /// zero bytes processed and state `Initialized`.
    pub fn new(sizes: Vec<i64>) -> Self {
        let len = sizes.len();
        Progress {
            common_data: CommonProgress {
                state: State::Initialized as u8,
                index: 0,
                total_processed: 0,
            },
            sizes,
            processed: vec![0; len],
            extras: HashMap::new(),
        }
    }

    /// Checks if the task has finished processing all files.
    ///
    /// Returns `true` only if all files have known sizes and the sum of
    /// processed bytes equals the sum of total sizes.
    pub fn is_finish(&self) -> bool {
        self.sizes.iter().all(|a| *a != -1)
            && self.processed.iter().sum::<u64>() == self.sizes.iter().sum::<i64>() as u64
    }

    /// Resets all counters to zero, keeping the known sizes.
    ///
    /// Used when a resume cannot continue from the previous offset and the
    /// transfer restarts from scratch.
    pub(crate) fn reset(&mut self) {
        self.common_data.index = 0;
        self.common_data.total_processed = 0;
        for processed in self.processed.iter_mut() {
            *processed = 0;
        }
    }
}
