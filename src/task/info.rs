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

use super::notify::{NotifyData, Progress, TaskState};
use crate::task::config::{Action, Version};

/// Represents the current state of a task.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum State {
    /// Task has been created but not yet started.
    Initialized = 0x00,
    /// Task is running but temporarily blocked by degraded conditions.
    Waiting = 0x10,
    /// Task is actively running.
    Running = 0x20,
    /// Task is retrying after a transient failure.
    Retrying = 0x21,
    /// Task has been paused by the user.
    Paused = 0x30,
    /// Task has been stopped by the user.
    Stopped = 0x31,
    /// Task has completed successfully.
    Completed = 0x40,
    /// Task has failed to complete.
    Failed = 0x41,
    /// Task has been removed from the system.
    Removed = 0x50,
    /// Wildcard value used for filtering any state.
    Any = 0x61,
}

impl From<u8> for State {
    fn from(value: u8) -> Self {
        match value {
            0x00 => State::Initialized,
            0x10 => State::Waiting,
            0x20 => State::Running,
            0x21 => State::Retrying,
            0x30 => State::Paused,
            0x31 => State::Stopped,
            0x40 => State::Completed,
            0x41 => State::Failed,
            0x50 => State::Removed,
            _ => State::Any,
        }
    }
}

impl State {
    /// Whether no further lifecycle commands except Remove apply.
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Completed | State::Failed | State::Stopped)
    }
}

/// Common metadata shared across different task representations.
#[derive(Copy, Clone, Debug)]
pub struct CommonTaskInfo {
    /// Unique identifier for the task.
    pub task_id: u32,
    /// Action type encoded as a byte (0 for download, 1 for upload).
    pub action: u8,
    /// Operating mode encoded as a byte.
    pub mode: u8,
    /// Creation time in milliseconds since epoch.
    pub ctime: u64,
    /// Modification time in milliseconds since epoch.
    pub mtime: u64,
    /// Reason code for the current state.
    pub reason: u8,
    /// Coarse fault class for a failed task.
    pub faults: u8,
    /// Whether progress notifications are delivered.
    pub gauge: bool,
    /// Whether automatic retries are enabled.
    pub retry: bool,
    /// Number of retry attempts made.
    pub tries: u32,
    /// API version used for this task.
    pub version: u8,
    /// Task priority level.
    pub priority: u32,
}

impl CommonTaskInfo {
    pub(crate) fn new() -> Self {
        Self {
            task_id: 0,
            action: 0,
            mode: 0,
            ctime: 0,
            mtime: 0,
            reason: 0,
            faults: 0,
            gauge: false,
            retry: false,
            tries: 0,
            version: 0,
            priority: 0,
        }
    }
}

/// Aggregate task information returned to callers and persisted to the store.
///
/// Callbacks and queries always receive an immutable snapshot; the canonical
/// mutable copy is owned by the controller.
#[derive(Debug, Clone)]
pub struct TaskInfo {
    /// URL for the network request.
    pub url: String,
    /// Request payload data.
    pub data: String,
    /// Authentication token for the task.
    pub token: String,
    /// Form items included in the request.
    pub form_items: Vec<crate::utils::form_item::FormItem>,
    /// File specifications for download/upload.
    pub file_specs: Vec<crate::utils::form_item::FileSpec>,
    /// Title of the task.
    pub title: String,
    /// Description of the task.
    pub description: String,
    /// MIME type of the content, filled from the server response.
    pub mime_type: String,
    /// Current progress of the task.
    pub progress: Progress,
    /// Ordered per-file transfer history.
    pub task_states: Vec<TaskState>,
    /// Additional task-specific parameters.
    pub extras: HashMap<String, String>,
    /// Common task metadata.
    pub common_data: CommonTaskInfo,
}

impl TaskInfo {
    /// Creates a new `TaskInfo` with default values.
    pub fn new() -> Self {
        Self {
            url: "".to_string(),
            data: "".to_string(),
            token: "".to_string(),
            form_items: vec![],
            file_specs: vec![],
            title: "".to_string(),
            description: "".to_string(),
            mime_type: "".to_string(),
            // Has at least one progress size.
            progress: Progress::new(vec![0]),
            task_states: vec![],
            extras: HashMap::new(),
            common_data: CommonTaskInfo::new(),
        }
    }

    /// Gets the action type (download/upload) for this task.
    pub fn action(&self) -> Action {
        Action::from(self.common_data.action)
    }

    /// Gets the current state of this task.
    pub fn state(&self) -> State {
        State::from(self.progress.common_data.state)
    }

    /// Builds a `NotifyData` snapshot for status notifications.
    pub(crate) fn build_notify_data(&self) -> NotifyData {
        NotifyData {
            progress: self.progress.clone(),
            action: Action::from(self.common_data.action),
            version: Version::from(self.common_data.version),
            task_states: self.task_states.clone(),
            task_id: self.common_data.task_id,
        }
    }
}

impl Default for TaskInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Contains the mutable slice of a task persisted on every transition.
#[derive(Debug)]
pub(crate) struct UpdateInfo {
    /// New modification time.
    pub(crate) mtime: u64,
    /// New reason code.
    pub(crate) reason: u8,
    /// Coarse fault class.
    pub(crate) faults: u8,
    /// Updated retry count.
    pub(crate) tries: u32,
    /// Updated MIME type.
    pub(crate) mime_type: String,
    /// Updated progress information.
    pub(crate) progress: Progress,
    /// Updated per-file history.
    pub(crate) task_states: Vec<TaskState>,
}
