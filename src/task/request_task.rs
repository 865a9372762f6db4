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

use super::config::{Action, TaskConfig};
use super::info::{CommonTaskInfo, State, TaskInfo, UpdateInfo};
use super::notify::{NotifyData, Progress, TaskState};
use super::reason::{Faults, Reason};
use crate::utils::get_current_timestamp;

/// In-memory representation of one transfer task.
///
/// Owned exclusively by the manager's event loop, so all fields are plain
/// values; every mutation happens on the loop thread and is persisted to the
/// store before the originating command is answered.
pub(crate) struct RequestTask {
    pub(crate) conf: TaskConfig,
    pub(crate) ctime: u64,
    pub(crate) mime_type: String,
    pub(crate) progress: Progress,
    pub(crate) status: TaskStatus,
    pub(crate) task_states: Vec<TaskState>,
    pub(crate) tries: u32,
}

/// Lifecycle state of a task plus the reason it got there.
#[derive(Clone, Debug)]
pub(crate) struct TaskStatus {
    pub(crate) mtime: u64,
    pub(crate) state: State,
    pub(crate) reason: Reason,
}

impl TaskStatus {
    pub(crate) fn new(mtime: u64) -> Self {
        TaskStatus {
            mtime,
            state: State::Initialized,
            reason: Reason::Default,
        }
    }
}

impl RequestTask {
    /// Creates a fresh task from a validated config.
    pub(crate) fn new(conf: TaskConfig) -> Self {
        let file_count = match conf.common_data.action {
            Action::Upload => conf.file_specs.len().max(1),
            _ => 1,
        };
        // Sizes are unknown until the adapter reports them.
        let progress = Progress::new(vec![-1; file_count]);
        let ctime = get_current_timestamp();
        RequestTask {
            conf,
            ctime,
            mime_type: String::new(),
            progress,
            status: TaskStatus::new(ctime),
            task_states: Vec::new(),
            tries: 0,
        }
    }

    /// Rebuilds a task from a persisted snapshot, e.g. after a restart.
    pub(crate) fn new_by_info(conf: TaskConfig, info: TaskInfo) -> Self {
        let state = info.state();
        RequestTask {
            conf,
            ctime: info.common_data.ctime,
            mime_type: info.mime_type,
            progress: info.progress,
            status: TaskStatus {
                mtime: info.common_data.mtime,
                state,
                reason: Reason::from(info.common_data.reason),
            },
            task_states: info.task_states,
            tries: info.common_data.tries,
        }
    }

    pub(crate) fn task_id(&self) -> u32 {
        self.conf.common_data.task_id
    }

    pub(crate) fn action(&self) -> Action {
        self.conf.common_data.action
    }

    pub(crate) fn state(&self) -> State {
        self.status.state
    }

    /// Applies a state transition if the lifecycle allows it.
    ///
    /// On success the modification time is refreshed and the new state is
    /// mirrored into the progress snapshot. Returns `false` and leaves the
    /// task untouched for an illegal transition.
    pub(crate) fn change_status(&mut self, to: State, reason: Reason) -> bool {
        if !transition_allowed(self.status.state, to) {
            debug!(
                "task {} rejects transition {:?} -> {:?}",
                self.task_id(),
                self.status.state,
                to
            );
            return false;
        }
        self.status.state = to;
        self.status.reason = reason;
        self.status.mtime = get_current_timestamp();
        self.progress.common_data.state = to as u8;
        true
    }

    /// Applies an adapter-reported byte count, never moving progress
    /// backwards.
    pub(crate) fn record_progress(&mut self, index: usize, processed: u64, total_processed: u64) {
        if index >= self.progress.processed.len() {
            return;
        }
        self.progress.common_data.index = index;
        let slot = &mut self.progress.processed[index];
        *slot = (*slot).max(processed);
        self.progress.common_data.total_processed =
            self.progress.common_data.total_processed.max(total_processed);
        self.status.mtime = get_current_timestamp();
    }

    /// Appends one per-file history entry.
    pub(crate) fn record_task_state(&mut self, state: TaskState) {
        self.task_states.push(state);
    }

    /// Whether every file of an upload still awaiting transfer blocks
    /// removal.
    pub(crate) fn has_pending_files(&self) -> bool {
        self.action() == Action::Upload && self.task_states.len() < self.conf.file_specs.len()
    }

    /// Builds the full persistable snapshot of this task.
    pub(crate) fn info(&self) -> TaskInfo {
        TaskInfo {
            url: self.conf.url.clone(),
            data: self.conf.data.clone(),
            token: self.conf.token.clone(),
            form_items: self.conf.form_items.clone(),
            file_specs: self.conf.file_specs.clone(),
            title: self.conf.title.clone(),
            description: self.conf.description.clone(),
            mime_type: self.mime_type.clone(),
            progress: self.progress.clone(),
            task_states: self.task_states.clone(),
            extras: self.conf.extras.clone(),
            common_data: CommonTaskInfo {
                task_id: self.conf.common_data.task_id,
                action: self.conf.common_data.action as u8,
                mode: self.conf.common_data.mode as u8,
                ctime: self.ctime,
                mtime: self.status.mtime,
                reason: self.status.reason as u8,
                faults: Faults::from(self.status.reason) as u8,
                gauge: self.conf.common_data.gauge,
                retry: self.conf.common_data.retry,
                tries: self.tries,
                version: self.conf.version as u8,
                priority: self.conf.common_data.priority,
            },
        }
    }

    /// Builds the mutable slice persisted on every transition.
    pub(crate) fn update_info(&self) -> UpdateInfo {
        UpdateInfo {
            mtime: self.status.mtime,
            reason: self.status.reason as u8,
            faults: Faults::from(self.status.reason) as u8,
            tries: self.tries,
            mime_type: self.mime_type.clone(),
            progress: self.progress.clone(),
            task_states: self.task_states.clone(),
        }
    }

    pub(crate) fn build_notify_data(&self) -> NotifyData {
        self.info().build_notify_data()
    }
}

/// Legal lifecycle moves. `Stopped` is reachable from any live state and
/// `Removed` only from a terminal one.
pub(crate) fn transition_allowed(from: State, to: State) -> bool {
    if from == to {
        return false;
    }
    match to {
        State::Running => matches!(
            from,
            State::Initialized | State::Waiting | State::Paused | State::Retrying
        ),
        State::Waiting => matches!(
            from,
            State::Initialized | State::Running | State::Retrying
        ),
        State::Paused => matches!(from, State::Waiting | State::Running | State::Retrying),
        State::Retrying => from == State::Running,
        State::Completed => from == State::Running,
        State::Failed => matches!(
            from,
            State::Initialized | State::Waiting | State::Running | State::Retrying
        ),
        State::Stopped => !from.is_terminal() && from != State::Removed,
        State::Removed => from.is_terminal(),
        _ => false,
    }
}
