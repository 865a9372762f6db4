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

use crate::error::ErrorCode;
use crate::manage::task_manager::TaskManager;
use crate::task::info::State;
use crate::task::reason::Reason;

impl TaskManager {
    /// Pauses a task, preserving its byte offsets.
    pub(crate) fn pause(&mut self, task_id: u32) -> ErrorCode {
        debug!("TaskManager pause, tid {}", task_id);

        if !self.restore_task(task_id) {
            return ErrorCode::TaskNotFound;
        }
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return ErrorCode::TaskNotFound;
        };
        if !task.change_status(State::Paused, Reason::UserOperation) {
            return ErrorCode::TaskStateErr;
        }
        // Offsets recorded so far stay valid even if the adapter grumbles.
        if let Err(fault) = self.adapter.pause(task_id) {
            info!("adapter pause for task {} reported {:?}", task_id, fault);
        }
        self.persist_task(task_id);
        if let Some(task) = self.tasks.get(&task_id) {
            self.notifier.pause(&task.build_notify_data());
        }
        ErrorCode::ErrOk
    }
}
