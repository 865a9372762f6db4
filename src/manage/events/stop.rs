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
    /// Stops a task, cancelling its transfer.
    ///
    /// Stopping an already finished task is a no-op answering `ErrOk`, so
    /// callers can stop without checking first.
    pub(crate) fn stop(&mut self, task_id: u32) -> ErrorCode {
        debug!("TaskManager stop, tid {}", task_id);

        if !self.restore_task(task_id) {
            return ErrorCode::TaskNotFound;
        }
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return ErrorCode::TaskNotFound;
        };
        if task.state().is_terminal() {
            return ErrorCode::ErrOk;
        }
        if !task.change_status(State::Stopped, Reason::UserOperation) {
            return ErrorCode::TaskStateErr;
        }
        if let Err(fault) = self.adapter.stop(task_id) {
            info!("adapter stop for task {} reported {:?}", task_id, fault);
        }
        self.persist_task(task_id);
        ErrorCode::ErrOk
    }
}
