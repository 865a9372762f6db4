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
    /// Removes a finished task from the subsystem entirely.
    ///
    /// Only a terminal task can be removed, and an upload task keeps its
    /// record until every file carries a history entry.
    pub(crate) fn remove(&mut self, task_id: u32) -> ErrorCode {
        debug!("TaskManager remove, tid {}", task_id);

        if !self.restore_task(task_id) {
            return ErrorCode::TaskNotFound;
        }
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return ErrorCode::TaskNotFound;
        };
        if task.has_pending_files() {
            return ErrorCode::TaskStateErr;
        }
        if !task.change_status(State::Removed, Reason::UserOperation) {
            return ErrorCode::TaskStateErr;
        }
        let data = task.build_notify_data();
        if let Err(e) = self.database.remove_task(task_id) {
            error!("remove task {} from store failed: {}", task_id, e);
            return ErrorCode::FileOperationErr;
        }
        self.tasks.remove(&task_id);
        self.notifier.remove(&data);
        info!("task {} removed", task_id);
        ErrorCode::ErrOk
    }
}
