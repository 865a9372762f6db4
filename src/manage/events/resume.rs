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
use crate::manage::adapter::ResumeKind;
use crate::manage::task_manager::TaskManager;
use crate::task::info::State;
use crate::task::reason::Reason;

impl TaskManager {
    /// Resumes a paused task.
    ///
    /// When the adapter can continue with range requests the recorded
    /// offsets are kept; otherwise progress resets to zero and the transfer
    /// restarts. An adapter error leaves the task paused so a later resume
    /// can succeed.
    pub(crate) fn resume(&mut self, task_id: u32) -> ErrorCode {
        debug!("TaskManager resume, tid {}", task_id);

        if !self.restore_task(task_id) {
            return ErrorCode::TaskNotFound;
        }
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return ErrorCode::TaskNotFound;
        };
        if task.state() != State::Paused {
            return ErrorCode::TaskStateErr;
        }
        match self.adapter.resume(task_id) {
            Ok(ResumeKind::Partial) => {}
            Ok(ResumeKind::Restart) => {
                info!("task {} restarts from byte zero", task_id);
                task.progress.reset();
            }
            Err(fault) => {
                error!("adapter resume for task {} failed {:?}", task_id, fault);
                return ErrorCode::Other;
            }
        }
        task.change_status(State::Running, Reason::Default);
        self.persist_task(task_id);
        if let Some(task) = self.tasks.get(&task_id) {
            self.notifier.resume(&task.build_notify_data());
        }
        ErrorCode::ErrOk
    }
}
