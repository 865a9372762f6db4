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
use crate::manage::adapter::TransferContext;
use crate::manage::task_manager::TaskManager;
use crate::task::info::State;
use crate::task::reason::Reason;

impl TaskManager {
    /// Starts a task, handing it to the transfer adapter.
    ///
    /// Only an `Initialized` task can be started; anything else answers
    /// `TaskStateErr`. An adapter refusing the transfer fails the task
    /// immediately, without consuming the retry budget.
    pub(crate) fn start(&mut self, task_id: u32) -> ErrorCode {
        debug!("TaskManager start, tid {}", task_id);

        if !self.restore_task(task_id) {
            return ErrorCode::TaskNotFound;
        }
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return ErrorCode::TaskNotFound;
        };
        if task.state() != State::Initialized {
            return ErrorCode::TaskStateErr;
        }
        task.change_status(State::Running, Reason::Default);
        let ctx = TransferContext {
            task_id,
            config: task.conf.clone(),
            processed: task.progress.processed.clone(),
        };
        self.persist_task(task_id);

        if let Err(fault) = self.adapter.start(&ctx) {
            let reason = Reason::from(fault);
            if let Some(task) = self.tasks.get_mut(&task_id) {
                if task.change_status(State::Failed, reason) {
                    self.persist_task(task_id);
                }
            }
            if let Some(task) = self.tasks.get(&task_id) {
                error!("task {} start rejected: {}", task_id, reason.to_str());
                self.notifier.fail(&task.build_notify_data(), reason);
            }
            return ErrorCode::TaskEnqueueErr;
        }
        ErrorCode::ErrOk
    }
}
