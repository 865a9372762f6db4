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
use crate::task::config::TaskConfig;
use crate::task::request_task::RequestTask;

impl TaskManager {
    /// Creates a task from a validated config and persists it.
    ///
    /// The id is taken from the store's counter, so it stays unique across
    /// restarts. The new task sits in `Initialized` until started.
    pub(crate) fn create(&mut self, mut config: TaskConfig) -> Result<u32, ErrorCode> {
        config.validate()?;

        let task_id = self.database.next_task_id().map_err(|e| {
            error!("allocate task id failed: {}", e);
            ErrorCode::TaskEnqueueErr
        })?;
        config.common_data.task_id = task_id;

        let task = RequestTask::new(config);
        self.database
            .insert_task(&task.conf, &task.info())
            .map_err(|e| {
                error!("insert task {} failed: {}", task_id, e);
                ErrorCode::TaskEnqueueErr
            })?;
        self.tasks.insert(task_id, task);

        info!("task {} created", task_id);
        Ok(task_id)
    }
}
