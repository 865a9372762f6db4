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

//! Task querying and searching.

use serde_json::{json, Value};

use super::events::QueryEvent;
use super::task_manager::TaskManager;
use crate::task::codec::{opt_i64, opt_u64};
use crate::task::config::{Action, Mode};
use crate::task::info::{State, TaskInfo};
use crate::utils::get_current_timestamp;

/// Criteria for searching tasks.
///
/// `state`, `action` and `mode` hold raw representation values; their `Any`
/// variants match everything. The time bounds are inclusive and compare
/// against each task's modification time.
#[derive(Clone, Debug)]
pub struct TaskFilter {
    /// Upper bound on task modification time, inclusive.
    pub before: i64,
    /// Lower bound on task modification time, inclusive.
    pub after: i64,
    /// State to match, `State::Any` for every state.
    pub state: u8,
    /// Action to match, `Action::Any` for every action.
    pub action: u8,
    /// Mode to match, `Mode::Any` for every mode.
    pub mode: u8,
}

impl TaskFilter {
    /// Creates a filter matching every task modified up to now.
    pub fn new() -> Self {
        TaskFilter {
            before: get_current_timestamp() as i64,
            after: 0,
            state: State::Any as u8,
            action: Action::Any as u8,
            mode: Mode::Any as u8,
        }
    }

    /// Encodes the filter with its full field set.
    pub fn to_json(&self) -> Value {
        json!({
            "before": self.before,
            "after": self.after,
            "state": self.state,
            "action": self.action,
            "mode": self.mode,
        })
    }

    /// Decodes a filter, keeping defaults for missing or mistyped fields.
    pub fn from_json(json: &Value) -> Self {
        let mut filter = TaskFilter::new();
        if let Some(v) = opt_i64(json, "before") {
            filter.before = v;
        }
        if let Some(v) = opt_i64(json, "after") {
            filter.after = v;
        }
        if let Some(v) = opt_u64(json, "state") {
            filter.state = v as u8;
        }
        if let Some(v) = opt_u64(json, "action") {
            filter.action = v as u8;
        }
        if let Some(v) = opt_u64(json, "mode") {
            filter.mode = v as u8;
        }
        filter
    }
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskManager {
    /// Handles a query event, sending the result back through the provided
    /// channel.
    pub(crate) fn handle_query_event(&self, event: QueryEvent) {
        match event {
            QueryEvent::Show(task_id, tx) => {
                let _ = tx.send(self.show(task_id));
            }
            QueryEvent::Touch(task_id, token, tx) => {
                let _ = tx.send(self.touch(task_id, token));
            }
            QueryEvent::Search(filter, tx) => {
                let _ = tx.send(self.database.search_tasks(&filter));
            }
        }
    }

    /// Fetches one task's information, preferring the live in-memory copy
    /// over the persisted snapshot.
    fn show(&self, task_id: u32) -> Option<TaskInfo> {
        match self.tasks.get(&task_id) {
            Some(task) => Some(task.info()),
            None => self.database.get_task_info(task_id),
        }
    }

    /// Fetches one task's information after checking its token.
    fn touch(&self, task_id: u32, token: String) -> Option<TaskInfo> {
        let config = match self.tasks.get(&task_id) {
            Some(task) => task.conf.clone(),
            None => self.database.get_task_config(task_id)?,
        };
        if config.token != token {
            info!("touch task {} token mismatch", task_id);
            return None;
        }
        self.show(task_id)
    }
}
