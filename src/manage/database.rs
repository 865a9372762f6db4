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

//! SQLite-backed task store.
//!
//! One row per task holds both the immutable configuration and the mutable
//! runtime slice; collections travel as JSON text columns produced by the
//! wire codec. A second single-row table carries the persisted task id
//! counter so identifiers stay unique across restarts.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::task::config::{CommonTaskConfig, TaskConfig};
use crate::task::info::{CommonTaskInfo, State, TaskInfo, UpdateInfo};
use crate::task::notify::{Progress, TaskState};
use crate::task::reason::Reason;
use crate::utils::form_item::{FileSpec, FormItem};
use crate::utils::get_current_timestamp;

const CREATE_TASK_TABLE: &str = "CREATE TABLE IF NOT EXISTS request_task (task_id INTEGER PRIMARY KEY, action INTEGER, mode INTEGER, network INTEGER, metered INTEGER, roaming INTEGER, ctime INTEGER, mtime INTEGER, reason INTEGER, faults INTEGER, gauge INTEGER, retry INTEGER, redirect INTEGER, tries INTEGER, version INTEGER, idx INTEGER, begins INTEGER, ends INTEGER, precise INTEGER, priority INTEGER, overwrite INTEGER, background INTEGER, url TEXT, data TEXT, token TEXT, title TEXT, description TEXT, method TEXT, saveas TEXT, proxy TEXT, headers TEXT, config_extras TEXT, mime_type TEXT, state INTEGER, total_processed INTEGER, sizes TEXT, processed TEXT, progress_extras TEXT, form_items TEXT, file_specs TEXT, task_states TEXT)";

const CREATE_COUNTER_TABLE: &str = "CREATE TABLE IF NOT EXISTS task_id_counter (id INTEGER PRIMARY KEY CHECK (id = 0), next_id INTEGER NOT NULL)";

/// Retention period for finished tasks, in milliseconds.
const ONE_MONTH: u64 = 30 * 24 * 60 * 60 * 1000;

/// Handle to the task store, owned by the manager and passed down to the
/// components that need it.
pub struct Database {
    inner: Connection,
}

impl Database {
    /// Opens or creates the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Opens a transient in-memory store, used by tests.
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(inner: Connection) -> rusqlite::Result<Self> {
        inner.execute(CREATE_TASK_TABLE, ())?;
        inner.execute(CREATE_COUNTER_TABLE, ())?;
        inner.execute(
            "INSERT OR IGNORE INTO task_id_counter (id, next_id) VALUES (0, 1)",
            (),
        )?;
        Ok(Self { inner })
    }

    /// Hands out the next task id and persists the advanced counter.
    pub(crate) fn next_task_id(&self) -> rusqlite::Result<u32> {
        let id: u32 = self
            .inner
            .query_row("SELECT next_id FROM task_id_counter WHERE id = 0", [], |row| {
                row.get(0)
            })?;
        self.inner.execute(
            "UPDATE task_id_counter SET next_id = ?1 WHERE id = 0",
            params![id.wrapping_add(1)],
        )?;
        Ok(id)
    }

    pub(crate) fn contains_task(&self, task_id: u32) -> bool {
        self.inner
            .query_row(
                "SELECT 1 FROM request_task WHERE task_id = ?1",
                params![task_id],
                |_| Ok(()),
            )
            .optional()
            .ok()
            .flatten()
            .is_some()
    }

    /// Inserts a freshly constructed task.
    pub(crate) fn insert_task(&self, config: &TaskConfig, info: &TaskInfo) -> rusqlite::Result<()> {
        debug!("insert task {} into database", config.common_data.task_id);
        let common = &config.common_data;
        self.inner.execute(
            "INSERT OR REPLACE INTO request_task (task_id, action, mode, network, metered, roaming, ctime, mtime, reason, faults, gauge, retry, redirect, tries, version, idx, begins, ends, precise, priority, overwrite, background, url, data, token, title, description, method, saveas, proxy, headers, config_extras, mime_type, state, total_processed, sizes, processed, progress_extras, form_items, file_specs, task_states)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34, ?35, ?36, ?37, ?38, ?39, ?40, ?41)",
            params![
                common.task_id,
                common.action as u8,
                common.mode as u8,
                common.network as u8,
                common.metered,
                common.roaming,
                info.common_data.ctime,
                info.common_data.mtime,
                info.common_data.reason,
                info.common_data.faults,
                common.gauge,
                common.retry,
                common.redirect,
                info.common_data.tries,
                config.version as u8,
                common.index,
                common.begins,
                common.ends,
                common.precise,
                common.priority,
                common.overwrite,
                common.background,
                config.url,
                config.data,
                config.token,
                config.title,
                config.description,
                config.method,
                config.saveas,
                config.proxy,
                hashmap_to_string(&config.headers),
                hashmap_to_string(&config.extras),
                info.mime_type,
                info.progress.common_data.state,
                info.progress.common_data.total_processed,
                vec_to_string(&info.progress.sizes),
                vec_to_string(&info.progress.processed),
                hashmap_to_string(&info.progress.extras),
                form_items_to_string(&config.form_items),
                file_specs_to_string(&config.file_specs),
                task_states_to_string(&info.task_states),
            ],
        )?;
        Ok(())
    }

    /// Persists the mutable slice of a task after a transition.
    pub(crate) fn update_task(&self, task_id: u32, update: &UpdateInfo) -> rusqlite::Result<()> {
        self.inner.execute(
            "UPDATE request_task SET mtime = ?2, reason = ?3, faults = ?4, tries = ?5, mime_type = ?6, state = ?7, idx = ?8, total_processed = ?9, sizes = ?10, processed = ?11, progress_extras = ?12, task_states = ?13 WHERE task_id = ?1",
            params![
                task_id,
                update.mtime,
                update.reason,
                update.faults,
                update.tries,
                update.mime_type,
                update.progress.common_data.state,
                update.progress.common_data.index,
                update.progress.common_data.total_processed,
                vec_to_string(&update.progress.sizes),
                vec_to_string(&update.progress.processed),
                hashmap_to_string(&update.progress.extras),
                task_states_to_string(&update.task_states),
            ],
        )?;
        Ok(())
    }

    pub(crate) fn update_task_state(
        &self,
        task_id: u32,
        state: State,
        reason: Reason,
    ) -> rusqlite::Result<()> {
        self.inner.execute(
            "UPDATE request_task SET state = ?2, reason = ?3, mtime = ?4 WHERE task_id = ?1",
            params![task_id, state as u8, reason as u8, get_current_timestamp()],
        )?;
        Ok(())
    }

    pub(crate) fn remove_task(&self, task_id: u32) -> rusqlite::Result<()> {
        self.inner.execute(
            "DELETE FROM request_task WHERE task_id = ?1",
            params![task_id],
        )?;
        Ok(())
    }

    /// Loads one task's full information snapshot.
    pub(crate) fn get_task_info(&self, task_id: u32) -> Option<TaskInfo> {
        self.inner
            .query_row(
                "SELECT task_id, action, mode, ctime, mtime, reason, faults, gauge, retry, tries, version, priority, url, data, token, title, description, mime_type, state, idx, total_processed, sizes, processed, progress_extras, form_items, file_specs, task_states, config_extras FROM request_task WHERE task_id = ?1",
                params![task_id],
                |row| {
                    let mut progress = Progress::new(string_to_vec(row.get::<_, String>(21)?));
                    progress.common_data.state = row.get(18)?;
                    progress.common_data.index = row.get(19)?;
                    progress.common_data.total_processed = row.get(20)?;
                    progress.processed = string_to_vec(row.get::<_, String>(22)?);
                    progress.extras = string_to_hashmap(row.get::<_, String>(23)?);
                    Ok(TaskInfo {
                        common_data: CommonTaskInfo {
                            task_id: row.get(0)?,
                            action: row.get(1)?,
                            mode: row.get(2)?,
                            ctime: row.get(3)?,
                            mtime: row.get(4)?,
                            reason: row.get(5)?,
                            faults: row.get(6)?,
                            gauge: row.get(7)?,
                            retry: row.get(8)?,
                            tries: row.get(9)?,
                            version: row.get(10)?,
                            priority: row.get(11)?,
                        },
                        url: row.get(12)?,
                        data: row.get(13)?,
                        token: row.get(14)?,
                        title: row.get(15)?,
                        description: row.get(16)?,
                        mime_type: row.get(17)?,
                        progress,
                        form_items: string_to_form_items(row.get::<_, String>(24)?),
                        file_specs: string_to_file_specs(row.get::<_, String>(25)?),
                        task_states: string_to_task_states(row.get::<_, String>(26)?),
                        extras: string_to_hashmap(row.get::<_, String>(27)?),
                    })
                },
            )
            .optional()
            .ok()
            .flatten()
    }

    /// Loads one task's configuration.
    pub(crate) fn get_task_config(&self, task_id: u32) -> Option<TaskConfig> {
        self.inner
            .query_row(
                "SELECT task_id, action, mode, network, metered, roaming, gauge, retry, redirect, version, idx, begins, ends, precise, priority, overwrite, background, url, data, token, title, description, method, saveas, proxy, headers, config_extras, form_items, file_specs FROM request_task WHERE task_id = ?1",
                params![task_id],
                |row| {
                    let action: u8 = row.get(1)?;
                    let mode: u8 = row.get(2)?;
                    let network: u8 = row.get(3)?;
                    let version: u8 = row.get(9)?;
                    Ok(TaskConfig {
                        common_data: CommonTaskConfig {
                            task_id: row.get(0)?,
                            action: action.into(),
                            mode: mode.into(),
                            network: network.into(),
                            metered: row.get(4)?,
                            roaming: row.get(5)?,
                            gauge: row.get(6)?,
                            retry: row.get(7)?,
                            redirect: row.get(8)?,
                            index: row.get(10)?,
                            begins: row.get(11)?,
                            ends: row.get(12)?,
                            precise: row.get(13)?,
                            priority: row.get(14)?,
                            overwrite: row.get(15)?,
                            background: row.get(16)?,
                        },
                        version: version.into(),
                        url: row.get(17)?,
                        data: row.get(18)?,
                        token: row.get(19)?,
                        title: row.get(20)?,
                        description: row.get(21)?,
                        method: row.get(22)?,
                        saveas: row.get(23)?,
                        proxy: row.get(24)?,
                        headers: string_to_hashmap(row.get::<_, String>(25)?),
                        extras: string_to_hashmap(row.get::<_, String>(26)?),
                        form_items: string_to_form_items(row.get::<_, String>(27)?),
                        file_specs: string_to_file_specs(row.get::<_, String>(28)?),
                    })
                },
            )
            .optional()
            .ok()
            .flatten()
    }

    /// Returns ids of tasks matching the filter, newest first.
    ///
    /// `Any` values in the filter act as wildcards; the time bounds compare
    /// against each task's modification time, inclusive on both ends.
    pub(crate) fn search_tasks(&self, filter: &super::query::TaskFilter) -> Vec<u32> {
        use crate::task::config::{Action, Mode};

        let mut sql = String::from(
            "SELECT task_id FROM request_task WHERE mtime <= ?1 AND mtime >= ?2",
        );
        let mut params: Vec<&dyn rusqlite::ToSql> = vec![&filter.before, &filter.after];
        if filter.state != State::Any as u8 {
            sql.push_str(&format!(" AND state = ?{}", params.len() + 1));
            params.push(&filter.state);
        }
        if filter.action != Action::Any as u8 {
            sql.push_str(&format!(" AND action = ?{}", params.len() + 1));
            params.push(&filter.action);
        }
        if filter.mode != Mode::Any as u8 {
            sql.push_str(&format!(" AND mode = ?{}", params.len() + 1));
            params.push(&filter.mode);
        }
        sql.push_str(" ORDER BY mtime DESC");

        let mut result = Vec::new();
        let Ok(mut stmt) = self.inner.prepare(&sql) else {
            error!("search prepare failed");
            return result;
        };
        match stmt.query_map(params.as_slice(), |row| row.get::<_, u32>(0)) {
            Ok(rows) => {
                for row in rows.flatten() {
                    result.push(row);
                }
            }
            Err(e) => error!("search query failed: {}", e),
        }
        result
    }

    /// Deletes finished tasks whose last activity exceeded the retention
    /// period, returning the ids that were purged.
    pub(crate) fn clear_timeout_tasks(&self) -> rusqlite::Result<Vec<u32>> {
        let cutoff = get_current_timestamp().saturating_sub(ONE_MONTH);
        let terminal = [
            State::Completed as u8,
            State::Failed as u8,
            State::Stopped as u8,
        ];
        let mut stmt = self.inner.prepare(
            "SELECT task_id FROM request_task WHERE mtime < ?1 AND state IN (?2, ?3, ?4)",
        )?;
        let ids: Vec<u32> = stmt
            .query_map(
                params![cutoff, terminal[0], terminal[1], terminal[2]],
                |row| row.get(0),
            )?
            .flatten()
            .collect();
        self.inner.execute(
            "DELETE FROM request_task WHERE mtime < ?1 AND state IN (?2, ?3, ?4)",
            params![cutoff, terminal[0], terminal[1], terminal[2]],
        )?;
        Ok(ids)
    }

    /// Marks tasks that were mid-flight when the process died as failed.
    ///
    /// Runs once when the manager boots, before any command is accepted.
    pub(crate) fn clear_invalid_records(&self) -> rusqlite::Result<()> {
        let live = [
            State::Running as u8,
            State::Retrying as u8,
            State::Waiting as u8,
        ];
        self.inner.execute(
            "UPDATE request_task SET state = ?1, reason = ?2, mtime = ?3 WHERE state IN (?4, ?5, ?6)",
            params![
                State::Failed as u8,
                Reason::OthersError as u8,
                get_current_timestamp(),
                live[0],
                live[1],
                live[2],
            ],
        )?;
        Ok(())
    }
}

fn hashmap_to_string(map: &HashMap<String, String>) -> String {
    serde_json::to_string(map).unwrap_or_else(|_| "{}".to_string())
}

fn string_to_hashmap(text: String) -> HashMap<String, String> {
    serde_json::from_str(&text).unwrap_or_default()
}

fn vec_to_string<T: serde::Serialize>(values: &[T]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn string_to_vec<T: serde::de::DeserializeOwned>(text: String) -> Vec<T> {
    serde_json::from_str(&text).unwrap_or_default()
}

fn form_items_to_string(items: &[FormItem]) -> String {
    Value::Array(items.iter().map(FormItem::to_json).collect()).to_string()
}

fn string_to_form_items(text: String) -> Vec<FormItem> {
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(values)) => values.iter().map(FormItem::from_json).collect(),
        _ => Vec::new(),
    }
}

fn file_specs_to_string(specs: &[FileSpec]) -> String {
    Value::Array(specs.iter().map(FileSpec::to_json).collect()).to_string()
}

fn string_to_file_specs(text: String) -> Vec<FileSpec> {
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(values)) => values.iter().map(FileSpec::from_json).collect(),
        _ => Vec::new(),
    }
}

fn task_states_to_string(states: &[TaskState]) -> String {
    Value::Array(states.iter().map(TaskState::to_json).collect()).to_string()
}

fn string_to_task_states(text: String) -> Vec<TaskState> {
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(values)) => values.iter().map(TaskState::from_json).collect(),
        _ => Vec::new(),
    }
}
