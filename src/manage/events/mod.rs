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

//! Event system for the task manager.
//!
//! Defines every message the `TaskManager` loop consumes, plus factory
//! methods that pair a command with the oneshot receiver its reply arrives
//! on.

use std::fmt::Debug;

use tokio::sync::oneshot::{channel, Sender};

use crate::error::ErrorCode;
use crate::manage::query::TaskFilter;
use crate::task::config::TaskConfig;
use crate::task::info::TaskInfo;
use crate::task::notify::TaskState;
use crate::task::reason::Reason;
use crate::utils::Recv;

mod construct;
mod pause;
mod remove;
mod resume;
mod start;
mod stop;

/// The main event type for the task manager.
#[derive(Debug)]
pub(crate) enum TaskManagerEvent {
    /// Commands issued by clients.
    Service(ServiceEvent),
    /// Reports from the transfer adapter.
    Task(TaskEvent),
    /// Task information queries.
    Query(QueryEvent),
    /// Internally scheduled work.
    Schedule(ScheduleEvent),
}

impl TaskManagerEvent {
    /// Creates an event that constructs a task from the given configuration.
    ///
    /// Returns the event together with a receiver yielding the new task id.
    pub(crate) fn construct(config: TaskConfig) -> (Self, Recv<Result<u32, ErrorCode>>) {
        let (tx, rx) = channel::<Result<u32, ErrorCode>>();
        (
            Self::Service(ServiceEvent::Construct(
                Box::new(ConstructMessage { config }),
                tx,
            )),
            Recv::new(rx),
        )
    }

    /// Creates an event that starts a task.
    pub(crate) fn start(task_id: u32) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (Self::Service(ServiceEvent::Start(task_id, tx)), Recv::new(rx))
    }

    /// Creates an event that pauses a task.
    pub(crate) fn pause(task_id: u32) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (Self::Service(ServiceEvent::Pause(task_id, tx)), Recv::new(rx))
    }

    /// Creates an event that resumes a paused task.
    pub(crate) fn resume(task_id: u32) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (Self::Service(ServiceEvent::Resume(task_id, tx)), Recv::new(rx))
    }

    /// Creates an event that stops a task.
    pub(crate) fn stop(task_id: u32) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (Self::Service(ServiceEvent::Stop(task_id, tx)), Recv::new(rx))
    }

    /// Creates an event that removes a task from the subsystem.
    pub(crate) fn remove(task_id: u32) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (Self::Service(ServiceEvent::Remove(task_id, tx)), Recv::new(rx))
    }

    /// Creates an event that fetches one task's full information.
    pub(crate) fn show(task_id: u32) -> (Self, Recv<Option<TaskInfo>>) {
        let (tx, rx) = channel::<Option<TaskInfo>>();
        (Self::Query(QueryEvent::Show(task_id, tx)), Recv::new(rx))
    }

    /// Creates an event that fetches a task's information after checking its
    /// token.
    pub(crate) fn touch(task_id: u32, token: String) -> (Self, Recv<Option<TaskInfo>>) {
        let (tx, rx) = channel::<Option<TaskInfo>>();
        (
            Self::Query(QueryEvent::Touch(task_id, token, tx)),
            Recv::new(rx),
        )
    }

    /// Creates an event that searches task ids by filter.
    pub(crate) fn search(filter: TaskFilter) -> (Self, Recv<Vec<u32>>) {
        let (tx, rx) = channel::<Vec<u32>>();
        (Self::Query(QueryEvent::Search(filter, tx)), Recv::new(rx))
    }
}

/// Service operation events for task management.
#[derive(Debug)]
pub(crate) enum ServiceEvent {
    /// Construct a new task with the provided configuration.
    Construct(Box<ConstructMessage>, Sender<Result<u32, ErrorCode>>),
    /// Start a specific task.
    Start(u32, Sender<ErrorCode>),
    /// Pause a specific task.
    Pause(u32, Sender<ErrorCode>),
    /// Resume a specific task.
    Resume(u32, Sender<ErrorCode>),
    /// Stop a specific task.
    Stop(u32, Sender<ErrorCode>),
    /// Remove a specific task.
    Remove(u32, Sender<ErrorCode>),
}

/// Events for querying task information.
#[derive(Debug)]
pub(crate) enum QueryEvent {
    /// Fetch one task's information by id.
    Show(u32, Sender<Option<TaskInfo>>),
    /// Fetch one task's information after a token check.
    Touch(u32, String, Sender<Option<TaskInfo>>),
    /// Search task ids matching a filter.
    Search(TaskFilter, Sender<Vec<u32>>),
}

/// Reports produced by the transfer adapter while a task runs.
#[derive(Debug)]
pub(crate) enum TaskEvent {
    /// Byte counts advanced: file index, bytes for that file, total bytes.
    Progress(u32, usize, u64, u64),
    /// One file of the task finished, successfully or not.
    FileFinished(u32, TaskState),
    /// Conditions degraded (e.g. network loss) but the transfer holds on.
    Waiting(u32, Reason),
    /// Every byte of the task has been transferred.
    Completed(u32),
    /// The transfer failed with the given reason.
    Failed(u32, Reason),
    /// Response metadata arrived; carries the MIME type.
    Response(u32, String),
}

/// Internally scheduled work items.
#[derive(Debug)]
pub(crate) enum ScheduleEvent {
    /// Retry a task after its backoff delay elapsed.
    Retry(u32),
    /// Purge records that exceeded their retention period.
    ClearTimeoutTasks,
}

/// Boxed payload of a construct command.
pub(crate) struct ConstructMessage {
    pub(crate) config: TaskConfig,
}

impl Debug for ConstructMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Construct")
            .field("url", &self.config.url)
            .field("action", &self.config.common_data.action)
            .field("version", &self.config.version)
            .finish()
    }
}
