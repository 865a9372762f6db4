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

//! Core task management.
//!
//! The `TaskManager` owns every live task and serializes all operations on
//! them through a single event loop: client commands, adapter reports and
//! scheduled work all arrive as messages on one channel, so no per-task
//! locking is needed anywhere.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;

use super::adapter::{TransferAdapter, TransferContext};
use super::database::Database;
use super::events::{ScheduleEvent, ServiceEvent, TaskEvent, TaskManagerEvent};
use super::notifier::Notifier;
use crate::error::ErrorCode;
use crate::task::info::{State, TaskInfo};
use crate::task::notify::TaskState;
use crate::task::reason::Reason;
use crate::task::request_task::RequestTask;
use crate::task::MAX_RETRIES;
use crate::utils::{runtime_spawn, Recv};

/// Interval (in seconds) for purging tasks past their retention period.
const CLEAR_INTERVAL: u64 = 30 * 60;

/// Base backoff (in seconds) before a retry attempt; doubles per try.
const RETRY_BACKOFF_BASE: u64 = 2;

/// Attempts for one store write before the task is dropped to `Failed`.
const STORE_RETRY_TIMES: usize = 3;

/// Owner of every live task, run as a single event loop.
pub struct TaskManager {
    /// Driver performing the actual transfers.
    pub(crate) adapter: Arc<dyn TransferAdapter>,
    /// Persistent task store.
    pub(crate) database: Database,
    /// Dispatcher for subscriber callbacks.
    pub(crate) notifier: Notifier,
    /// Live tasks keyed by id.
    pub(crate) tasks: HashMap<u32, RequestTask>,
    /// Handle for posting events back onto the loop.
    pub(crate) tx: TaskManagerTx,
    /// Channel receiver for task manager events.
    pub(crate) rx: TaskManagerRx,
}

impl TaskManager {
    /// Builds the manager and starts its event loop on the service runtime.
    ///
    /// Mid-flight records left over from a previous process are failed
    /// before the first command is accepted. Returns the sender used to
    /// issue commands and adapter reports.
    pub fn init(
        database: Database,
        adapter: Arc<dyn TransferAdapter>,
        notifier: Notifier,
    ) -> TaskManagerTx {
        debug!("TaskManager init");

        let (tx, rx) = unbounded_channel();
        let tx = TaskManagerTx::new(tx);
        let rx = TaskManagerRx::new(rx);

        if let Err(e) = database.clear_invalid_records() {
            error!("clear invalid records failed: {}", e);
        }

        let task_manager = Self::new(database, adapter, notifier, tx.clone(), rx);

        runtime_spawn(clear_timeout_tasks(tx.clone()));
        runtime_spawn(task_manager.run());
        tx
    }

    pub(crate) fn new(
        database: Database,
        adapter: Arc<dyn TransferAdapter>,
        notifier: Notifier,
        tx: TaskManagerTx,
        rx: TaskManagerRx,
    ) -> Self {
        Self {
            adapter,
            database,
            notifier,
            tasks: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Runs the main event processing loop.
    pub(crate) async fn run(mut self) {
        loop {
            let event = match self.rx.recv().await {
                Some(event) => event,
                None => {
                    info!("TaskManager channel closed, loop exits");
                    break;
                }
            };

            match event {
                TaskManagerEvent::Service(event) => self.handle_service_event(event),
                TaskManagerEvent::Task(event) => self.handle_task_event(event),
                TaskManagerEvent::Query(event) => self.handle_query_event(event),
                TaskManagerEvent::Schedule(event) => self.handle_schedule_event(event),
            }

            debug!("TaskManager handles events finished");
        }
    }

    fn handle_service_event(&mut self, event: ServiceEvent) {
        debug!("TaskManager handles service event {:?}", event);

        match event {
            ServiceEvent::Construct(msg, tx) => {
                let _ = tx.send(self.create(msg.config));
            }
            ServiceEvent::Start(task_id, tx) => {
                let _ = tx.send(self.start(task_id));
            }
            ServiceEvent::Pause(task_id, tx) => {
                let _ = tx.send(self.pause(task_id));
            }
            ServiceEvent::Resume(task_id, tx) => {
                let _ = tx.send(self.resume(task_id));
            }
            ServiceEvent::Stop(task_id, tx) => {
                let _ = tx.send(self.stop(task_id));
            }
            ServiceEvent::Remove(task_id, tx) => {
                let _ = tx.send(self.remove(task_id));
            }
        }
    }

    fn handle_task_event(&mut self, event: TaskEvent) {
        debug!("TaskManager handles task event {:?}", event);

        match event {
            TaskEvent::Progress(task_id, index, processed, total_processed) => {
                self.on_progress(task_id, index, processed, total_processed);
            }
            TaskEvent::FileFinished(task_id, state) => {
                self.on_file_finished(task_id, state);
            }
            TaskEvent::Waiting(task_id, reason) => {
                self.on_waiting(task_id, reason);
            }
            TaskEvent::Completed(task_id) => {
                self.on_completed(task_id);
            }
            TaskEvent::Failed(task_id, reason) => {
                self.on_failed(task_id, reason);
            }
            TaskEvent::Response(task_id, mime_type) => {
                self.on_response(task_id, mime_type);
            }
        }
    }

    fn handle_schedule_event(&mut self, event: ScheduleEvent) {
        debug!("TaskManager handles schedule event {:?}", event);

        match event {
            ScheduleEvent::Retry(task_id) => self.retry(task_id),
            ScheduleEvent::ClearTimeoutTasks => self.clear_timeout_tasks(),
        }
    }

    fn on_progress(&mut self, task_id: u32, index: usize, processed: u64, total_processed: u64) {
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return;
        };
        // Late reports from an already paused or finished transfer are
        // ignored.
        if !matches!(task.state(), State::Running | State::Waiting) {
            return;
        }
        if task.state() == State::Waiting {
            task.change_status(State::Running, Reason::Default);
        }
        task.record_progress(index, processed, total_processed);
        self.persist_task(task_id);
        if let Some(task) = self.tasks.get(&task_id) {
            self.notifier.progress(&task.build_notify_data());
        }
    }

    /// Parks a running task in `Waiting` while conditions are degraded.
    ///
    /// The next progress report promotes it back to `Running`; a pause or
    /// stop landing meanwhile wins as usual.
    fn on_waiting(&mut self, task_id: u32, reason: Reason) {
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return;
        };
        if task.state() != State::Running {
            return;
        }
        if task.change_status(State::Waiting, reason) {
            info!("task {} waiting: {}", task_id, reason.to_str());
            self.persist_task(task_id);
        }
    }

    fn on_file_finished(&mut self, task_id: u32, state: TaskState) {
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return;
        };
        task.record_task_state(state);
        self.persist_task(task_id);
    }

    fn on_completed(&mut self, task_id: u32) {
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return;
        };
        if !task.change_status(State::Completed, Reason::Default) {
            return;
        }
        task.tries = 0;
        self.persist_task(task_id);
        if let Some(task) = self.tasks.get(&task_id) {
            info!("task {} completed", task_id);
            self.notifier.complete(&task.build_notify_data());
        }
    }

    fn on_failed(&mut self, task_id: u32, reason: Reason) {
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return;
        };
        if task.state() != State::Running {
            return;
        }

        if task.conf.common_data.retry && reason.is_retryable() && task.tries < MAX_RETRIES {
            task.tries += 1;
            let tries = task.tries;
            if task.change_status(State::Retrying, reason) {
                self.persist_task(task_id);
                let delay = RETRY_BACKOFF_BASE << (tries - 1);
                info!("task {} retrying in {}s, try {}", task_id, delay, tries);
                let tx = self.tx.clone();
                runtime_spawn(async move {
                    sleep(Duration::from_secs(delay)).await;
                    tx.send_event(TaskManagerEvent::Schedule(ScheduleEvent::Retry(task_id)));
                });
                return;
            }
        }

        if task.change_status(State::Failed, reason) {
            self.persist_task(task_id);
            if let Some(task) = self.tasks.get(&task_id) {
                error!("task {} failed: {}", task_id, reason.to_str());
                self.notifier.fail(&task.build_notify_data(), reason);
            }
        }
    }

    fn on_response(&mut self, task_id: u32, mime_type: String) {
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return;
        };
        task.mime_type = mime_type;
        self.persist_task(task_id);
        if let Some(task) = self.tasks.get(&task_id) {
            self.notifier.response(&task.build_notify_data());
        }
    }

    fn retry(&mut self, task_id: u32) {
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return;
        };
        // A pause or stop that landed during the backoff wins.
        if task.state() != State::Retrying {
            return;
        }
        if !task.change_status(State::Running, Reason::Default) {
            return;
        }
        let ctx = TransferContext {
            task_id,
            config: task.conf.clone(),
            processed: task.progress.processed.clone(),
        };
        self.persist_task(task_id);
        if let Err(fault) = self.adapter.start(&ctx) {
            let reason = Reason::from(fault);
            self.on_failed(task_id, reason);
        }
    }

    fn clear_timeout_tasks(&mut self) {
        match self.database.clear_timeout_tasks() {
            Ok(ids) => {
                for task_id in ids {
                    self.tasks.remove(&task_id);
                    self.notifier.unsubscribe(task_id);
                }
            }
            Err(e) => error!("clear timeout tasks failed: {}", e),
        }
    }

    /// Loads a task into memory from the store if it is not already live.
    pub(crate) fn restore_task(&mut self, task_id: u32) -> bool {
        if self.tasks.contains_key(&task_id) {
            return true;
        }
        let Some(config) = self.database.get_task_config(task_id) else {
            return false;
        };
        let Some(info) = self.database.get_task_info(task_id) else {
            return false;
        };
        self.tasks
            .insert(task_id, RequestTask::new_by_info(config, info));
        true
    }

    /// Writes the task's mutable slice to the store, retrying a bounded
    /// number of times. Exhaustion fails the task.
    pub(crate) fn persist_task(&mut self, task_id: u32) {
        let Some(task) = self.tasks.get_mut(&task_id) else {
            return;
        };
        let update = task.update_info();
        let mut last_err = None;
        for _ in 0..STORE_RETRY_TIMES {
            match self.database.update_task(task_id, &update) {
                Ok(()) => return,
                Err(e) => last_err = Some(e),
            }
        }
        error!(
            "persist task {} failed after {} tries: {:?}",
            task_id, STORE_RETRY_TIMES, last_err
        );
        if task.change_status(State::Failed, Reason::IoError) {
            let _ = self
                .database
                .update_task_state(task_id, State::Failed, Reason::IoError);
            let data = task.build_notify_data();
            self.notifier.fail(&data, Reason::IoError);
        }
    }
}

/// Periodically asks the loop to purge expired records.
async fn clear_timeout_tasks(tx: TaskManagerTx) {
    loop {
        sleep(Duration::from_secs(CLEAR_INTERVAL)).await;
        if !tx.send_event(TaskManagerEvent::Schedule(ScheduleEvent::ClearTimeoutTasks)) {
            return;
        }
    }
}

/// Sender for task manager events.
#[derive(Clone)]
pub struct TaskManagerTx {
    pub(crate) tx: UnboundedSender<TaskManagerEvent>,
}

impl TaskManagerTx {
    pub(crate) fn new(tx: UnboundedSender<TaskManagerEvent>) -> Self {
        Self { tx }
    }

    /// Sends an event to the task manager, returning whether the loop is
    /// still alive.
    pub(crate) fn send_event(&self, event: TaskManagerEvent) -> bool {
        if self.tx.send(event).is_err() {
            error!("Sends TaskManager event failed, receiver gone");
            return false;
        }
        true
    }

    /// Submits a construct command, yielding the new task's id.
    pub fn construct(&self, config: crate::task::config::TaskConfig) -> Recv<Result<u32, ErrorCode>> {
        let (event, rx) = TaskManagerEvent::construct(config);
        self.send_event(event);
        rx
    }

    /// Submits a start command for a task.
    pub fn start(&self, task_id: u32) -> Recv<ErrorCode> {
        let (event, rx) = TaskManagerEvent::start(task_id);
        self.send_event(event);
        rx
    }

    /// Submits a pause command for a task.
    pub fn pause(&self, task_id: u32) -> Recv<ErrorCode> {
        let (event, rx) = TaskManagerEvent::pause(task_id);
        self.send_event(event);
        rx
    }

    /// Submits a resume command for a task.
    pub fn resume(&self, task_id: u32) -> Recv<ErrorCode> {
        let (event, rx) = TaskManagerEvent::resume(task_id);
        self.send_event(event);
        rx
    }

    /// Submits a stop command for a task.
    pub fn stop(&self, task_id: u32) -> Recv<ErrorCode> {
        let (event, rx) = TaskManagerEvent::stop(task_id);
        self.send_event(event);
        rx
    }

    /// Submits a remove command for a task.
    pub fn remove(&self, task_id: u32) -> Recv<ErrorCode> {
        let (event, rx) = TaskManagerEvent::remove(task_id);
        self.send_event(event);
        rx
    }

    /// Fetches one task's full information.
    pub fn show(&self, task_id: u32) -> Recv<Option<TaskInfo>> {
        let (event, rx) = TaskManagerEvent::show(task_id);
        self.send_event(event);
        rx
    }

    /// Fetches one task's information after a token check.
    pub fn touch(&self, task_id: u32, token: String) -> Recv<Option<TaskInfo>> {
        let (event, rx) = TaskManagerEvent::touch(task_id, token);
        self.send_event(event);
        rx
    }

    /// Searches task ids matching a filter.
    pub fn search(&self, filter: crate::manage::query::TaskFilter) -> Recv<Vec<u32>> {
        let (event, rx) = TaskManagerEvent::search(filter);
        self.send_event(event);
        rx
    }

    /// Reports advanced byte counts for one file of a task.
    pub fn notify_progress(&self, task_id: u32, index: usize, processed: u64, total_processed: u64) {
        let _ = self.send_event(TaskManagerEvent::Task(TaskEvent::Progress(
            task_id,
            index,
            processed,
            total_processed,
        )));
    }

    /// Reports that one file of a task finished, successfully or not.
    pub fn notify_file_finished(&self, task_id: u32, state: TaskState) {
        let _ = self.send_event(TaskManagerEvent::Task(TaskEvent::FileFinished(
            task_id, state,
        )));
    }

    /// Reports degraded conditions that hold a task without pausing it.
    pub fn notify_waiting(&self, task_id: u32, reason: Reason) {
        let _ = self.send_event(TaskManagerEvent::Task(TaskEvent::Waiting(task_id, reason)));
    }

    /// Reports that every byte of a task has been transferred.
    pub fn notify_completed(&self, task_id: u32) {
        let _ = self.send_event(TaskManagerEvent::Task(TaskEvent::Completed(task_id)));
    }

    /// Reports that a task's transfer failed.
    pub fn notify_failed(&self, task_id: u32, reason: Reason) {
        let _ = self.send_event(TaskManagerEvent::Task(TaskEvent::Failed(task_id, reason)));
    }

    /// Reports response metadata for a task.
    pub fn notify_response(&self, task_id: u32, mime_type: String) {
        let _ = self.send_event(TaskManagerEvent::Task(TaskEvent::Response(
            task_id, mime_type,
        )));
    }
}

/// Receiver wrapper for task manager events.
pub(crate) struct TaskManagerRx {
    rx: UnboundedReceiver<TaskManagerEvent>,
}

impl TaskManagerRx {
    pub(crate) fn new(rx: UnboundedReceiver<TaskManagerEvent>) -> Self {
        Self { rx }
    }
}

impl Deref for TaskManagerRx {
    type Target = UnboundedReceiver<TaskManagerEvent>;

    fn deref(&self) -> &Self::Target {
        &self.rx
    }
}

impl DerefMut for TaskManagerRx {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.rx
    }
}
