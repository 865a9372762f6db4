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

//! Notification dispatch for task state changes and events.
//!
//! Callbacks register per `(task id, subscribe type)` pair. The payload a
//! callback receives depends on the task's API version: legacy subscribers
//! get the per-file history or a bare reason code, current ones always get a
//! progress snapshot. Dispatch is best-effort and never feeds an error back
//! into the state machine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::task::config::{Action, Version};
use crate::task::notify::{NotifyData, Progress, SubscribeType, TaskState};
use crate::task::reason::Reason;

/// Payload handed to a subscriber callback.
#[derive(Clone, Debug)]
pub enum NotifyPayload {
    /// Per-file transfer history, legacy upload completions and failures.
    States(Vec<TaskState>),
    /// Progress snapshot, every current-version notification.
    Progress(Progress),
    /// Bare failure reason, legacy download failures.
    Code(Reason),
    /// No payload, legacy download completions.
    Empty,
}

type Callback = Arc<dyn Fn(&NotifyPayload) + Send + Sync>;

/// Central notification dispatcher for task events.
#[derive(Clone, Default)]
pub struct Notifier {
    registry: Arc<Mutex<HashMap<(u32, SubscribeType), Callback>>>,
}

impl Notifier {
    /// Creates a dispatcher with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one task and subscribe type, replacing any
    /// previous registration for that pair.
    pub fn subscribe<F>(&self, task_id: u32, subscribe_type: SubscribeType, callback: F)
    where
        F: Fn(&NotifyPayload) + Send + Sync + 'static,
    {
        self.registry
            .lock()
            .unwrap()
            .insert((task_id, subscribe_type), Arc::new(callback));
    }

    /// Drops every registration belonging to one task.
    pub fn unsubscribe(&self, task_id: u32) {
        self.registry
            .lock()
            .unwrap()
            .retain(|(tid, _), _| *tid != task_id);
    }

    /// Notifies that a task has completed successfully.
    pub(crate) fn complete(&self, data: &NotifyData) {
        self.dispatch(SubscribeType::Complete, data, None);
    }

    /// Notifies that a task has failed.
    pub(crate) fn fail(&self, data: &NotifyData, reason: Reason) {
        self.dispatch(SubscribeType::Fail, data, Some(reason));
    }

    /// Notifies about the current progress of a task.
    pub(crate) fn progress(&self, data: &NotifyData) {
        let total_processed = data.progress.common_data.total_processed;
        let file_total_size: i64 = data.progress.sizes.iter().sum();
        // Nothing has moved and sizes are still unknown.
        if total_processed == 0 && file_total_size < 0 {
            return;
        }
        self.dispatch(SubscribeType::Progress, data, None);
    }

    /// Notifies that a task has been paused.
    pub(crate) fn pause(&self, data: &NotifyData) {
        self.dispatch(SubscribeType::Pause, data, None);
    }

    /// Notifies that a task has been resumed.
    pub(crate) fn resume(&self, data: &NotifyData) {
        self.dispatch(SubscribeType::Resume, data, None);
    }

    /// Notifies that a task has been removed and drops its registrations.
    ///
    /// Removal of an upload task is not forwarded; the historical interface
    /// never carried it, so it stays a logged no-op.
    pub(crate) fn remove(&self, data: &NotifyData) {
        if data.action == Action::Upload {
            info!("skip remove notification for upload task {}", data.task_id);
        } else {
            self.dispatch(SubscribeType::Remove, data, None);
        }
        self.unsubscribe(data.task_id);
    }

    /// Notifies that response metadata arrived for a task.
    pub(crate) fn response(&self, data: &NotifyData) {
        self.dispatch(SubscribeType::Response, data, None);
    }

    fn dispatch(&self, subscribe_type: SubscribeType, data: &NotifyData, reason: Option<Reason>) {
        let Some(payload) = shape_payload(subscribe_type, data, reason) else {
            error!(
                "drop malformed {:?} notification for task {}",
                subscribe_type, data.task_id
            );
            return;
        };
        // The handle is cloned out so the registry lock is released before
        // the call; a callback may re-enter the notifier.
        let callback = self
            .registry
            .lock()
            .unwrap()
            .get(&(data.task_id, subscribe_type))
            .cloned();
        if let Some(callback) = callback {
            callback(&payload);
        }
    }
}

/// Shapes the notification payload according to the task's API version.
///
/// Returns `None` when the snapshot is internally inconsistent, which drops
/// the notification instead of handing garbage to a subscriber.
fn shape_payload(
    subscribe_type: SubscribeType,
    data: &NotifyData,
    reason: Option<Reason>,
) -> Option<NotifyPayload> {
    let progress = &data.progress;
    if progress.processed.len() != progress.sizes.len()
        || progress.common_data.index > progress.sizes.len()
    {
        return None;
    }
    if data.version == Version::API10 {
        return Some(NotifyPayload::Progress(progress.clone()));
    }
    match (data.action, subscribe_type) {
        (Action::Upload, SubscribeType::Complete) | (Action::Upload, SubscribeType::Fail) => {
            Some(NotifyPayload::States(data.task_states.clone()))
        }
        (Action::Download, SubscribeType::Fail) => Some(NotifyPayload::Code(reason?)),
        _ => Some(NotifyPayload::Empty),
    }
}
