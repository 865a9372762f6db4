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

//! Seam between the task manager and the actual transfer machinery.
//!
//! The manager never performs network or file I/O itself; it drives an
//! implementation of [`TransferAdapter`] and receives progress and
//! completion reports back through the manager's event channel.

use crate::task::config::TaskConfig;
use crate::task::reason::Faults;

/// Everything an adapter needs to begin or continue one transfer.
#[derive(Clone, Debug)]
pub struct TransferContext {
    /// Identifier of the task being transferred.
    pub task_id: u32,
    /// Full configuration of the task.
    pub config: TaskConfig,
    /// Bytes already transferred per file, for range continuation.
    pub processed: Vec<u64>,
}

/// How an adapter continues a paused transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeKind {
    /// The remote end honors range requests; transfer continues from the
    /// recorded offsets.
    Partial,
    /// Range continuation is not available; the transfer starts over from
    /// byte zero.
    Restart,
}

/// Driver for the actual byte movement of a task.
///
/// Calls are issued from the manager's event loop and must return quickly;
/// long-running work happens on the adapter's own executor, reporting back
/// asynchronously via `TaskManagerTx`. All methods are keyed by task id so a
/// single adapter instance serves every task.
#[cfg_attr(test, mockall::automock)]
pub trait TransferAdapter: Send + Sync {
    /// Begins the transfer described by `ctx`.
    fn start(&self, ctx: &TransferContext) -> Result<(), Faults>;

    /// Suspends the transfer, preserving byte offsets where possible.
    fn pause(&self, task_id: u32) -> Result<(), Faults>;

    /// Continues a previously paused transfer.
    fn resume(&self, task_id: u32) -> Result<ResumeKind, Faults>;

    /// Cancels the transfer and releases its resources.
    fn stop(&self, task_id: u32) -> Result<(), Faults>;
}
