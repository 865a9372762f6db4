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

//! Background transfer task service.
//!
//! This service tracks download and upload tasks end-to-end: it persists their
//! configuration and progress, drives their state machine against a pluggable
//! transfer adapter, and delivers typed notifications to subscribers.

#![warn(
    missing_docs,
    clippy::redundant_static_lifetimes,
    clippy::enum_variant_names,
    clippy::clone_on_copy,
    clippy::unused_async
)]

#[macro_use]
extern crate log;

mod error;
mod manage;
mod task;
mod utils;

pub use error::ErrorCode;
pub use manage::adapter::{ResumeKind, TransferAdapter, TransferContext};
pub use manage::database::Database;
pub use manage::notifier::{Notifier, NotifyPayload};
pub use manage::query::TaskFilter;
pub use manage::task_manager::{TaskManager, TaskManagerTx};
pub use task::{config, info, notify, reason};
pub use utils::form_item::{FileSpec, FormItem};
pub use utils::Recv;
