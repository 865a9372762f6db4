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

//! Helpers shared across the service: time, runtime spawning and the blocking
//! oneshot wrapper used by command senders.

pub(crate) mod form_item;

use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use tokio::runtime::Runtime;
use tokio::sync::oneshot::Receiver;

/// A wrapper around a oneshot receiver that provides a blocking API.
pub struct Recv<T> {
    rx: Receiver<T>,
}

impl<T> Recv<T> {
    pub(crate) fn new(rx: Receiver<T>) -> Self {
        Self { rx }
    }

    /// Retrieves the value from the oneshot channel, blocking the current
    /// thread.
    ///
    /// Returns `None` if the sender was dropped before sending a value.
    pub fn get(self) -> Option<T> {
        self.rx.blocking_recv().ok()
    }
}

/// Spawns a future onto the service runtime.
pub(crate) fn runtime_spawn<F: Future<Output = ()> + Send + 'static>(fut: F) {
    static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .build()
            .unwrap()
    });
    RUNTIME.spawn(fut);
}

/// Returns the current timestamp in milliseconds since the Unix epoch.
pub(crate) fn get_current_timestamp() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_millis() as u64,
        Err(e) => {
            error!("Gets current timestamp failed {:?}", e);
            0
        }
    }
}
