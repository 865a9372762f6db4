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

//! Task entities: configuration, runtime info, progress, fault reasons and
//! the JSON wire codec shared by the store and the notification layer.

pub mod codec;
pub mod config;
pub mod info;
pub mod notify;
pub mod reason;

pub(crate) mod request_task;

/// Ceiling on automatic retry attempts for one task.
pub(crate) const MAX_RETRIES: u32 = 3;
