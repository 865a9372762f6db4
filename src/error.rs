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

/// Error codes returned to callers for rejected or failed commands.
///
/// Synchronous rejections (`ParameterCheck`, `TaskStateErr`) are reported
/// directly as the command result; transfer faults surface asynchronously
/// through the Fail notification channel instead.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorCode {
    /// Operation succeeded.
    ErrOk = 0,
    /// Task configuration failed validation at creation.
    ParameterCheck = 401,
    /// A file or store I/O operation failed.
    FileOperationErr = 13400001,
    /// Unclassified error.
    Other = 13499999,
    /// Task could not be enqueued.
    TaskEnqueueErr = 21900004,
    /// No task exists for the given id.
    TaskNotFound = 21900006,
    /// The command is illegal in the task's current state.
    TaskStateErr = 21900007,
}
