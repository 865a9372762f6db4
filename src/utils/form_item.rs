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

/// A single name/value pair carried in a multipart upload form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormItem {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
}

/// Describes one file attached to a task.
///
/// Downloads carry exactly one spec (the destination file); uploads carry one
/// per file to send.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSpec {
    /// Form field name the file is sent under.
    pub name: String,
    /// Local filesystem path.
    pub path: String,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of the content.
    pub mime_type: String,
}

impl FileSpec {
    /// Creates a spec for a local path, deriving the reported file name from
    /// the last path component.
    pub fn new(path: &str) -> Self {
        Self {
            name: "file".to_string(),
            path: path.to_string(),
            file_name: path.rsplit('/').next().unwrap_or(path).to_string(),
            mime_type: String::new(),
        }
    }
}
