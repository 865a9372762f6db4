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

use std::collections::HashMap;

use crate::error::ErrorCode;
use crate::utils::form_item::{FileSpec, FormItem};

/// Specifies the type of network task to perform.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Action {
    /// Download action for retrieving data from a server.
    Download = 0,
    /// Upload action for sending data to a server.
    Upload = 1,
    /// Wildcard action that matches any operation type in filters.
    Any = 2,
}

/// Determines the execution context for a task.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Mode {
    /// Task runs in the background with lower priority.
    BackGround = 0,
    /// Task runs in the foreground with higher priority.
    FrontEnd = 1,
    /// Wildcard mode that matches any execution context in filters.
    Any = 2,
}

/// Represents the API version a task was created under.
///
/// The version tag decides which payload shape notifications deliver, see
/// [`crate::manage::notifier`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Version {
    /// Legacy API surface.
    API9 = 1,
    /// Current API surface.
    API10 = 2,
}

/// Specifies the network type required for task execution.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum NetworkConfig {
    /// Task can run on any available network type.
    Any = 0,
    /// Task requires a Wi-Fi connection.
    Wifi = 1,
    /// Task requires a cellular network connection.
    Cellular = 2,
}

/// Core configuration shared by all types of network tasks.
#[derive(Copy, Clone, Debug)]
pub struct CommonTaskConfig {
    /// Unique identifier for the task, assigned at creation.
    pub task_id: u32,
    /// Type of operation (download or upload). Fixed for the task lifetime.
    pub action: Action,
    /// Execution context. Fixed for the task lifetime.
    pub mode: Mode,
    /// Network type requirements.
    pub network: NetworkConfig,
    /// Whether task can run on metered networks.
    pub metered: bool,
    /// Whether task can run while roaming.
    pub roaming: bool,
    /// Whether to retry transient failures automatically.
    pub retry: bool,
    /// Whether to follow HTTP redirects.
    pub redirect: bool,
    /// Index of the file the transfer begins with.
    pub index: u32,
    /// Download range start in bytes.
    pub begins: u64,
    /// Download range end in bytes (-1 for the whole resource).
    pub ends: i64,
    /// Whether progress notifications are delivered.
    pub gauge: bool,
    /// Whether the total size must be known before the transfer starts.
    pub precise: bool,
    /// Whether to overwrite an existing destination file.
    pub overwrite: bool,
    /// Whether the task keeps running in the background.
    pub background: bool,
    /// Priority level for task ordering.
    pub priority: u32,
}

/// Complete configuration for a network task.
///
/// Immutable descriptor supplied at creation; the controller never mutates a
/// config after the task is constructed.
#[derive(Clone, Debug)]
pub struct TaskConfig {
    /// Target URL for the network operation.
    pub url: String,
    /// Human-readable title for the task.
    pub title: String,
    /// Detailed description of the task.
    pub description: String,
    /// HTTP method to use.
    pub method: String,
    /// Destination path for downloads.
    pub saveas: String,
    /// Proxy server configuration.
    pub proxy: String,
    /// Authentication token.
    pub token: String,
    /// Request body data.
    pub data: String,
    /// HTTP headers to include in the request.
    pub headers: HashMap<String, String>,
    /// Additional custom parameters.
    pub extras: HashMap<String, String>,
    /// API version the task was created under.
    pub version: Version,
    /// Form data items for upload requests.
    pub form_items: Vec<FormItem>,
    /// File specifications for upload/download operations.
    pub file_specs: Vec<FileSpec>,
    /// Core configuration shared across task types.
    pub common_data: CommonTaskConfig,
}

impl From<u8> for Action {
    fn from(value: u8) -> Self {
        match value {
            0 => Action::Download,
            1 => Action::Upload,
            _ => Action::Any,
        }
    }
}

impl From<u8> for Mode {
    fn from(value: u8) -> Self {
        match value {
            0 => Mode::BackGround,
            1 => Mode::FrontEnd,
            _ => Mode::Any,
        }
    }
}

impl From<u8> for Version {
    fn from(value: u8) -> Self {
        match value {
            2 => Version::API10,
            _ => Version::API9,
        }
    }
}

impl From<u8> for NetworkConfig {
    fn from(value: u8) -> Self {
        match value {
            0 => NetworkConfig::Any,
            2 => NetworkConfig::Cellular,
            _ => NetworkConfig::Wifi,
        }
    }
}

impl TaskConfig {
    /// Validates the config at task creation time.
    ///
    /// Rejections here surface synchronously to the caller as
    /// `ErrorCode::ParameterCheck`; nothing is persisted for an invalid
    /// config.
    pub(crate) fn validate(&self) -> Result<(), ErrorCode> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            error!("config validate failed: bad url");
            return Err(ErrorCode::ParameterCheck);
        }
        match self.common_data.action {
            Action::Download => {
                if self.saveas.is_empty() {
                    error!("config validate failed: download without saveas");
                    return Err(ErrorCode::ParameterCheck);
                }
            }
            Action::Upload => {
                if self.file_specs.is_empty() {
                    error!("config validate failed: upload without files");
                    return Err(ErrorCode::ParameterCheck);
                }
            }
            Action::Any => {
                error!("config validate failed: wildcard action");
                return Err(ErrorCode::ParameterCheck);
            }
        }
        Ok(())
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            url: "".to_string(),
            title: "".to_string(),
            description: "".to_string(),
            method: "GET".to_string(),
            saveas: "".to_string(),
            proxy: "".to_string(),
            token: "".to_string(),
            data: "".to_string(),
            headers: Default::default(),
            extras: Default::default(),
            version: Version::API10,
            form_items: vec![],
            file_specs: vec![],
            common_data: CommonTaskConfig {
                task_id: 0,
                action: Action::Download,
                mode: Mode::BackGround,
                network: NetworkConfig::Any,
                metered: false,
                roaming: false,
                retry: false,
                redirect: true,
                index: 0,
                begins: 0,
                ends: -1,
                gauge: false,
                precise: false,
                overwrite: false,
                background: false,
                priority: 0,
            },
        }
    }
}

/// Builder pattern for constructing [`TaskConfig`] instances.
pub struct ConfigBuilder {
    inner: TaskConfig,
}

impl ConfigBuilder {
    /// Creates a new builder with default task configuration.
    pub fn new() -> Self {
        Self {
            inner: TaskConfig::default(),
        }
    }

    /// Sets the target URL for the network operation.
    pub fn url(&mut self, url: &str) -> &mut Self {
        self.inner.url = url.to_string();
        self
    }

    /// Sets the API version compatibility level.
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.inner.version = version;
        self
    }

    /// Sets the operation type (download or upload).
    pub fn action(&mut self, action: Action) -> &mut Self {
        self.inner.common_data.action = action;
        self
    }

    /// Sets the execution context (background or foreground).
    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.inner.common_data.mode = mode;
        self
    }

    /// Sets the download destination path.
    pub fn saveas(&mut self, saveas: &str) -> &mut Self {
        self.inner.saveas = saveas.to_string();
        self
    }

    /// Adds a file to the task.
    pub fn file_spec(&mut self, spec: FileSpec) -> &mut Self {
        self.inner.file_specs.push(spec);
        self
    }

    /// Adds a form item to the upload body.
    pub fn form_item(&mut self, item: FormItem) -> &mut Self {
        self.inner.form_items.push(item);
        self
    }

    /// Sets the network type requirements for the task.
    pub fn network(&mut self, network: NetworkConfig) -> &mut Self {
        self.inner.common_data.network = network;
        self
    }

    /// Sets whether the task can run while roaming.
    pub fn roaming(&mut self, roaming: bool) -> &mut Self {
        self.inner.common_data.roaming = roaming;
        self
    }

    /// Sets whether the task can run on metered networks.
    pub fn metered(&mut self, metered: bool) -> &mut Self {
        self.inner.common_data.metered = metered;
        self
    }

    /// Sets whether to follow HTTP redirects.
    pub fn redirect(&mut self, redirect: bool) -> &mut Self {
        self.inner.common_data.redirect = redirect;
        self
    }

    /// Sets whether transient failures are retried automatically.
    pub fn retry(&mut self, retry: bool) -> &mut Self {
        self.inner.common_data.retry = retry;
        self
    }

    /// Sets the download range start in bytes.
    pub fn begins(&mut self, begins: u64) -> &mut Self {
        self.inner.common_data.begins = begins;
        self
    }

    /// Sets the download range end in bytes.
    pub fn ends(&mut self, ends: i64) -> &mut Self {
        self.inner.common_data.ends = ends;
        self
    }

    /// Sets the HTTP method to use for the request.
    pub fn method(&mut self, method: &str) -> &mut Self {
        self.inner.method = method.to_string();
        self
    }

    /// Sets the human-readable title.
    pub fn title(&mut self, title: &str) -> &mut Self {
        self.inner.title = title.to_string();
        self
    }

    /// Constructs the final `TaskConfig` from the builder's current state.
    pub fn build(&mut self) -> TaskConfig {
        self.inner.clone()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
