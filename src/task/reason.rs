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

//! Fault reasons recorded on tasks and the coarse fault classes surfaced to
//! callers.

/// Enum representing task state and error reasons.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Reason {
    /// Default reason (no specific reason).
    Default = 0,
    /// Task has been pending for one month without completion.
    TaskSurvivalOneMonth = 1,
    /// Action performed by the user.
    UserOperation = 5,
    /// Network connection is offline.
    NetworkOffline = 7,
    /// Network type is not supported for the task.
    UnsupportedNetworkType = 8,
    /// Failed to construct the request.
    BuildRequestFailed = 10,
    /// Failed to retrieve file size information from the server.
    GetFileSizeFailed = 11,
    /// Continuous task processing timed out.
    ContinuousTaskTimeout = 12,
    /// General request error.
    RequestError = 14,
    /// File upload failed.
    UploadFileError = 15,
    /// HTTP redirect processing error.
    RedirectError = 16,
    /// HTTP protocol violation.
    ProtocolError = 17,
    /// Input/output operation failed.
    IoError = 18,
    /// Server does not support range requests.
    UnsupportedRangeRequest = 19,
    /// Catch-all for other errors not explicitly defined.
    OthersError = 20,
    /// DNS resolution failed.
    Dns = 23,
    /// TCP connection error.
    Tcp = 24,
    /// SSL/TLS handshake or connection error.
    Ssl = 25,
    /// Insufficient storage space available.
    InsufficientSpace = 26,
    /// Transfer speed stayed below the configured minimum.
    LowSpeed = 31,
}

impl From<u8> for Reason {
    fn from(value: u8) -> Self {
        match value {
            0 => Reason::Default,
            1 => Reason::TaskSurvivalOneMonth,
            5 => Reason::UserOperation,
            7 => Reason::NetworkOffline,
            8 => Reason::UnsupportedNetworkType,
            10 => Reason::BuildRequestFailed,
            11 => Reason::GetFileSizeFailed,
            12 => Reason::ContinuousTaskTimeout,
            14 => Reason::RequestError,
            15 => Reason::UploadFileError,
            16 => Reason::RedirectError,
            17 => Reason::ProtocolError,
            18 => Reason::IoError,
            19 => Reason::UnsupportedRangeRequest,
            23 => Reason::Dns,
            24 => Reason::Tcp,
            25 => Reason::Ssl,
            26 => Reason::InsufficientSpace,
            31 => Reason::LowSpeed,
            _ => Reason::OthersError,
        }
    }
}

impl Reason {
    /// Converts the reason to a descriptive string.
    pub fn to_str(self) -> &'static str {
        match self {
            Reason::Default => "",
            Reason::TaskSurvivalOneMonth => "The task has not been completed for a month yet",
            Reason::UserOperation => "User operation",
            Reason::NetworkOffline => "NetWork is offline",
            Reason::UnsupportedNetworkType => "NetWork type not meet the task config",
            Reason::BuildRequestFailed => "Build request error",
            Reason::GetFileSizeFailed => {
                "Failed because cannot get the file size from the server"
            }
            Reason::ContinuousTaskTimeout => "Continuous processing task time out",
            Reason::RequestError => "Request error",
            Reason::UploadFileError => "There are some files upload failed",
            Reason::RedirectError => "Redirect error",
            Reason::ProtocolError => "Http protocol error",
            Reason::IoError => "Io Error",
            Reason::UnsupportedRangeRequest => "The server is not support range request",
            Reason::OthersError => "Some other error occured",
            Reason::Dns => "DNS error",
            Reason::Tcp => "TCP error",
            Reason::Ssl => "TSL/SSL error",
            Reason::InsufficientSpace => "Insufficient space",
            Reason::LowSpeed => "Below low speed limit",
        }
    }

    /// Whether a task failing for this reason may be retried automatically.
    ///
    /// Only transient transfer-layer conditions qualify; protocol violations
    /// and local I/O failures always surface as `Failed`.
    pub(crate) fn is_retryable(self) -> bool {
        matches!(
            self,
            Reason::NetworkOffline
                | Reason::ContinuousTaskTimeout
                | Reason::Dns
                | Reason::Tcp
                | Reason::Ssl
                | Reason::LowSpeed
        )
    }
}

/// Coarse fault classification recorded on failed tasks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Faults {
    /// Connection to the peer was lost.
    Disconnected = 0x00,
    /// The transfer timed out.
    Timeout = 0x10,
    /// The peer violated the transfer protocol.
    Protocol = 0x20,
    /// A local filesystem or store operation failed.
    Fsio = 0x40,
    /// Unclassified fault.
    Others = 0xFF,
}

impl From<u8> for Faults {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Faults::Disconnected,
            0x10 => Faults::Timeout,
            0x20 => Faults::Protocol,
            0x40 => Faults::Fsio,
            _ => Faults::Others,
        }
    }
}

impl From<Reason> for Faults {
    fn from(value: Reason) -> Self {
        match value {
            Reason::NetworkOffline
            | Reason::UnsupportedNetworkType
            | Reason::Dns
            | Reason::Tcp
            | Reason::Ssl => Faults::Disconnected,
            Reason::ContinuousTaskTimeout | Reason::LowSpeed => Faults::Timeout,
            Reason::ProtocolError
            | Reason::RedirectError
            | Reason::RequestError
            | Reason::UnsupportedRangeRequest => Faults::Protocol,
            Reason::IoError | Reason::InsufficientSpace | Reason::GetFileSizeFailed => Faults::Fsio,
            _ => Faults::Others,
        }
    }
}

impl From<Faults> for Reason {
    fn from(value: Faults) -> Self {
        match value {
            Faults::Disconnected => Reason::NetworkOffline,
            Faults::Timeout => Reason::ContinuousTaskTimeout,
            Faults::Protocol => Reason::ProtocolError,
            Faults::Fsio => Reason::IoError,
            Faults::Others => Reason::OthersError,
        }
    }
}
