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

use super::*;

// @tc.name: ut_reason_from_u8
// @tc.desc: Test Reason raw value conversions
// @tc.precon: NA
// @tc.step: 1. Convert known raw values through From<u8>
//           2. Convert an unknown raw value
// @tc.expect: Known values map to their variants, unknown values map to
// OthersError
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_reason_from_u8() {
    assert_eq!(Reason::from(0), Reason::Default);
    assert_eq!(Reason::from(5), Reason::UserOperation);
    assert_eq!(Reason::from(7), Reason::NetworkOffline);
    assert_eq!(Reason::from(18), Reason::IoError);
    assert_eq!(Reason::from(31), Reason::LowSpeed);
    assert_eq!(Reason::from(200), Reason::OthersError);
}

// @tc.name: ut_reason_to_str
// @tc.desc: Test Reason descriptions are non-empty
// @tc.precon: NA
// @tc.step: 1. Fetch the description for several variants
// @tc.expect: Default carries no text, every failure variant carries a
// non-empty description
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_reason_to_str() {
    assert!(Reason::Default.to_str().is_empty());
    for value in [1u8, 5, 7, 14, 18, 23, 31] {
        assert!(!Reason::from(value).to_str().is_empty());
    }
}

// @tc.name: ut_reason_retryable
// @tc.desc: Test the retryable fault subset
// @tc.precon: NA
// @tc.step: 1. Check is_retryable for transient network faults
//           2. Check is_retryable for permanent faults
// @tc.expect: Offline, timeout, dns, tcp, ssl and low speed are retryable,
// user operations and protocol errors are not
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_reason_retryable() {
    assert!(Reason::NetworkOffline.is_retryable());
    assert!(Reason::ContinuousTaskTimeout.is_retryable());
    assert!(Reason::Dns.is_retryable());
    assert!(Reason::Tcp.is_retryable());
    assert!(Reason::Ssl.is_retryable());
    assert!(Reason::LowSpeed.is_retryable());
    assert!(!Reason::UserOperation.is_retryable());
    assert!(!Reason::ProtocolError.is_retryable());
    assert!(!Reason::InsufficientSpace.is_retryable());
}

// @tc.name: ut_faults_repr
// @tc.desc: Test Faults raw values and conversions
// @tc.precon: NA
// @tc.step: 1. Cast each Faults variant to u8
//           2. Convert raw values back through From<u8>
// @tc.expect: The documented hex values round-trip, unknown values map to
// Others
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_faults_repr() {
    assert_eq!(Faults::Disconnected as u8, 0x00);
    assert_eq!(Faults::Timeout as u8, 0x10);
    assert_eq!(Faults::Protocol as u8, 0x20);
    assert_eq!(Faults::Fsio as u8, 0x40);
    assert_eq!(Faults::Others as u8, 0xFF);
    assert_eq!(Faults::from(0x40), Faults::Fsio);
    assert_eq!(Faults::from(0x33), Faults::Others);
}

// @tc.name: ut_faults_classification
// @tc.desc: Test coarse fault classification of failure reasons
// @tc.precon: NA
// @tc.step: 1. Convert representative reasons into Faults
// @tc.expect: Network reasons classify as Disconnected, timeouts as Timeout,
// protocol violations as Protocol, local I/O as Fsio, the rest as Others
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_faults_classification() {
    assert_eq!(Faults::from(Reason::NetworkOffline), Faults::Disconnected);
    assert_eq!(Faults::from(Reason::Dns), Faults::Disconnected);
    assert_eq!(Faults::from(Reason::ContinuousTaskTimeout), Faults::Timeout);
    assert_eq!(Faults::from(Reason::LowSpeed), Faults::Timeout);
    assert_eq!(Faults::from(Reason::ProtocolError), Faults::Protocol);
    assert_eq!(Faults::from(Reason::RequestError), Faults::Protocol);
    assert_eq!(Faults::from(Reason::IoError), Faults::Fsio);
    assert_eq!(Faults::from(Reason::InsufficientSpace), Faults::Fsio);
    assert_eq!(Faults::from(Reason::UserOperation), Faults::Others);
}

// @tc.name: ut_reason_from_faults
// @tc.desc: Test mapping adapter faults back to failure reasons
// @tc.precon: NA
// @tc.step: 1. Convert every Faults variant into a Reason
// @tc.expect: Each fault maps to a representative reason of its class
// @tc.type: FUNC
// @tc.require: issues#ICN16H
#[test]
fn ut_reason_from_faults() {
    assert_eq!(Reason::from(Faults::Disconnected), Reason::NetworkOffline);
    assert_eq!(Reason::from(Faults::Timeout), Reason::ContinuousTaskTimeout);
    assert_eq!(Reason::from(Faults::Protocol), Reason::ProtocolError);
    assert_eq!(Reason::from(Faults::Fsio), Reason::IoError);
    assert_eq!(Reason::from(Faults::Others), Reason::OthersError);
}
