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

// @tc.name: ut_event_service_constructors
// @tc.desc: Test that command constructors build the matching service events
// @tc.precon: NA
// @tc.step: 1. Build construct, start, pause, resume, stop and remove events
// @tc.expect: Each carries its variant and task id
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_event_service_constructors() {
    let (event, _rx) = TaskManagerEvent::construct(TaskConfig::default());
    assert!(matches!(
        event,
        TaskManagerEvent::Service(ServiceEvent::Construct(..))
    ));

    let (event, _rx) = TaskManagerEvent::start(7);
    assert!(matches!(
        event,
        TaskManagerEvent::Service(ServiceEvent::Start(7, _))
    ));

    let (event, _rx) = TaskManagerEvent::pause(7);
    assert!(matches!(
        event,
        TaskManagerEvent::Service(ServiceEvent::Pause(7, _))
    ));

    let (event, _rx) = TaskManagerEvent::resume(7);
    assert!(matches!(
        event,
        TaskManagerEvent::Service(ServiceEvent::Resume(7, _))
    ));

    let (event, _rx) = TaskManagerEvent::stop(7);
    assert!(matches!(
        event,
        TaskManagerEvent::Service(ServiceEvent::Stop(7, _))
    ));

    let (event, _rx) = TaskManagerEvent::remove(7);
    assert!(matches!(
        event,
        TaskManagerEvent::Service(ServiceEvent::Remove(7, _))
    ));
}

// @tc.name: ut_event_query_constructors
// @tc.desc: Test that query constructors build the matching query events
// @tc.precon: NA
// @tc.step: 1. Build show, touch and search events
// @tc.expect: Each carries its variant, id and arguments
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_event_query_constructors() {
    let (event, _rx) = TaskManagerEvent::show(3);
    assert!(matches!(
        event,
        TaskManagerEvent::Query(QueryEvent::Show(3, _))
    ));

    let (event, _rx) = TaskManagerEvent::touch(3, "token".to_string());
    match event {
        TaskManagerEvent::Query(QueryEvent::Touch(task_id, token, _)) => {
            assert_eq!(task_id, 3);
            assert_eq!(token, "token");
        }
        other => panic!("unexpected event {:?}", other),
    }

    let (event, _rx) = TaskManagerEvent::search(TaskFilter::new());
    assert!(matches!(
        event,
        TaskManagerEvent::Query(QueryEvent::Search(..))
    ));
}

// @tc.name: ut_event_construct_reply
// @tc.desc: Test the reply channel paired with a command event
// @tc.precon: NA
// @tc.step: 1. Build a start event
//           2. Send an answer through the embedded sender
// @tc.expect: The receiver yields the answer
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_event_construct_reply() {
    let (event, rx) = TaskManagerEvent::start(11);
    let TaskManagerEvent::Service(ServiceEvent::Start(_, tx)) = event else {
        panic!("expected start event");
    };
    tx.send(ErrorCode::ErrOk).unwrap();
    assert_eq!(rx.get(), Some(ErrorCode::ErrOk));
}

// @tc.name: ut_event_reply_dropped
// @tc.desc: Test the receiver when the command is never answered
// @tc.precon: NA
// @tc.step: 1. Build a stop event and drop it unanswered
// @tc.expect: The receiver yields None
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_event_reply_dropped() {
    let (event, rx) = TaskManagerEvent::stop(11);
    drop(event);
    assert_eq!(rx.get(), None);
}

// @tc.name: ut_event_construct_debug
// @tc.desc: Test the debug rendering of a construct message
// @tc.precon: NA
// @tc.step: 1. Format a construct message holding a config
// @tc.expect: The rendering names the url but not the token
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_event_construct_debug() {
    let mut config = TaskConfig::default();
    config.url = "https://www.example.com/data.bin".to_string();
    config.token = "secret".to_string();
    let message = ConstructMessage { config };
    let rendered = format!("{:?}", message);
    assert!(rendered.contains("https://www.example.com/data.bin"));
    assert!(!rendered.contains("secret"));
}
