// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport that replays canned responses, for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ProtocolError;
use crate::protocol::{Endpoint, Protocol, RawResponse};

type Reply = Result<RawResponse, ProtocolError>;

/// Replays queued replies in order and records every request sent.
///
/// Clones share the same queue and request log. Requests sent after the
/// queue runs dry fail with a connection error.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedProtocol {
    endpoint: Endpoint,
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProtocol {
    pub(crate) fn new() -> Self {
        Self {
            endpoint: Endpoint::new("192.168.50.200", 10000),
            replies: Arc::default(),
            requests: Arc::default(),
        }
    }

    pub(crate) fn reply(&self, body: impl Into<String>) -> &Self {
        self.replies.lock().push_back(Ok(RawResponse::text(body)));
        self
    }

    pub(crate) fn reply_raw(&self, response: RawResponse) -> &Self {
        self.replies.lock().push_back(Ok(response));
        self
    }

    pub(crate) fn fail(&self, error: ProtocolError) -> &Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub(crate) fn last_request(&self) -> Option<String> {
        self.requests.lock().last().cloned()
    }
}

impl Protocol for ScriptedProtocol {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn request(&self, payload: &[u8]) -> Result<RawResponse, ProtocolError> {
        self.requests
            .lock()
            .push(String::from_utf8_lossy(payload).into_owned());
        self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(ProtocolError::ConnectionFailed(
                "no scripted reply left".to_string(),
            ))
        })
    }
}

/// Builds a controller response carrying the given `status_info` pairs.
pub(crate) fn switch_response(units: &[(&str, &str)]) -> String {
    let infos: String = units
        .iter()
        .map(|(unit, status)| {
            format!(r#"<status_info unit_num="{unit}" unit_status="{status}"/>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="euc-kr"?><imap ver="1.0" address="192.168.50.200" sender="server"><service type="reply" name="remote_access_light" result="ok">{infos}</service></imap>"#
    )
}

/// Builds a thermostat response with one composite status.
pub(crate) fn thermostat_response(unit: &str, status: &str) -> String {
    switch_response(&[(unit, status)])
}

/// Builds a response the controller rejected.
pub(crate) fn rejected_response() -> String {
    r#"<?xml version="1.0" encoding="euc-kr"?><imap ver="1.0"><service type="reply" name="remote_access_light" result="fail"/></imap>"#.to_string()
}
