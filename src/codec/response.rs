// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response document parsing.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

use crate::error::{ExchangeError, ParseError};
use crate::protocol::ResponseBody;

/// One `status_info` entry of a response.
///
/// Switch services report one entry per unit. The thermostat service reports
/// a single entry whose status is the composite `<state>/<target>/<current>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusInfo {
    #[serde(rename = "@unit_num")]
    unit_num: String,
    #[serde(rename = "@unit_status")]
    unit_status: String,
}

impl StatusInfo {
    /// Creates an entry.
    #[must_use]
    pub fn new(unit_num: impl Into<String>, unit_status: impl Into<String>) -> Self {
        Self {
            unit_num: unit_num.into(),
            unit_status: unit_status.into(),
        }
    }

    /// Returns the unit number.
    #[must_use]
    pub fn unit_num(&self) -> &str {
        &self.unit_num
    }

    /// Returns the unit status.
    #[must_use]
    pub fn unit_status(&self) -> &str {
        &self.unit_status
    }
}

/// Root element of every controller document.
const ROOT: &str = "imap";

#[derive(Debug, Deserialize)]
struct Envelope {
    service: ServiceReply,
}

#[derive(Debug, Deserialize)]
struct ServiceReply {
    #[serde(rename = "@result")]
    result: Option<String>,
    #[serde(default)]
    status_info: Vec<StatusInfo>,
}

/// Parses a response document.
///
/// Returns the `status_info` entries of a successful response. Empty input,
/// malformed XML, a root other than `imap`, a missing or non-`ok` result, and
/// a missing payload are all failures.
///
/// # Errors
///
/// Returns `ExchangeError::Parse` or `ExchangeError::Rejected`.
///
/// # Examples
///
/// ```
/// use bestin_lib::codec::parse_response;
///
/// let xml = r#"<imap><service result="ok">
///     <status_info unit_num="1" unit_status="on"/>
///     <status_info unit_num="2" unit_status="off"/>
/// </service></imap>"#;
/// let infos = parse_response(xml).unwrap();
/// assert_eq!(infos.len(), 2);
/// assert_eq!(infos[1].unit_status(), "off");
///
/// assert!(parse_response("").is_err());
/// assert!(parse_response(r#"<imap><service result="fail"/></imap>"#).is_err());
/// ```
pub fn parse_response(text: &str) -> Result<Vec<StatusInfo>, ExchangeError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty.into());
    }

    let envelope: Envelope = quick_xml::de::from_str(text).map_err(ParseError::from)?;
    if root_name(text).as_deref() != Some(ROOT) {
        return Err(ParseError::MissingField(ROOT.to_string()).into());
    }
    let service = envelope.service;

    match service.result.as_deref() {
        Some("ok") => {}
        Some(other) => return Err(ExchangeError::Rejected(other.to_string())),
        None => return Err(ParseError::MissingField("service/@result".to_string()).into()),
    }

    if service.status_info.is_empty() {
        return Err(ParseError::MissingField("status_info".to_string()).into());
    }

    Ok(service.status_info)
}

/// Returns the name of the document's root element.
fn root_name(text: &str) -> Option<String> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

/// Parses a response body as read from the transport.
///
/// # Errors
///
/// Returns `ExchangeError::Decode` for a body that was not valid EUC-KR, and
/// otherwise the errors of [`parse_response`].
pub fn parse_body(body: &ResponseBody) -> Result<Vec<StatusInfo>, ExchangeError> {
    match body {
        ResponseBody::Text(text) => parse_response(text),
        ResponseBody::Undecodable(bytes) => Err(ExchangeError::Decode { len: bytes.len() }),
    }
}
