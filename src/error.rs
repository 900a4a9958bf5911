// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Bestin library.
//!
//! Failures are split by layer: value validation (rejected before any
//! network traffic), transport, response parsing, and the combined
//! [`ExchangeError`] that a single request/response round trip can produce.
//!
//! Room operations never return exchange failures to the caller. They log the
//! failure kind and report [`Refresh::Stale`](crate::Refresh::Stale) instead,
//! keeping the previously cached state.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A value was rejected before any request was sent.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A request/response exchange with the controller failed.
    #[error("exchange failed: {0}")]
    Exchange(#[from] ExchangeError),
}

/// Errors related to value validation and command preconditions.
///
/// These are programming-contract errors: the caller asked for something the
/// room cannot do, so the request is never sent.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// An on/off literal other than `on` or `off` was provided.
    #[error("invalid switch state: {0}")]
    InvalidSwitchState(String),

    /// The unit has never been reported by the controller for this room.
    #[error("unit {unit} is not known in room {room}")]
    UnknownUnit {
        /// The room that was addressed.
        room: String,
        /// The unit that was requested.
        unit: String,
    },

    /// No target temperature was given and none has been fetched yet.
    #[error("room {room} has no known target temperature")]
    MissingTargetTemperature {
        /// The room that was addressed.
        room: String,
    },

    /// The thermostat heat status is not known yet.
    #[error("room {room} has no known heat status")]
    MissingHeatStatus {
        /// The room that was addressed.
        room: String,
    },

    /// A temperature is outside the thermostat's accepted range.
    #[error("temperature {actual} is out of range [{min}, {max}]")]
    TemperatureOutOfRange {
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
        /// The actual value that was provided.
        actual: f32,
    },

    /// A room name was empty.
    #[error("room name must not be empty")]
    EmptyRoomName,
}

/// Errors related to the TCP transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Connection to the controller failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Reading from or writing to the socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connecting or waiting for the first response byte timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid host or port.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing controller responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The response document is not well-formed or does not match the schema.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// The response was empty.
    #[error("empty response")]
    Empty,

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// A composite value did not have the expected shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Failure of a single request/response round trip.
///
/// All variants mean the same thing to a room ("no usable data"); the
/// distinct kinds are kept for diagnostics.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The request could not be delivered or the response not read.
    #[error("transport: {0}")]
    Transport(#[from] ProtocolError),

    /// The response bytes are not valid EUC-KR.
    #[error("response of {len} bytes could not be decoded as EUC-KR")]
    Decode {
        /// Number of undecodable bytes received.
        len: usize,
    },

    /// The response could not be parsed.
    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    /// The controller answered with a result other than `ok`.
    #[error("controller rejected request with result {0:?}")]
    Rejected(String),
}

impl ExchangeError {
    /// Returns a short label for the failure kind, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Decode { .. } => "decode",
            Self::Parse(_) => "parse",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::UnknownUnit {
            room: "living".to_string(),
            unit: "7".to_string(),
        };
        assert_eq!(err.to_string(), "unit 7 is not known in room living");
    }

    #[test]
    fn temperature_range_display() {
        let err = ValueError::TemperatureOutOfRange {
            min: 5.0,
            max: 40.0,
            actual: 45.5,
        };
        assert_eq!(err.to_string(), "temperature 45.5 is out of range [5, 40]");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::EmptyRoomName.into();
        assert!(matches!(err, Error::Value(ValueError::EmptyRoomName)));
    }

    #[test]
    fn exchange_error_kinds() {
        let transport = ExchangeError::from(ProtocolError::Timeout(500));
        assert_eq!(transport.kind(), "transport");
        assert_eq!(ExchangeError::Decode { len: 3 }.kind(), "decode");
        assert_eq!(ExchangeError::from(ParseError::Empty).kind(), "parse");
        assert_eq!(ExchangeError::Rejected("fail".into()).kind(), "rejected");
    }

    #[test]
    fn rejected_display_quotes_result() {
        let err = ExchangeError::Rejected("fail".to_string());
        assert_eq!(
            err.to_string(),
            "controller rejected request with result \"fail\""
        );
    }
}
