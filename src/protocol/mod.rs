// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport for the Bestin TCP/XML protocol.
//!
//! The controller speaks one request per connection: the client connects,
//! writes the whole request document, reads until the peer closes, and
//! disconnects. There is no length prefix or delimiter; the reader is
//! bounded by a byte cap and an idle timeout instead, and responses that hit
//! the cap are flagged as possibly truncated.
//!
//! - [`TcpClient`]: the production transport
//! - [`TcpConfig`]: connection parameters and client construction

mod tcp;

#[cfg(test)]
pub(crate) mod scripted;

pub use tcp::{TcpClient, TcpConfig};

use std::fmt;

use crate::error::ProtocolError;

/// Address of a Bestin controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Creates a new endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Body of a controller response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// The response decoded cleanly from EUC-KR.
    Text(String),
    /// The response was not valid EUC-KR; the raw bytes are kept.
    Undecodable(Vec<u8>),
}

/// A response as read from the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    body: ResponseBody,
    possibly_truncated: bool,
}

impl RawResponse {
    /// Decodes raw bytes received from the controller.
    ///
    /// Room and device labels may be Korean, so the controller answers in
    /// EUC-KR. Bytes that are not valid EUC-KR are kept as-is.
    #[must_use]
    pub fn decode(bytes: Vec<u8>, possibly_truncated: bool) -> Self {
        let decoded = encoding_rs::EUC_KR
            .decode_without_bom_handling_and_without_replacement(&bytes);
        let body = match decoded {
            Some(text) => ResponseBody::Text(text.into_owned()),
            None => ResponseBody::Undecodable(bytes),
        };
        Self {
            body,
            possibly_truncated,
        }
    }

    /// Creates a complete text response.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: ResponseBody::Text(body.into()),
            possibly_truncated: false,
        }
    }

    /// Returns the response body.
    #[must_use]
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Returns `true` if the read stopped at the byte cap.
    ///
    /// The protocol has no framing, so a response that exactly fills the cap
    /// may have been cut short even if it happens to parse.
    #[must_use]
    pub fn possibly_truncated(&self) -> bool {
        self.possibly_truncated
    }
}

/// Trait for transports that can exchange one request with a controller.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Returns the controller this transport talks to.
    fn endpoint(&self) -> &Endpoint;

    /// Sends `payload` as the whole request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if connecting, writing or reading fails.
    async fn request(&self, payload: &[u8]) -> Result<RawResponse, ProtocolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_display() {
        let endpoint = Endpoint::new("192.168.50.200", 10000);
        assert_eq!(endpoint.to_string(), "192.168.50.200:10000");
    }

    #[test]
    fn decode_euc_kr() {
        // "거실" (living room) in EUC-KR
        let bytes = vec![0xB0, 0xC5, 0xBD, 0xC7];
        let response = RawResponse::decode(bytes, false);
        assert_eq!(response.body(), &ResponseBody::Text("거실".to_string()));
        assert!(!response.possibly_truncated());
    }

    #[test]
    fn decode_ascii_passes_through() {
        let response = RawResponse::decode(b"<imap/>".to_vec(), true);
        assert_eq!(response.body(), &ResponseBody::Text("<imap/>".to_string()));
        assert!(response.possibly_truncated());
    }

    #[test]
    fn undecodable_bytes_are_kept() {
        let bytes = vec![b'<', 0xFF, 0xFF, b'>'];
        let response = RawResponse::decode(bytes.clone(), false);
        assert_eq!(response.body(), &ResponseBody::Undecodable(bytes));
    }
}
