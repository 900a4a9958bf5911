// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client binding a transport to the request/response codec.

use std::sync::Arc;

use tracing::Instrument;

use crate::codec::{Request, StatusInfo, parse_body};
use crate::error::{ExchangeError, ProtocolError};
use crate::protocol::{Endpoint, Protocol, RawResponse, ResponseBody, TcpClient, TcpConfig};

/// Client for one Bestin controller.
///
/// The client is cheap to clone; clones share the transport and the tracing
/// span. All exchanges are recorded inside the client's span, which defaults
/// to an `info`-level `bestin` span carrying the endpoint.
///
/// # Examples
///
/// ```no_run
/// use bestin_lib::BestinClient;
/// use bestin_lib::codec::{Request, Service};
///
/// # async fn example() -> bestin_lib::Result<()> {
/// let client = BestinClient::new("192.168.50.200", 10000)?;
/// let infos = client
///     .exchange(&Request::status(Service::Light).with_dev_num(1))
///     .await?;
/// for info in infos {
///     println!("{} = {}", info.unit_num(), info.unit_status());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BestinClient<P: Protocol = TcpClient> {
    protocol: Arc<P>,
    span: tracing::Span,
}

impl<P: Protocol> Clone for BestinClient<P> {
    fn clone(&self) -> Self {
        Self {
            protocol: Arc::clone(&self.protocol),
            span: self.span.clone(),
        }
    }
}

impl BestinClient<TcpClient> {
    /// Creates a TCP client for the controller at `host:port`.
    ///
    /// Use [`TcpConfig`] for timeouts and other options.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty or the
    /// port is 0.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ProtocolError> {
        TcpConfig::new(host).with_port(port).into_client()
    }
}

impl<P: Protocol> BestinClient<P> {
    /// Creates a client over an existing transport with the default span.
    #[must_use]
    pub fn from_protocol(protocol: P) -> Self {
        let endpoint = protocol.endpoint();
        let span = tracing::info_span!("bestin", host = %endpoint.host(), port = endpoint.port());
        Self::with_span(protocol, span)
    }

    /// Creates a client over an existing transport, logging into `span`.
    #[must_use]
    pub fn with_span(protocol: P, span: tracing::Span) -> Self {
        Self {
            protocol: Arc::new(protocol),
            span,
        }
    }

    /// Returns the controller endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        self.protocol.endpoint()
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Sends a raw request document and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport fails.
    pub async fn request(&self, payload: impl AsRef<[u8]>) -> Result<RawResponse, ProtocolError> {
        let payload = payload.as_ref();
        async {
            tracing::debug!(request = %String::from_utf8_lossy(payload), "Request -->");
            let response = self.protocol.request(payload).await?;
            match response.body() {
                ResponseBody::Text(text) => tracing::debug!(response = %text, "Response <--"),
                ResponseBody::Undecodable(bytes) => {
                    tracing::debug!(len = bytes.len(), "Response <-- (not EUC-KR)");
                }
            }
            Ok::<_, ProtocolError>(response)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Sends `request` and parses the controller's answer.
    ///
    /// Every failure is logged with its kind before being returned.
    ///
    /// # Errors
    ///
    /// Returns `ExchangeError` if the transport fails, the answer cannot be
    /// decoded or parsed, or the controller rejects the request.
    pub async fn exchange(&self, request: &Request) -> Result<Vec<StatusInfo>, ExchangeError> {
        let xml = request.to_xml(self.endpoint().host());
        let result = match self.request(xml).await {
            Ok(response) => parse_body(response.body()),
            Err(e) => Err(ExchangeError::Transport(e)),
        };

        if let Err(e) = &result {
            self.span.in_scope(|| {
                tracing::warn!(
                    service = %request.service(),
                    action = %request.action(),
                    kind = e.kind(),
                    error = %e,
                    "Request failed"
                );
            });
        }

        result
    }
}
