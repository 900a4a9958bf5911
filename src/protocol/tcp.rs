// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP transport for Bestin controllers.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::client::BestinClient;
use crate::error::ProtocolError;
use crate::protocol::{Endpoint, Protocol, RawResponse};

// ============================================================================
// TcpConfig - Connection parameters
// ============================================================================

/// Configuration for a Bestin controller connection.
///
/// Every request opens its own connection, so this only describes how to
/// reach the controller and how long to wait for it.
///
/// # Examples
///
/// ```
/// use bestin_lib::protocol::TcpConfig;
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = TcpConfig::new("192.168.50.200");
/// assert_eq!(config.port(), 10000);
///
/// // With all options
/// let config = TcpConfig::new("192.168.50.200")
///     .with_port(10001)
///     .with_connect_timeout(Duration::from_secs(3))
///     .with_idle_timeout(Duration::from_secs(2))
///     .with_max_response_bytes(16 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct TcpConfig {
    host: String,
    port: u16,
    connect_timeout: Duration,
    idle_timeout: Duration,
    max_response_bytes: usize,
    span: Option<tracing::Span>,
}

impl TcpConfig {
    /// Default controller port.
    pub const DEFAULT_PORT: u16 = 10000;
    /// Default connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default time to wait for the next response bytes.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default response size cap.
    pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 4096;

    /// Creates a new configuration for the specified controller host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the controller
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            idle_timeout: Self::DEFAULT_IDLE_TIMEOUT,
            max_response_bytes: Self::DEFAULT_MAX_RESPONSE_BYTES,
            span: None,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets how long to wait for more response bytes.
    ///
    /// If the controller keeps the connection open after answering, the read
    /// ends once this much time passes without new data.
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets the response size cap. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_response_bytes(mut self, max: usize) -> Self {
        self.max_response_bytes = max.max(1);
        self
    }

    /// Sets the tracing span all exchanges of the client are recorded in.
    ///
    /// Defaults to an `info`-level `bestin` span carrying host and port.
    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
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

    /// Returns the connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the idle timeout.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Returns the response size cap.
    #[must_use]
    pub fn max_response_bytes(&self) -> usize {
        self.max_response_bytes
    }

    /// Returns the endpoint described by this configuration.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }

    /// Creates a `TcpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty or the
    /// port is 0.
    pub fn into_transport(self) -> Result<TcpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }
        if self.port == 0 {
            return Err(ProtocolError::InvalidAddress(format!(
                "{}:0 has no port",
                self.host
            )));
        }

        Ok(TcpClient {
            endpoint: self.endpoint(),
            connect_timeout: self.connect_timeout,
            idle_timeout: self.idle_timeout,
            max_response_bytes: self.max_response_bytes,
        })
    }

    /// Creates a `BestinClient` over TCP from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty or the
    /// port is 0.
    pub fn into_client(self) -> Result<BestinClient<TcpClient>, ProtocolError> {
        let span = self.span.clone();
        let transport = self.into_transport()?;
        Ok(match span {
            Some(span) => BestinClient::with_span(transport, span),
            None => BestinClient::from_protocol(transport),
        })
    }
}

// ============================================================================
// TcpClient - One connection per request
// ============================================================================

/// TCP transport for a Bestin controller.
///
/// # Examples
///
/// ```no_run
/// use bestin_lib::protocol::{Protocol, TcpConfig};
///
/// # async fn example() -> bestin_lib::Result<()> {
/// let transport = TcpConfig::new("192.168.50.200").into_transport()?;
/// let response = transport.request(b"<imap/>").await?;
/// println!("truncated: {}", response.possibly_truncated());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TcpClient {
    endpoint: Endpoint,
    connect_timeout: Duration,
    idle_timeout: Duration,
    max_response_bytes: usize,
}

impl TcpClient {
    async fn connect(&self) -> Result<TcpStream, ProtocolError> {
        let address = (self.endpoint.host(), self.endpoint.port());
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ProtocolError::ConnectionFailed(format!(
                "{}: {e}",
                self.endpoint
            ))),
            Err(_) => Err(ProtocolError::Timeout(millis(self.connect_timeout))),
        }
    }

    /// Reads until the peer closes, the cap is reached, or the line goes idle.
    ///
    /// Returns the bytes read and whether the cap was hit.
    async fn read_response(
        &self,
        stream: &mut TcpStream,
    ) -> Result<(Vec<u8>, bool), ProtocolError> {
        let cap = self.max_response_bytes;
        let mut buf = vec![0u8; cap];
        let mut filled = 0;

        while filled < cap {
            match tokio::time::timeout(self.idle_timeout, stream.read(&mut buf[filled..])).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => filled += n,
                Ok(Err(e)) => return Err(ProtocolError::Io(e)),
                Err(_) if filled > 0 => {
                    tracing::debug!(len = filled, "Controller went idle, ending response");
                    break;
                }
                Err(_) => return Err(ProtocolError::Timeout(millis(self.idle_timeout))),
            }
        }

        buf.truncate(filled);
        Ok((buf, filled == cap))
    }
}

impl Protocol for TcpClient {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn request(&self, payload: &[u8]) -> Result<RawResponse, ProtocolError> {
        let mut stream = self.connect().await?;

        stream.write_all(payload).await?;
        tracing::trace!(len = payload.len(), "Request written");

        let (bytes, possibly_truncated) = self.read_response(&mut stream).await?;
        drop(stream);

        if possibly_truncated {
            tracing::warn!(
                len = bytes.len(),
                "Response filled the read buffer, possibly incomplete read"
            );
        }

        Ok(RawResponse::decode(bytes, possibly_truncated))
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
