//! WebSocket server the extension bridge connects to.
//!
//! # Connection Flow
//!
//! 1. Bind to `127.0.0.1:0` (random port)
//! 2. Hand [`PendingServer::ws_url`] to the extension's background script
//! 3. The bridge connects and upgrades to WebSocket
//! 4. The bridge sends READY with the active tab's ID and URL
//! 5. Commands flow over the [`Connection`]

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::Connection;
use super::connection::ReadyData;

// ============================================================================
// Constants
// ============================================================================

/// How long to wait for the bridge to connect.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// PendingServer
// ============================================================================

/// A bound server waiting for the bridge.
///
/// # Example
///
/// ```ignore
/// let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// println!("point the extension at {}", server.ws_url());
///
/// let (connection, ready) = server.accept().await?;
/// ```
#[derive(Debug)]
pub struct PendingServer {
    listener: TcpListener,
    port: u16,
    accept_timeout: Duration,
}

impl PendingServer {
    /// Binds to `ip:port`. Port 0 lets the OS choose.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(ip, port)).await?;
        let actual_port = listener.local_addr()?.port();

        debug!(port = actual_port, "Bridge server bound");

        Ok(Self {
            listener,
            port: actual_port,
            accept_timeout: CONNECTION_TIMEOUT,
        })
    }

    /// Binds to a random localhost port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind_localhost() -> Result<Self> {
        Self::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await
    }

    /// Overrides how long [`accept`](Self::accept) waits for the bridge.
    #[inline]
    #[must_use]
    pub fn with_accept_timeout(mut self, accept_timeout: Duration) -> Self {
        self.accept_timeout = accept_timeout;
        self
    }

    /// Returns the bound port.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns `ws://127.0.0.1:{port}`.
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Accepts the bridge and completes the READY handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the bridge does not connect in time
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    /// - [`Error::Protocol`] if READY is unusable
    pub async fn accept(self) -> Result<(Connection, ReadyData)> {
        let (stream, addr) = timeout(self.accept_timeout, self.listener.accept())
            .await
            .map_err(|_| Error::connection_timeout(self.accept_timeout.as_millis() as u64))??;

        debug!(?addr, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        info!(port = self.port, "Bridge connected");

        let connection = Connection::new(ws_stream);
        let ready = connection.wait_ready().await?;

        Ok((connection, ready))
    }
}

// ============================================================================
// Tests
// ============================================================================
