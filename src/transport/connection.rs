//! WebSocket connection to the extension bridge.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Outgoing commands from the Rust side
//! - Incoming responses from the bridge
//! - Request/response correlation by UUID
//!
//! The bridge never pushes unsolicited messages after READY; anything that
//! is not a response is logged and dropped.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{from_str, to_string};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{RequestId, TabId};
use crate::protocol::{Request, Response};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for bridge commands.
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum pending requests before rejecting new ones.
const MAX_PENDING_REQUESTS: usize = 100;

/// Timeout for the READY handshake.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Types
// ============================================================================

/// Map of request IDs to response channels.
type CorrelationMap = FxHashMap<RequestId, oneshot::Sender<Result<Response>>>;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

// ============================================================================
// ReadyData
// ============================================================================

/// Data carried by the bridge's READY message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyData {
    /// The tab the bridge is attached to.
    pub tab_id: TabId,
    /// The tab's URL at connect time, if known.
    pub url: Option<String>,
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    Send {
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
    },
    RemoveCorrelation(RequestId),
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to the extension bridge.
///
/// Cheap to clone; all clones share one event loop.
#[derive(Clone)]
pub struct Connection {
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    correlation: Arc<Mutex<CorrelationMap>>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl Connection {
    /// Creates a connection and spawns its event loop.
    pub(crate) fn new(ws_stream: WebSocketStream<TcpStream>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&correlation),
        ));

        Self {
            command_tx,
            correlation,
        }
    }

    /// Waits for the READY handshake.
    ///
    /// The bridge sends READY with the nil UUID right after connecting.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if READY does not arrive in time
    /// - [`Error::ConnectionClosed`] if the socket closes first
    /// - [`Error::Protocol`] if READY carries no usable tab ID
    pub async fn wait_ready(&self) -> Result<ReadyData> {
        let (tx, rx) = oneshot::channel();
        self.correlation.lock().insert(RequestId::ready(), tx);

        let response = timeout(READY_TIMEOUT, rx)
            .await
            .map_err(|_| Error::connection_timeout(READY_TIMEOUT.as_millis() as u64))???;

        let raw_tab_id = response.get_u64("tabId");
        let tab_id = u32::try_from(raw_tab_id)
            .ok()
            .and_then(TabId::new)
            .ok_or_else(|| Error::protocol(format!("READY carried invalid tabId {raw_tab_id}")))?;
        let url = Some(response.get_string("url")).filter(|u| !u.is_empty());

        debug!(tab_id = %tab_id, url = ?url, "READY handshake completed");

        Ok(ReadyData { tab_id, url })
    }

    /// Sends a request with the default timeout.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_with_timeout`].
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.send_with_timeout(request, DEFAULT_COMMAND_TIMEOUT)
            .await
    }

    /// Sends a request and waits at most `request_timeout` for its response.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection is closed
    /// - [`Error::RequestTimeout`] if no response arrives in time
    /// - [`Error::Protocol`] if too many requests are pending
    pub async fn send_with_timeout(
        &self,
        request: Request,
        request_timeout: Duration,
    ) -> Result<Response> {
        let request_id = request.id;

        {
            let correlation = self.correlation.lock();
            if correlation.len() >= MAX_PENDING_REQUESTS {
                warn!(
                    pending = correlation.len(),
                    max = MAX_PENDING_REQUESTS,
                    "Too many pending requests"
                );
                return Err(Error::protocol(format!(
                    "Too many pending requests: {}/{}",
                    correlation.len(),
                    MAX_PENDING_REQUESTS
                )));
            }
        }

        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(ConnectionCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        match timeout(request_timeout, response_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                let _ = self
                    .command_tx
                    .send(ConnectionCommand::RemoveCorrelation(request_id));

                Err(Error::request_timeout(
                    request_id,
                    request_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Returns the number of requests awaiting a response.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Closes the socket and fails pending requests.
    ///
    /// Not called on drop: clones share the event loop.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    async fn run_event_loop(
        ws_stream: WebSocketStream<TcpStream>,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &correlation);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by bridge");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        _ => {}
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { request, response_tx }) => {
                            Self::handle_send_command(
                                request,
                                response_tx,
                                &mut ws_write,
                                &correlation,
                            ).await;
                        }

                        Some(ConnectionCommand::RemoveCorrelation(request_id)) => {
                            correlation.lock().remove(&request_id);
                            debug!(%request_id, "Removed timed-out correlation");
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        Self::fail_pending_requests(&correlation);

        debug!("Event loop terminated");
    }

    fn handle_incoming_message(text: &str, correlation: &Mutex<CorrelationMap>) {
        match from_str::<Response>(text) {
            Ok(response) => {
                let tx = correlation.lock().remove(&response.id);
                match tx {
                    Some(tx) => {
                        let _ = tx.send(Ok(response));
                    }
                    None => warn!(id = %response.id, "Response for unknown request"),
                }
            }
            Err(e) => warn!(error = %e, text = %text, "Unrecognized bridge message"),
        }
    }

    async fn handle_send_command(
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
        ws_write: &mut WsSink,
        correlation: &Mutex<CorrelationMap>,
    ) {
        let request_id = request.id;

        let json = match to_string(&request) {
            Ok(j) => j,
            Err(e) => {
                let _ = response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        // Register before sending so a fast reply cannot race the insert.
        correlation.lock().insert(request_id, response_tx);

        if let Err(e) = ws_write.send(Message::Text(json.into())).await
            && let Some(tx) = correlation.lock().remove(&request_id)
        {
            let _ = tx.send(Err(Error::connection(e.to_string())));
        }

        trace!(%request_id, "Request sent");
    }

    fn fail_pending_requests(correlation: &Mutex<CorrelationMap>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_COMMAND_TIMEOUT.as_secs(), 30);
        assert_eq!(MAX_PENDING_REQUESTS, 100);
        assert_eq!(READY_TIMEOUT.as_secs(), 30);
    }

    #[test]
    fn test_unknown_response_is_dropped() {
        let correlation = Mutex::new(CorrelationMap::default());
        let text = format!(
            r#"{{"id":"{}","type":"success","result":{{}}}}"#,
            RequestId::generate()
        );
        Connection::handle_incoming_message(&text, &correlation);
        assert!(correlation.lock().is_empty());
    }

    #[tokio::test]
    async fn test_response_routed_to_waiter() {
        let correlation = Mutex::new(CorrelationMap::default());
        let id = RequestId::generate();
        let (tx, rx) = oneshot::channel();
        correlation.lock().insert(id, tx);

        let text = format!(r#"{{"id":"{id}","type":"success","result":{{"url":"x"}}}}"#);
        Connection::handle_incoming_message(&text, &correlation);

        let response = rx.await.expect("delivered").expect("ok");
        assert_eq!(response.get_string("url"), "x");
        assert!(correlation.lock().is_empty());
    }

    #[tokio::test]
    async fn test_pending_failed_on_shutdown() {
        let correlation = Mutex::new(CorrelationMap::default());
        let (tx, rx) = oneshot::channel();
        correlation.lock().insert(RequestId::generate(), tx);

        Connection::fail_pending_requests(&correlation);

        let result = rx.await.expect("delivered");
        assert!(matches!(result, Err(Error::ConnectionClosed)));
    }
}
