//! A browser tab driven over the extension bridge.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::agent::assets::{AGENT_FILE, direct_script};
use crate::delivery::TabHost;
use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::protocol::{AgentMessage, Command, Request, Response, ScriptingCommand, TabsCommand};
use crate::request::ExtractionRequest;
use crate::transport::{Connection, PendingServer, ReadyData};

// ============================================================================
// TabInner
// ============================================================================

struct TabInner {
    tab_id: TabId,
    /// Last address seen, from READY or `tabs.getUrl`.
    url: Mutex<Option<String>>,
    connection: Connection,
}

// ============================================================================
// Tab
// ============================================================================

/// A handle to a live browser tab.
#[derive(Clone)]
pub struct Tab {
    inner: Arc<TabInner>,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("tab_id", &self.inner.tab_id)
            .field("url", &*self.inner.url.lock())
            .finish_non_exhaustive()
    }
}

impl Tab {
    /// Creates a tab handle from a completed handshake.
    #[must_use]
    pub fn new(connection: Connection, ready: ReadyData) -> Self {
        Self {
            inner: Arc::new(TabInner {
                tab_id: ready.tab_id,
                url: Mutex::new(ready.url),
                connection,
            }),
        }
    }

    /// Waits for the bridge on `server` and returns the tab it reports.
    ///
    /// # Errors
    ///
    /// Any error from [`PendingServer::accept`].
    pub async fn connect(server: PendingServer) -> Result<Self> {
        let (connection, ready) = server.accept().await?;
        Ok(Self::new(connection, ready))
    }

    /// Returns the tab ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TabId {
        self.inner.tab_id
    }

    /// Returns the bridge connection.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.inner.connection
    }

    /// Closes the bridge connection.
    pub fn close(&self) {
        self.inner.connection.shutdown();
    }

    async fn send_command(&self, command: Command) -> Result<Response> {
        let request = Request::new(self.inner.tab_id, command);
        self.inner.connection.send(request).await
    }
}

// ============================================================================
// TabHost
// ============================================================================

#[async_trait]
impl TabHost for Tab {
    fn tab_id(&self) -> Option<TabId> {
        Some(self.inner.tab_id)
    }

    async fn url(&self) -> Result<Option<String>> {
        let response = match self.send_command(Command::Tabs(TabsCommand::GetUrl)).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                debug!(tab_id = %self.inner.tab_id, error = %response.error_message(), "URL lookup failed");
                return Ok(self.inner.url.lock().clone());
            }
            Err(e) => {
                debug!(tab_id = %self.inner.tab_id, error = %e, "URL lookup failed");
                return Ok(self.inner.url.lock().clone());
            }
        };

        let url = response.get_string("url");
        let mut cached = self.inner.url.lock();
        if !url.is_empty() {
            *cached = Some(url);
        }
        Ok(cached.clone())
    }

    async fn send_message(&self, message: &AgentMessage, bound: Duration) -> Result<Option<Value>> {
        let request = Request::new(
            self.inner.tab_id,
            Command::Tabs(TabsCommand::SendMessage {
                message: message.clone(),
            }),
        );
        let mut response = self.inner.connection.send_with_timeout(request, bound).await?;

        if !response.is_success() {
            return Err(Error::transport(response.error_message()));
        }
        Ok(response.take("reply"))
    }

    async fn inject_agent(&self) -> Result<()> {
        let command = Command::Scripting(ScriptingCommand::InjectAgent {
            file: AGENT_FILE.to_string(),
        });
        let response = self.send_command(command).await?;

        if !response.is_success() {
            return Err(Error::injection_failure(response.error_message()));
        }
        debug!(tab_id = %self.inner.tab_id, file = AGENT_FILE, "Agent injected");
        Ok(())
    }

    async fn execute_direct(&self, request: &ExtractionRequest) -> Result<Value> {
        let script = direct_script(request)?;
        debug!(tab_id = %self.inner.tab_id, script_len = script.len(), "Executing direct scrape");

        let mut response = self
            .send_command(Command::Scripting(ScriptingCommand::ExecuteScript { script }))
            .await?;

        if !response.is_success() {
            return Err(Error::execution_blocked(response.error_message()));
        }
        Ok(response.take("value").unwrap_or(Value::Null))
    }
}

// ============================================================================
// Tests
// ============================================================================
