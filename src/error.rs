//! Error types for tab-scraper.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use tab_scraper::{ExtractionRequest, Result};
//!
//! fn example() -> Result<()> {
//!     let request = ExtractionRequest::new("a[href]", "href")?;
//!     println!("{request:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Request | [`Error::EmptySelector`], [`Error::InvalidSelector`], [`Error::RestrictedPage`] |
//! | Tier (internal) | [`Error::TierTimeout`], [`Error::Transport`], [`Error::MalformedReply`], [`Error::InjectionFailure`], [`Error::ExecutionBlocked`] |
//! | Terminal | [`Error::AllTiersExhausted`] |
//! | Session | [`Error::NoData`], [`Error::Config`] |
//! | Bridge | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`], [`Error::Protocol`], [`Error::RequestTimeout`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] |
//!
//! Tier errors never leave [`DeliveryStrategy`](crate::DeliveryStrategy);
//! they drive fallthrough to the next tier and are only logged.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::delivery::Tier;
use crate::identifiers::RequestId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Request Errors
    // ========================================================================
    /// Selector was blank after trimming.
    #[error("Please enter a CSS selector")]
    EmptySelector,

    /// Selector could not be parsed by the query engine.
    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector {
        /// The rejected selector.
        selector: String,
        /// Parser diagnostic.
        message: String,
    },

    /// Target tab shows a page scripts cannot reach.
    #[error("Cannot scrape this type of page ({url}). Please navigate to a regular website.")]
    RestrictedPage {
        /// Address of the rejected tab.
        url: String,
    },

    // ========================================================================
    // Tier Errors
    // ========================================================================
    /// No reply from the in-tab agent within the tier's bound.
    #[error("{tier} timed out after {timeout_ms}ms")]
    TierTimeout {
        /// Tier that gave up waiting.
        tier: Tier,
        /// Milliseconds waited.
        timeout_ms: u64,
    },

    /// Message could not be delivered (e.g. nothing listening in the tab).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// Reply arrived but was not a list of strings.
    #[error("Malformed reply: {message}")]
    MalformedReply {
        /// What was wrong with the reply.
        message: String,
    },

    /// Installing the agent into the tab failed.
    #[error("Agent injection failed: {message}")]
    InjectionFailure {
        /// Description of the injection failure.
        message: String,
    },

    /// The page refused one-shot script execution.
    #[error("Direct execution blocked: {message}")]
    ExecutionBlocked {
        /// Description of the block.
        message: String,
    },

    // ========================================================================
    // Terminal Errors
    // ========================================================================
    /// Every delivery tier failed.
    #[error(
        "All scraping methods failed. The page may be blocking scripts or have security restrictions. ({reason})"
    )]
    AllTiersExhausted {
        /// Why the last tier failed.
        reason: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Export requested with nothing in the session cache.
    #[error("No data to export")]
    NoData,

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Bridge Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Extension did not connect in time.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Protocol violation or error response from the extension.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Bridge request timed out.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// ErrorKind
// ============================================================================

/// Coarse classification of an [`enum@Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Blank selector.
    EmptySelector,
    /// Unparseable selector.
    InvalidSelector,
    /// Restricted page.
    RestrictedPage,
    /// Tier reply timeout.
    TierTimeout,
    /// Delivery or reply-shape failure.
    TransportError,
    /// Agent injection failure.
    InjectionFailure,
    /// Direct execution refused.
    ExecutionBlocked,
    /// Every tier failed.
    AllTiersExhausted,
    /// Empty session cache.
    NoData,
    /// Bad configuration.
    Config,
    /// Bridge connection problem.
    Connection,
    /// Bridge protocol problem.
    Protocol,
    /// Filesystem failure.
    Io,
    /// Serialization failure.
    Json,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid selector error.
    #[inline]
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Creates a restricted page error.
    #[inline]
    pub fn restricted_page(url: impl Into<String>) -> Self {
        Self::RestrictedPage { url: url.into() }
    }

    /// Creates a tier timeout error.
    #[inline]
    pub fn tier_timeout(tier: Tier, timeout_ms: u64) -> Self {
        Self::TierTimeout { tier, timeout_ms }
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a malformed reply error.
    #[inline]
    pub fn malformed_reply(message: impl Into<String>) -> Self {
        Self::MalformedReply {
            message: message.into(),
        }
    }

    /// Creates an injection failure error.
    #[inline]
    pub fn injection_failure(message: impl Into<String>) -> Self {
        Self::InjectionFailure {
            message: message.into(),
        }
    }

    /// Creates an execution blocked error.
    #[inline]
    pub fn execution_blocked(message: impl Into<String>) -> Self {
        Self::ExecutionBlocked {
            message: message.into(),
        }
    }

    /// Creates the terminal all-tiers-failed error.
    #[inline]
    pub fn all_tiers_exhausted(reason: impl Into<String>) -> Self {
        Self::AllTiersExhausted {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Classification
// ============================================================================

impl Error {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySelector => ErrorKind::EmptySelector,
            Self::InvalidSelector { .. } => ErrorKind::InvalidSelector,
            Self::RestrictedPage { .. } => ErrorKind::RestrictedPage,
            Self::TierTimeout { .. } | Self::RequestTimeout { .. } => ErrorKind::TierTimeout,
            Self::Transport { .. } | Self::MalformedReply { .. } | Self::ChannelClosed(_) => {
                ErrorKind::TransportError
            }
            Self::InjectionFailure { .. } => ErrorKind::InjectionFailure,
            Self::ExecutionBlocked { .. } => ErrorKind::ExecutionBlocked,
            Self::AllTiersExhausted { .. } => ErrorKind::AllTiersExhausted,
            Self::NoData => ErrorKind::NoData,
            Self::Config { .. } => ErrorKind::Config,
            Self::Connection { .. }
            | Self::ConnectionTimeout { .. }
            | Self::ConnectionClosed
            | Self::WebSocket(_) => ErrorKind::Connection,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Json,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::TierTimeout { .. } | Self::ConnectionTimeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this error is rejected before any tier runs.
    #[inline]
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::EmptySelector | Self::InvalidSelector { .. } | Self::RestrictedPage { .. }
        )
    }

    /// Returns `true` if a tier failing with this error should hand over
    /// to the next tier.
    #[inline]
    #[must_use]
    pub fn is_fallthrough(&self) -> bool {
        !self.is_request_error() && !matches!(self, Self::AllTiersExhausted { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
