//! Status display collaborator.
//!
//! The popup shows one transient status line. Callers hand it a message,
//! a level and how long the message should stay up; the display decides
//! how to render and dismiss it.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use parking_lot::Mutex;
use tracing::{error, info};

// ============================================================================
// Constants
// ============================================================================

/// How long error messages stay visible.
pub const ERROR_DISMISS: Duration = Duration::from_millis(5000);

/// How long all other messages stay visible.
pub const DEFAULT_DISMISS: Duration = Duration::from_millis(3000);

// ============================================================================
// StatusLevel
// ============================================================================

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Intermediate progress (tier changes).
    Progress,
    /// Operation finished.
    Success,
    /// Operation failed.
    Error,
}

impl StatusLevel {
    /// Returns the auto-dismiss delay for this level.
    #[inline]
    #[must_use]
    pub const fn dismiss_after(self) -> Duration {
        match self {
            Self::Error => ERROR_DISMISS,
            Self::Progress | Self::Success => DEFAULT_DISMISS,
        }
    }
}

// ============================================================================
// StatusSink
// ============================================================================

/// Receives status messages.
pub trait StatusSink: Send + Sync {
    /// Shows `message` for roughly `dismiss_after`.
    fn show(&self, message: &str, level: StatusLevel, dismiss_after: Duration);

    /// Shows `message` with the level's default duration.
    fn post(&self, message: &str, level: StatusLevel) {
        self.show(message, level, level.dismiss_after());
    }
}

/// Writes status messages to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn show(&self, message: &str, level: StatusLevel, dismiss_after: Duration) {
        let dismiss_ms = dismiss_after.as_millis() as u64;
        match level {
            StatusLevel::Error => error!(dismiss_ms, "{message}"),
            StatusLevel::Progress | StatusLevel::Success => info!(dismiss_ms, "{message}"),
        }
    }
}

// ============================================================================
// StatusLog
// ============================================================================

/// One recorded status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Message text.
    pub message: String,
    /// Severity.
    pub level: StatusLevel,
    /// Requested display time.
    pub dismiss_after: Duration,
}

/// Keeps every status message in order.
///
/// Useful for headless front ends that render the history afterwards.
#[derive(Debug, Default)]
pub struct StatusLog {
    entries: Mutex<Vec<StatusEntry>>,
}

impl StatusLog {
    /// Creates an empty log.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn entries(&self) -> Vec<StatusEntry> {
        self.entries.lock().clone()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<StatusEntry> {
        self.entries.lock().last().cloned()
    }
}

impl StatusSink for StatusLog {
    fn show(&self, message: &str, level: StatusLevel, dismiss_after: Duration) {
        self.entries.lock().push(StatusEntry {
            message: message.to_string(),
            level,
            dismiss_after,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
