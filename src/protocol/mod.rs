//! Message types for the agent and the extension bridge.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `AgentMessage` | Popup → content script | Scrape request |
//! | `Request` | Library → background script | Bridge command |
//! | `Response` | Background script → library | Bridge result |
//!
//! # Command Naming
//!
//! Bridge commands follow `module.methodName` format:
//!
//! - `tabs.getUrl`
//! - `tabs.sendMessage`
//! - `scripting.injectAgent`
//! - `scripting.executeScript`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Bridge command definitions |
//! | `message` | Agent message and reply parsing |
//! | `request` | Request and Response envelopes |

// ============================================================================
// Submodules
// ============================================================================

/// Bridge command definitions.
pub mod command;

/// Agent message and reply parsing.
pub mod message;

/// Request and Response envelopes.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, ScriptingCommand, TabsCommand};
pub use message::{AgentMessage, parse_reply};
pub use request::{Request, Response, ResponseType};
