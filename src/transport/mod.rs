//! WebSocket transport to the extension bridge.
//!
//! The bridge is the extension's background script. It owns the browser
//! APIs (`tabs`, `scripting`) and relays commands from this crate.
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Tab (Rust)     │         WebSocket            │  Extension      │
//! │                 │◄────────────────────────────►│  (Background)   │
//! │  PendingServer  │      127.0.0.1:PORT          │                 │
//! │  → Connection   │                              │  tabs/scripting │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Request/response correlation and event loop |
//! | `server` | Binding and accepting the bridge |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// WebSocket server the bridge connects to.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ReadyData};
pub use server::PendingServer;
