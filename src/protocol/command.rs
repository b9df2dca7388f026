//! Bridge commands sent to the extension background script.
//!
//! Commands follow `module.methodName` format.
//!
//! # Command Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | `tabs` | Address lookup, agent messaging |
//! | `scripting` | Agent injection, one-shot execution |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use super::AgentMessage;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All bridge commands organized by module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Tabs module commands.
    Tabs(TabsCommand),
    /// Scripting module commands.
    Scripting(ScriptingCommand),
}

// ============================================================================
// Tabs Commands
// ============================================================================

/// Tabs module commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum TabsCommand {
    /// Get the tab's current address.
    #[serde(rename = "tabs.getUrl")]
    GetUrl,

    /// Deliver a message to the content script and relay its reply.
    #[serde(rename = "tabs.sendMessage")]
    SendMessage {
        /// Message for the agent.
        message: AgentMessage,
    },
}

// ============================================================================
// Scripting Commands
// ============================================================================

/// Scripting module commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ScriptingCommand {
    /// Install the extraction agent content script.
    #[serde(rename = "scripting.injectAgent")]
    InjectAgent {
        /// Script file bundled with the extension.
        file: String,
    },

    /// Run a one-shot script and return its completion value.
    #[serde(rename = "scripting.executeScript")]
    ExecuteScript {
        /// Self-contained script source.
        script: String,
    },
}

// ============================================================================
// Tests
// ============================================================================
