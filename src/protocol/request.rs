//! Request and Response envelopes for the extension bridge.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::{RequestId, TabId};

use super::Command;

// ============================================================================
// Request
// ============================================================================

/// A command request from the library to the extension.
///
/// # Format
///
/// ```json
/// {
///   "id": "uuid",
///   "tabId": 1,
///   "method": "module.methodName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Unique identifier for request/response correlation.
    pub id: RequestId,

    /// Target tab ID.
    #[serde(rename = "tabId")]
    pub tab_id: TabId,

    /// Command with method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a new request with auto-generated ID.
    #[inline]
    #[must_use]
    pub fn new(tab_id: TabId, command: Command) -> Self {
        Self {
            id: RequestId::generate(),
            tab_id,
            command,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from the extension.
///
/// Success:
/// ```json
/// { "id": "uuid", "type": "success", "result": { ... } }
/// ```
///
/// Error:
/// ```json
/// { "id": "uuid", "type": "error", "error": "code", "message": "text" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Response type.
    #[serde(rename = "type")]
    pub response_type: ResponseType,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error code (if error).
    #[serde(default)]
    pub error: Option<String>,

    /// Error message (if error).
    #[serde(default)]
    pub message: Option<String>,
}

impl Response {
    /// Returns `true` if this is a success response.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_type == ResponseType::Success
    }

    /// Extracts the result value, returning error if response was error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the response was an error.
    pub fn into_result(self) -> Result<Value> {
        match self.response_type {
            ResponseType::Success => Ok(self.result.unwrap_or(Value::Null)),
            ResponseType::Error => Err(Error::protocol(self.error_message())),
        }
    }

    /// Human-readable error text, preferring `message` over the code.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }

    /// Takes a field out of the result object.
    ///
    /// Returns `None` if the result or the key is missing, or the value is
    /// `null`.
    #[must_use]
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.result
            .as_mut()
            .and_then(|v| v.get_mut(key))
            .map(Value::take)
            .filter(|v| !v.is_null())
    }

    /// Gets a string value from the result.
    ///
    /// Returns empty string if key not found or not a string.
    #[inline]
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Gets a u64 value from the result.
    ///
    /// Returns 0 if key not found or not a number.
    #[inline]
    #[must_use]
    pub fn get_u64(&self, key: &str) -> u64 {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_u64())
            .unwrap_or_default()
    }
}

// ============================================================================
// ResponseType
// ============================================================================

/// Response type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Successful response.
    Success,
    /// Error response.
    Error,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TabsCommand;

    #[test]
    fn test_request_serialization() {
        let tab_id = TabId::new(4).expect("valid tab id");
        let request = Request::new(tab_id, Command::Tabs(TabsCommand::GetUrl));
        let json = serde_json::to_string(&request).expect("serialize");

        assert!(json.contains("tabs.getUrl"));
        assert!(json.contains("\"tabId\":4"));
        assert!(json.contains("\"id\""));
    }

    #[test]
    fn test_success_response_take() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "success",
            "result": {"reply": ["x"], "url": "https://example.com/"}
        }"#;

        let mut response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(response.is_success());
        assert_eq!(response.get_string("url"), "https://example.com/");
        assert_eq!(response.take("reply"), Some(serde_json::json!(["x"])));
        assert_eq!(response.take("reply"), None);
        assert_eq!(response.take("missing"), None);
    }

    #[test]
    fn test_error_response() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "error",
            "error": "no receiver",
            "message": "Could not establish connection. Receiving end does not exist."
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(!response.is_success());
        let err = response.into_result().unwrap_err();
        assert!(err.to_string().contains("Receiving end does not exist"));
    }

    #[test]
    fn test_error_message_falls_back_to_code() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "error",
            "error": "blocked"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert_eq!(response.error_message(), "blocked");
    }

    #[test]
    fn test_get_u64_defaults() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "success",
            "result": {"tabId": 9}
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert_eq!(response.get_u64("tabId"), 9);
        assert_eq!(response.get_u64("missing"), 0);
    }
}
