//! Tab-level messages exchanged with the in-page extraction agent.
//!
//! # Format
//!
//! ```json
//! { "action": "scrape", "selector": "a[href]", "attribute": "href" }
//! ```
//!
//! The agent answers with a JSON array of strings. Anything else (no
//! reply, `null`, an object, an array with non-string items) is not a
//! result.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::extract::Attribute;
use crate::request::{ExtractionRequest, ExtractionResult};

// ============================================================================
// AgentMessage
// ============================================================================

/// A message addressed to the extraction agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AgentMessage {
    /// Run the extractor and reply with the values.
    Scrape {
        /// CSS selector.
        selector: String,
        /// Attribute name.
        attribute: Attribute,
    },
}

impl AgentMessage {
    /// Builds the scrape message for a request.
    #[must_use]
    pub fn scrape(request: &ExtractionRequest) -> Self {
        Self::Scrape {
            selector: request.selector().to_string(),
            attribute: request.attribute().clone(),
        }
    }
}

// ============================================================================
// Reply Parsing
// ============================================================================

/// Interprets an agent reply as an extraction result.
///
/// # Errors
///
/// Returns [`Error::MalformedReply`] unless the reply is an array of
/// strings. An empty array is a valid result.
pub fn parse_reply(reply: Option<Value>) -> Result<ExtractionResult> {
    let Some(reply) = reply else {
        return Err(Error::malformed_reply("no reply"));
    };

    let Value::Array(items) = reply else {
        return Err(Error::malformed_reply(format!(
            "expected array, got {}",
            kind_of(&reply)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Ok(s),
            other => Err(Error::malformed_reply(format!(
                "item {index} is {}",
                kind_of(&other)
            ))),
        })
        .collect()
}

/// JSON type name for diagnostics.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_scrape_message_shape() {
        let request = ExtractionRequest::new("a[href]", "href").expect("valid");
        let value = serde_json::to_value(AgentMessage::scrape(&request)).expect("serialize");
        assert_eq!(
            value,
            json!({"action": "scrape", "selector": "a[href]", "attribute": "href"})
        );
    }

    #[test]
    fn test_scrape_message_parses() {
        let message: AgentMessage = serde_json::from_value(
            json!({"action": "scrape", "selector": "img", "attribute": "alt"}),
        )
        .expect("parse");
        assert!(matches!(message, AgentMessage::Scrape { ref selector, .. } if selector == "img"));
    }

    #[test]
    fn test_reply_array_of_strings() {
        let result = parse_reply(Some(json!(["a", "b"]))).expect("valid");
        assert_eq!(result.as_slice(), ["a", "b"]);
    }

    #[test]
    fn test_reply_empty_array_is_valid() {
        let result = parse_reply(Some(json!([]))).expect("valid");
        assert!(result.is_empty());
    }

    #[test]
    fn test_reply_malformed() {
        for reply in [None, Some(json!(null)), Some(json!({"items": []})), Some(json!([1, "a"]))] {
            let err = parse_reply(reply).unwrap_err();
            assert!(matches!(err, Error::MalformedReply { .. }));
        }
    }
}
