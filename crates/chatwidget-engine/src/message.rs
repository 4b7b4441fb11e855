//! Message and wire types for the chat widget.
//!
//! Messages are transient: they exist long enough to be rendered and are
//! never persisted.

use serde::{Deserialize, Serialize};

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human operator, rendered right-aligned with a user avatar.
    User,
    /// The automated responder, rendered left-aligned with a bot avatar.
    Bot,
}

impl Sender {
    /// Whether this is the human side of the conversation.
    pub fn is_user(self) -> bool {
        self == Sender::User
    }
}

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub sender: Sender,
    /// Text shown in the bubble. Always rendered literally.
    pub text: String,
}

impl Message {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create a bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The trimmed user message.
    pub message: String,
}

impl ChatRequest {
    /// Create a request for the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Serialize to the JSON request body.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Body of a successful `POST /chat` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Text of the bot reply.
    pub response: String,
}

/// Body the server may attach to a non-success status.
///
/// Only used for diagnostics; the user always sees the generic
/// server-error string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorBody {
    /// Server-provided reason.
    pub error: String,
}

impl ServerErrorBody {
    /// Best-effort parse of an error body.
    pub fn parse(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body).ok().map(|b| b.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let json = ChatRequest::new("Hi").to_json().unwrap();
        assert_eq!(json, r#"{"message":"Hi"}"#);
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"response":"Hello","sources":[]}"#).unwrap();
        assert_eq!(parsed.response, "Hello");
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let json = serde_json::to_string(&Message::bot("x")).unwrap();
        assert!(json.contains(r#""sender":"bot""#));
    }

    #[test]
    fn test_server_error_body_parse() {
        assert_eq!(
            ServerErrorBody::parse(r#"{"error":"Message is required"}"#),
            Some("Message is required".into())
        );
        assert_eq!(ServerErrorBody::parse("<html>500</html>"), None);
    }
}
