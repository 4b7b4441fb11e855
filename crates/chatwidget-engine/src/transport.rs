//! Transport seam between the controller and the chat server.

use crate::message::{ChatRequest, ChatResponse};

/// Sends one chat request and yields the server's reply.
///
/// A round trip has two halves: [`post`](ChatTransport::post) resolves once the
/// response status has arrived, [`read`](ChatTransport::read) consumes its
/// body. Implementations perform exactly one attempt: no retry, no backoff.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    /// A response whose status has arrived but whose body is unread.
    type Response;

    /// Issue one `POST` with `request` as the JSON body.
    async fn post(&self, request: &ChatRequest) -> Result<Self::Response, ChatError>;

    /// Check the status of `response` and decode its body.
    async fn read(&self, response: Self::Response) -> Result<ChatResponse, ChatError>;

    /// Both halves in one call.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let response = self.post(request).await?;
        self.read(response).await
    }
}

/// Failure of a single chat round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// A response arrived with a non-success status.
    #[error("Server returned status {status}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Reason from the error body, when the server sent one.
        detail: Option<String>,
    },

    /// The request could not complete (DNS, refused, reset, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response carried a body that is not a chat response.
    #[error("Decode error: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let server = ChatError::Server {
            status: 500,
            detail: Some("boom".into()),
        };
        assert_eq!(server.to_string(), "Server returned status 500");
        assert_eq!(
            ChatError::Transport("refused".into()).to_string(),
            "Transport error: refused"
        );
    }
}
