//! HTTP transport backed by reqwest.

use crate::config::WidgetConfig;
use crate::message::{ChatRequest, ChatResponse, ServerErrorBody};
use crate::transport::{ChatError, ChatTransport};
use tracing::debug;

/// Posts chat requests to an absolute endpoint URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport for `url` with a default client.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Create a transport from widget configuration.
    pub fn from_config(config: &WidgetConfig) -> Result<Self, ChatError> {
        #[allow(unused_mut)]
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: config.endpoint_url(),
        })
    }

    /// Endpoint this transport posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ChatTransport for HttpTransport {
    type Response = reqwest::Response;

    async fn post(&self, request: &ChatRequest) -> Result<reqwest::Response, ChatError> {
        debug!(url = %self.url, "posting chat message");

        self.client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))
    }

    async fn read(&self, response: reqwest::Response) -> Result<ChatResponse, ChatError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Server {
                status: status.as_u16(),
                detail: ServerErrorBody::parse(&body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ChatError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn transport_for(server: &MockServer) -> HttpTransport {
        HttpTransport::new(format!("{}/chat", server.uri()))
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "Hi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hello"})))
            .expect(1)
            .mount(&server)
            .await;

        let reply = transport_for(&server)
            .send(&ChatRequest::new("Hi"))
            .await
            .unwrap();
        assert_eq!(reply.response, "Hello");
    }

    #[tokio::test]
    async fn test_send_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .send(&ChatRequest::new("Hi"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ChatError::Server {
                status: 500,
                detail: None
            }
        );
    }

    #[tokio::test]
    async fn test_send_client_error_keeps_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Message is required"})),
            )
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .send(&ChatRequest::new("Hi"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ChatError::Server {
                status: 400,
                detail: Some("Message is required".into())
            }
        );
    }

    #[tokio::test]
    async fn test_post_resolves_before_status_check() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let response = transport.post(&ChatRequest::new("Hi")).await.unwrap();
        assert_eq!(response.status().as_u16(), 503);

        let err = transport.read(response).await.unwrap_err();
        assert!(matches!(err, ChatError::Server { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_send_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .send(&ChatRequest::new("Hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Decode(_)));
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        // Reserve a port, then free it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = HttpTransport::new(format!("http://127.0.0.1:{port}/chat"));
        let err = transport.send(&ChatRequest::new("Hi")).await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
    }

    #[test]
    fn test_from_config_uses_endpoint_url() {
        let config = WidgetConfig {
            server_url: "http://example.test:8080".into(),
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.url(), "http://example.test:8080/chat");
    }
}
