//! `fetch`-backed transport for the browser.

use chatwidget_engine::{ChatError, ChatRequest, ChatResponse, ChatTransport, ServerErrorBody};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::js_err;

/// Posts chat requests with the browser's `fetch`.
///
/// The endpoint may be relative to the page (`/chat`).
#[derive(Debug, Clone)]
pub struct FetchTransport {
    endpoint: String,
}

impl FetchTransport {
    /// Create a transport for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    async fn fetch(&self, body: &str) -> Result<web_sys::Response, ChatError> {
        let window = web_sys::window().ok_or_else(|| ChatError::Transport("no window".into()))?;

        let init = web_sys::RequestInit::new();
        init.set_method("POST");

        let headers = web_sys::Headers::new().map_err(transport_err)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(transport_err)?;
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));

        let request = web_sys::Request::new_with_str_and_init(&self.endpoint, &init)
            .map_err(transport_err)?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_err)?;
        resp_value.dyn_into().map_err(transport_err)
    }
}

impl ChatTransport for FetchTransport {
    type Response = web_sys::Response;

    async fn post(&self, request: &ChatRequest) -> Result<web_sys::Response, ChatError> {
        let body = request
            .to_json()
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        self.fetch(&body).await
    }

    async fn read(&self, resp: web_sys::Response) -> Result<ChatResponse, ChatError> {
        if !resp.ok() {
            let detail = match read_text(&resp).await {
                Ok(text) => ServerErrorBody::parse(&text),
                Err(_) => None,
            };
            return Err(ChatError::Server {
                status: resp.status(),
                detail,
            });
        }

        let text = read_text(&resp)
            .await
            .map_err(|e| ChatError::Decode(js_err(&e)))?;
        serde_json::from_str(&text).map_err(|e| ChatError::Decode(e.to_string()))
    }
}

async fn read_text(resp: &web_sys::Response) -> Result<String, JsValue> {
    let value = JsFuture::from(resp.text()?).await?;
    Ok(value.as_string().unwrap_or_default())
}

#[allow(clippy::needless_pass_by_value)]
fn transport_err(err: JsValue) -> ChatError {
    ChatError::Transport(js_err(&err))
}
