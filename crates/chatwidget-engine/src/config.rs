//! Configuration types for the chat widget.
//!
//! Every field has a default matching the stock deployment, so an empty
//! JSON object is a valid configuration.

use crate::locale::{Locale, Strings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for a chat widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Base URL of the chat server, used by native front ends.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Chat endpoint path (or absolute URL).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Locale of the built-in strings.
    #[serde(default)]
    pub locale: Locale,

    /// Replacement for the built-in strings of `locale`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strings: Option<Strings>,

    /// URL of the bot avatar image.
    #[serde(default = "default_avatar_url")]
    pub avatar_url: String,

    /// Request timeout in seconds. `None` waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Element ids of the hosting page.
    #[serde(default)]
    pub dom: DomIds,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_endpoint() -> String {
    "/chat".into()
}

fn default_avatar_url() -> String {
    "/static/chatbot-icon.png".into()
}

/// Element ids the browser front end binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomIds {
    /// The `<form>` whose submission sends a message.
    #[serde(default = "default_form_id")]
    pub form: String,

    /// The text `<input>`.
    #[serde(default = "default_input_id")]
    pub input: String,

    /// Scrolling container of chat bubbles.
    #[serde(default = "default_messages_id")]
    pub messages: String,

    /// The send `<button>`.
    #[serde(default = "default_send_button_id")]
    pub send_button: String,
}

fn default_form_id() -> String {
    "chat-form".into()
}

fn default_input_id() -> String {
    "message-input".into()
}

fn default_messages_id() -> String {
    "chat-messages".into()
}

fn default_send_button_id() -> String {
    "send-button".into()
}

impl Default for DomIds {
    fn default() -> Self {
        Self {
            form: default_form_id(),
            input: default_input_id(),
            messages: default_messages_id(),
            send_button: default_send_button_id(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            endpoint: default_endpoint(),
            locale: Locale::default(),
            strings: None,
            avatar_url: default_avatar_url(),
            request_timeout_secs: None,
            dom: DomIds::default(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Effective user-visible strings.
    pub fn strings(&self) -> Strings {
        self.strings
            .clone()
            .unwrap_or_else(|| self.locale.strings())
    }

    /// Absolute endpoint URL for native transports.
    ///
    /// An absolute `endpoint` wins over `server_url`.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
