//! chatwidget-engine: Surface-agnostic core of the chat widget
//!
//! This crate provides everything a front end needs except pixels:
//! - Message and wire types for `POST /chat`
//! - Localized strings and widget configuration
//! - The [`ChatTransport`] and [`ChatView`] seams
//! - [`ChatController`], which runs one user turn at a time

pub mod config;
pub mod controller;
#[cfg(feature = "http")]
pub mod http;
pub mod locale;
pub mod message;
pub mod transport;
pub mod view;

// Re-export commonly used types
pub use config::{ConfigError, DomIds, WidgetConfig};
pub use controller::{ChatController, Skip, SubmitOutcome, TurnOutcome, TurnState};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use locale::{Direction, Locale, Strings};
pub use message::{ChatRequest, ChatResponse, Message, Sender, ServerErrorBody};
pub use transport::{ChatError, ChatTransport};
pub use view::{ChatView, Transcript, TranscriptIndicator};
