//! The chat widget controller.
//!
//! A user turn is split around its network round trip:
//! [`ChatController::begin_turn`] does everything up to the request,
//! [`ChatController::response_arrived`] drops the typing indicator once the
//! response status is in, and [`ChatController::finish_turn`] appends the
//! reply. Front ends that keep the controller behind a `RefCell` await the
//! transport between these without holding a borrow; others can use
//! [`ChatController::submit`].

use crate::locale::Strings;
use crate::message::{ChatRequest, ChatResponse, Message, Sender};
use crate::transport::{ChatError, ChatTransport};
use crate::view::ChatView;
use tracing::{debug, error, warn};

/// Turn lifecycle. The indicator handle lives only in `Waiting`.
#[derive(Debug)]
pub enum TurnState<I> {
    /// No request in flight.
    Idle,
    /// A request is in flight; the indicator is `None` once its response
    /// has arrived.
    Waiting(Option<I>),
}

/// Why a submission did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Input was empty after trimming.
    Empty,
    /// A previous turn is still waiting for its reply.
    Busy,
}

/// How a finished turn was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The server's reply was appended.
    Replied,
    /// The server answered with a failure status.
    ServerError,
    /// The request could not complete or its reply was unreadable.
    ConnectionError,
    /// No turn was waiting; nothing changed.
    Stale,
}

impl TurnOutcome {
    /// Whether the turn ended with an error bubble.
    pub fn is_error(self) -> bool {
        matches!(self, TurnOutcome::ServerError | TurnOutcome::ConnectionError)
    }
}

/// Result of [`ChatController::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent.
    Skipped(Skip),
    /// One request was sent and resolved.
    Finished(TurnOutcome),
}

/// Drives one conversation on an injected [`ChatView`].
pub struct ChatController<V: ChatView> {
    view: V,
    strings: Strings,
    state: TurnState<V::Indicator>,
}

impl<V: ChatView> ChatController<V> {
    /// Create a controller rendering into `view`.
    pub fn new(view: V, strings: Strings) -> Self {
        Self {
            view,
            strings,
            state: TurnState::Idle,
        }
    }

    /// Append the greeting bubble. Called once on load.
    pub fn greet(&mut self) {
        let greeting = self.strings.greeting.clone();
        self.append_message(Sender::Bot, greeting);
    }

    /// Append one bubble and scroll to it.
    pub fn append_message(&mut self, sender: Sender, text: impl Into<String>) {
        let message = Message {
            sender,
            text: text.into(),
        };
        self.view.append_message(&message);
    }

    /// Whether a request is in flight.
    pub fn is_waiting(&self) -> bool {
        matches!(self.state, TurnState::Waiting(_))
    }

    /// Start a turn for `raw_input`.
    ///
    /// On success the user bubble is shown, the input cleared, the typing
    /// indicator shown and the send control disabled; the returned request
    /// must be sent and its result handed to [`finish_turn`](Self::finish_turn).
    pub fn begin_turn(&mut self, raw_input: &str) -> Result<ChatRequest, Skip> {
        let text = raw_input.trim();
        if text.is_empty() {
            return Err(Skip::Empty);
        }
        if self.is_waiting() {
            debug!("submission ignored while a reply is pending");
            return Err(Skip::Busy);
        }

        self.append_message(Sender::User, text);
        self.view.clear_input();
        let indicator = self.view.show_typing_indicator(&self.strings.typing);
        self.view.set_send_enabled(false);
        self.state = TurnState::Waiting(Some(indicator));

        Ok(ChatRequest::new(text))
    }

    /// The waiting turn's response has arrived: remove the typing indicator.
    ///
    /// The turn stays waiting (send disabled) until
    /// [`finish_turn`](Self::finish_turn). Does nothing when idle or when the
    /// indicator is already gone.
    pub fn response_arrived(&mut self) {
        if let TurnState::Waiting(indicator) = &mut self.state {
            if let Some(indicator) = indicator.take() {
                self.view.remove_typing_indicator(indicator);
            }
        }
    }

    /// Resolve the waiting turn with the transport's result.
    ///
    /// Removes the typing indicator if still shown and appends exactly one
    /// bot bubble.
    pub fn finish_turn(&mut self, result: Result<ChatResponse, ChatError>) -> TurnOutcome {
        let TurnState::Waiting(indicator) = std::mem::replace(&mut self.state, TurnState::Idle)
        else {
            warn!("chat reply arrived with no turn waiting");
            return TurnOutcome::Stale;
        };

        if let Some(indicator) = indicator {
            self.view.remove_typing_indicator(indicator);
        }
        self.view.set_send_enabled(true);

        match result {
            Ok(reply) => {
                self.append_message(Sender::Bot, reply.response);
                TurnOutcome::Replied
            }
            Err(ChatError::Server { status, detail }) => {
                warn!(status, detail = detail.as_deref(), "chat server error");
                let text = self.strings.server_error.clone();
                self.append_message(Sender::Bot, text);
                TurnOutcome::ServerError
            }
            Err(err) => {
                error!(error = %err, "chat request failed");
                let text = self.strings.connection_error.clone();
                self.append_message(Sender::Bot, text);
                TurnOutcome::ConnectionError
            }
        }
    }

    /// Run a whole turn against `transport`.
    pub async fn submit<T: ChatTransport>(
        &mut self,
        transport: &T,
        raw_input: &str,
    ) -> SubmitOutcome {
        let request = match self.begin_turn(raw_input) {
            Ok(request) => request,
            Err(skip) => return SubmitOutcome::Skipped(skip),
        };
        let result = match transport.post(&request).await {
            Ok(response) => {
                self.response_arrived();
                transport.read(response).await
            }
            Err(err) => Err(err),
        };
        SubmitOutcome::Finished(self.finish_turn(result))
    }

    /// The user-visible strings in use.
    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    /// The rendering surface.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the rendering surface.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}
