//! Rendering seam of the controller.
//!
//! A [`ChatView`] is whatever surface shows the conversation: a DOM
//! subtree, a terminal pane, or the in-memory [`Transcript`].

use crate::message::Message;

/// A surface that renders the conversation.
///
/// Both [`append_message`](ChatView::append_message) and
/// [`show_typing_indicator`](ChatView::show_typing_indicator) must leave the
/// message list scrolled to its newest entry.
pub trait ChatView {
    /// Owned handle to a live typing indicator.
    type Indicator;

    /// Append a bubble for `message`, rendering its text literally.
    fn append_message(&mut self, message: &Message);

    /// Append the typing placeholder and return the handle that removes it.
    fn show_typing_indicator(&mut self, label: &str) -> Self::Indicator;

    /// Remove the indicator created by `show_typing_indicator`.
    fn remove_typing_indicator(&mut self, indicator: Self::Indicator);

    /// Empty the text input.
    fn clear_input(&mut self);

    /// Enable or disable the send control.
    fn set_send_enabled(&mut self, enabled: bool);
}

/// Handle to the [`Transcript`] typing indicator.
#[derive(Debug)]
pub struct TranscriptIndicator {
    serial: usize,
}

/// In-memory conversation view.
#[derive(Debug)]
pub struct Transcript {
    messages: Vec<Message>,
    indicator: Option<(usize, String)>,
    indicators_shown: usize,
    draft: String,
    send_enabled: bool,
    scroll_count: usize,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            indicator: None,
            indicators_shown: 0,
            draft: String::new(),
            send_enabled: true,
            scroll_count: 0,
        }
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Label of the live typing indicator, if one is shown.
    pub fn typing_label(&self) -> Option<&str> {
        self.indicator.as_ref().map(|(_, label)| label.as_str())
    }

    /// Number of live typing indicators (0 or 1).
    pub fn indicator_count(&self) -> usize {
        usize::from(self.indicator.is_some())
    }

    /// Total indicators shown over the transcript's life.
    pub fn indicators_shown(&self) -> usize {
        self.indicators_shown
    }

    /// Current text input contents.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the text input contents.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Whether the send control is enabled.
    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    /// How many times the list was scrolled to the bottom.
    pub fn scroll_count(&self) -> usize {
        self.scroll_count
    }
}

impl ChatView for Transcript {
    type Indicator = TranscriptIndicator;

    fn append_message(&mut self, message: &Message) {
        self.messages.push(message.clone());
        self.scroll_count += 1;
    }

    fn show_typing_indicator(&mut self, label: &str) -> TranscriptIndicator {
        self.indicators_shown += 1;
        let serial = self.indicators_shown;
        self.indicator = Some((serial, label.to_string()));
        self.scroll_count += 1;
        TranscriptIndicator { serial }
    }

    fn remove_typing_indicator(&mut self, indicator: TranscriptIndicator) {
        if self
            .indicator
            .as_ref()
            .is_some_and(|(serial, _)| *serial == indicator.serial)
        {
            self.indicator = None;
        }
    }

    fn clear_input(&mut self) {
        self.draft.clear();
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_scrolls() {
        let mut view = Transcript::new();
        view.append_message(&Message::bot("hello"));
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.scroll_count(), 1);
    }

    #[test]
    fn test_indicator_lifecycle() {
        let mut view = Transcript::new();
        let handle = view.show_typing_indicator("typing");
        assert_eq!(view.typing_label(), Some("typing"));
        assert_eq!(view.indicator_count(), 1);

        view.remove_typing_indicator(handle);
        assert_eq!(view.indicator_count(), 0);
        assert_eq!(view.indicators_shown(), 1);
    }

    #[test]
    fn test_stale_handle_does_not_remove_newer_indicator() {
        let mut view = Transcript::new();
        let old = view.show_typing_indicator("a");
        let _new = view.show_typing_indicator("b");

        view.remove_typing_indicator(old);
        assert_eq!(view.typing_label(), Some("b"));
    }
}
