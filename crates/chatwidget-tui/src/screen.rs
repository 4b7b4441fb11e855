//! Terminal-side state of the conversation.

use chatwidget_engine::{ChatView, Message};
use chrono::{DateTime, Local};

use crate::input::TextInputState;

/// A rendered bubble.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The message shown.
    pub message: Message,
    /// When it was appended.
    pub at: DateTime<Local>,
    /// The bubble reports a failed turn.
    pub failed: bool,
}

/// Handle to the live typing line.
#[derive(Debug)]
pub struct TypingHandle {
    serial: u64,
}

/// Conversation state rendered by [`ChatPane`](crate::pane::ChatPane).
#[derive(Debug)]
pub struct ChatScreen {
    entries: Vec<Entry>,
    typing: Option<(u64, String)>,
    next_serial: u64,
    input: TextInputState,
    send_enabled: bool,
    /// Lines scrolled up from the newest entry.
    scroll_offset: usize,
}

impl Default for ChatScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatScreen {
    /// Create an empty screen.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            typing: None,
            next_serial: 0,
            input: TextInputState::new(),
            send_enabled: true,
            scroll_offset: 0,
        }
    }

    /// Bubbles in display order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Label of the typing line, if shown.
    pub fn typing_label(&self) -> Option<&str> {
        self.typing.as_ref().map(|(_, label)| label.as_str())
    }

    /// The message input.
    pub fn input(&self) -> &TextInputState {
        &self.input
    }

    /// Mutable access to the message input.
    pub fn input_mut(&mut self) -> &mut TextInputState {
        &mut self.input
    }

    /// Whether Enter currently sends.
    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    /// Lines scrolled up from the bottom.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Scroll towards older messages.
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Scroll towards newer messages.
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Flag the newest bubble as an error report.
    pub fn mark_last_failed(&mut self) {
        if let Some(entry) = self.entries.last_mut() {
            entry.failed = true;
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

impl ChatView for ChatScreen {
    type Indicator = TypingHandle;

    fn append_message(&mut self, message: &Message) {
        self.entries.push(Entry {
            message: message.clone(),
            at: Local::now(),
            failed: false,
        });
        self.scroll_to_bottom();
    }

    fn show_typing_indicator(&mut self, label: &str) -> TypingHandle {
        self.next_serial += 1;
        self.typing = Some((self.next_serial, label.to_string()));
        self.scroll_to_bottom();
        TypingHandle {
            serial: self.next_serial,
        }
    }

    fn remove_typing_indicator(&mut self, indicator: TypingHandle) {
        if self
            .typing
            .as_ref()
            .is_some_and(|(serial, _)| *serial == indicator.serial)
        {
            self.typing = None;
        }
    }

    fn clear_input(&mut self) {
        self.input.submit();
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
    }
}
