//! Application state for the terminal widget.

use chatwidget_engine::{
    ChatController, ChatError, ChatRequest, ChatResponse, Skip, Strings, TurnOutcome,
};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tracing::debug;

use crate::event::Action;
use crate::pane::ChatPane;
use crate::screen::ChatScreen;
use crate::theme::Theme;

/// Lines moved by one PageUp/PageDown.
const SCROLL_STEP: usize = 5;

/// Terminal chat application.
pub struct App {
    controller: ChatController<ChatScreen>,
    theme: Theme,
    title: String,
    tick: u64,
    /// Set once the user asked to leave.
    pub should_quit: bool,
}

impl App {
    /// Create the app and show the greeting.
    pub fn new(strings: Strings, theme: Theme, server: &str) -> Self {
        let mut controller = ChatController::new(ChatScreen::new(), strings);
        controller.greet();
        Self {
            controller,
            theme,
            title: format!(" Chat · {server} "),
            tick: 0,
            should_quit: false,
        }
    }

    /// Conversation state.
    pub fn screen(&self) -> &ChatScreen {
        self.controller.view()
    }

    /// Whether a reply is pending.
    pub fn is_waiting(&self) -> bool {
        self.controller.is_waiting()
    }

    /// Apply a key action.
    ///
    /// Returns the request to send when the action started a turn.
    pub fn handle_action(&mut self, action: Action) -> Option<ChatRequest> {
        let screen = self.controller.view_mut();
        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => {
                let raw = screen.input().content().to_string();
                return match self.controller.begin_turn(&raw) {
                    Ok(request) => Some(request),
                    Err(Skip::Busy) => {
                        debug!("still waiting for the previous reply");
                        None
                    }
                    Err(Skip::Empty) => None,
                };
            }
            Action::Insert(c) => screen.input_mut().insert(c),
            Action::Backspace => screen.input_mut().backspace(),
            Action::Delete => screen.input_mut().delete(),
            Action::Left => screen.input_mut().move_left(),
            Action::Right => screen.input_mut().move_right(),
            Action::Home => screen.input_mut().move_home(),
            Action::End => screen.input_mut().move_end(),
            Action::HistoryPrev => screen.input_mut().history_prev(),
            Action::HistoryNext => screen.input_mut().history_next(),
            Action::ScrollUp => screen.scroll_up(SCROLL_STEP),
            Action::ScrollDown => screen.scroll_down(SCROLL_STEP),
            Action::None => {}
        }
        None
    }

    /// The pending request's response status has arrived.
    pub fn response_arrived(&mut self) {
        self.controller.response_arrived();
    }

    /// Deliver the result of the request returned by `handle_action`.
    pub fn complete(&mut self, result: Result<ChatResponse, ChatError>) -> TurnOutcome {
        let outcome = self.controller.finish_turn(result);
        if outcome.is_error() {
            self.controller.view_mut().mark_last_failed();
        }
        outcome
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Render the whole screen.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        ChatPane::new(self.controller.view(), &self.theme)
            .title(&self.title)
            .tick(self.tick)
            .render(area, buf);
    }
}
