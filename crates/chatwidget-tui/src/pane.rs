//! Chat pane widget.
//!
//! Message list on top, input line at the bottom.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::line,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::screen::{ChatScreen, Entry};
use crate::theme::Theme;

/// Fixed height for the input area (in lines).
const INPUT_HEIGHT: u16 = 1;

/// Height for the divider line.
const DIVIDER_HEIGHT: u16 = 1;

/// Prompt shown before the input.
const PROMPT: &str = "> ";

/// Placeholder shown in an empty input.
const PLACEHOLDER: &str = "Type your message...";

/// Gutter drawn beside bubble text.
const GUTTER: &str = "│ ";

/// Chat pane widget.
///
/// ```text
/// ┌─ Chat ───────────────────────────────┐
/// │ assistant 12:01                      │
/// │ │ Hi! Ask me anything.               │
/// │                                      │
/// │                         12:02 you    │
/// │                      Which laptop? │ │
/// ├──────────────────────────────────────┤
/// │ > _                                  │
/// └──────────────────────────────────────┘
/// ```
pub struct ChatPane<'a> {
    screen: &'a ChatScreen,
    theme: &'a Theme,
    title: &'a str,
    tick: u64,
}

impl<'a> ChatPane<'a> {
    /// Create a new chat pane.
    pub fn new(screen: &'a ChatScreen, theme: &'a Theme) -> Self {
        Self {
            screen,
            theme,
            title: " Chat ",
            tick: 0,
        }
    }

    /// Set the pane title.
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Set the animation tick (drives the typing pulse).
    #[must_use]
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    fn entry_lines(&self, entry: &Entry, width: usize) -> Vec<Line<'static>> {
        let is_user = entry.message.sender.is_user();
        let (who, color) = if is_user {
            ("you", self.theme.user)
        } else if entry.failed {
            ("assistant", self.theme.error)
        } else {
            ("assistant", self.theme.bot)
        };
        let time = entry.at.format("%H:%M").to_string();

        // Bubbles take at most three quarters of the pane.
        let bubble_width = (width * 3 / 4).max(8).saturating_sub(GUTTER.len());

        let mut lines = Vec::new();
        let header = if is_user {
            Line::from(vec![
                Span::styled(time, Style::default().fg(self.theme.muted)),
                Span::raw(" "),
                Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ])
            .alignment(Alignment::Right)
        } else {
            Line::from(vec![
                Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(time, Style::default().fg(self.theme.muted)),
            ])
        };
        lines.push(header);

        for chunk in textwrap::wrap(&entry.message.text, bubble_width.max(1)) {
            let text = Span::styled(chunk.into_owned(), Style::default().fg(self.theme.text));
            let gutter = Span::styled(GUTTER.trim_end(), Style::default().fg(color));
            let line = if is_user {
                Line::from(vec![text, Span::raw(" "), gutter]).alignment(Alignment::Right)
            } else {
                Line::from(vec![gutter, Span::raw(" "), text])
            };
            lines.push(line);
        }

        lines.push(Line::default());
        lines
    }

    fn typing_line(&self, label: &str) -> Line<'static> {
        let style = if self.tick % 2 == 0 {
            Style::default().fg(self.theme.subtext)
        } else {
            Style::default()
                .fg(self.theme.muted)
                .add_modifier(Modifier::DIM)
        };
        Line::from(vec![
            Span::styled(GUTTER.trim_end(), Style::default().fg(self.theme.bot)),
            Span::raw(" "),
            Span::styled(label.to_string(), style.add_modifier(Modifier::ITALIC)),
        ])
    }

    /// All message lines, oldest first.
    fn message_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = self
            .screen
            .entries()
            .iter()
            .flat_map(|entry| self.entry_lines(entry, width))
            .collect();
        if let Some(label) = self.screen.typing_label() {
            lines.push(self.typing_line(label));
        }
        lines
    }

    fn render_messages(&self, area: Rect, buf: &mut Buffer) {
        let lines = self.message_lines(area.width as usize);
        let height = area.height as usize;

        let max_offset = lines.len().saturating_sub(height);
        let offset = self.screen.scroll_offset().min(max_offset);
        let start = lines.len().saturating_sub(height + offset);
        let end = (start + height).min(lines.len());

        Paragraph::new(lines[start..end].to_vec()).render(area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let input = self.screen.input();
        let enabled = self.screen.send_enabled();
        let prompt_style = if enabled {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.muted)
        };

        let mut spans = vec![Span::styled(PROMPT, prompt_style)];
        if input.is_empty() {
            spans.push(Span::styled("_", Style::default().fg(self.theme.text)));
            spans.push(Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)));
        } else {
            let room = (area.width as usize).saturating_sub(PROMPT.len() + 1);
            let (before, after) = split_at_char(input.content(), input.cursor());
            let before = tail_fitting(before, room);
            spans.push(Span::styled(before.to_string(), Style::default().fg(self.theme.text)));
            spans.push(Span::styled(
                if after.is_empty() { "_" } else { "|" },
                Style::default().fg(self.theme.text),
            ));
            spans.push(Span::styled(after.to_string(), Style::default().fg(self.theme.text)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_divider(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 {
            return;
        }
        let divider = line::HORIZONTAL.repeat(area.width as usize);
        Paragraph::new(Line::from(Span::styled(
            divider,
            Style::default().fg(self.theme.border),
        )))
        .render(area, buf);
    }
}

impl Widget for ChatPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.screen.send_enabled() {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .title(self.title)
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < INPUT_HEIGHT + DIVIDER_HEIGHT + 1 {
            // Not enough space - just show input
            self.render_input(inner, buf);
            return;
        }

        let list_height = inner.height - INPUT_HEIGHT - DIVIDER_HEIGHT;
        let divider_y = inner.y + list_height;
        let input_y = divider_y + DIVIDER_HEIGHT;

        self.render_messages(Rect::new(inner.x, inner.y, inner.width, list_height), buf);
        self.render_divider(Rect::new(inner.x, divider_y, inner.width, DIVIDER_HEIGHT), buf);
        self.render_input(Rect::new(inner.x, input_y, inner.width, INPUT_HEIGHT), buf);
    }
}

fn split_at_char(s: &str, char_index: usize) -> (&str, &str) {
    let at = s
        .char_indices()
        .nth(char_index)
        .map_or(s.len(), |(offset, _)| offset);
    s.split_at(at)
}

/// Longest suffix of `s` that fits in `width` columns.
fn tail_fitting(s: &str, width: usize) -> &str {
    if s.width() <= width {
        return s;
    }
    let mut start = s.len();
    let mut used = 0;
    for (offset, ch) in s.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = offset;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwidget_engine::{ChatView, Message};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    fn render_to_string(screen: &ChatScreen, width: u16, height: u16) -> String {
        let theme = Theme::default();
        let mut terminal = create_test_terminal(width, height);
        terminal
            .draw(|frame| {
                frame.render_widget(ChatPane::new(screen, &theme), frame.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_pane_renders_title_and_placeholder() {
        let screen = ChatScreen::new();
        let content = render_to_string(&screen, 60, 12);
        assert!(content.contains("Chat"));
        assert!(content.contains(PLACEHOLDER));
    }

    #[test]
    fn test_pane_renders_both_senders() {
        let mut screen = ChatScreen::new();
        screen.append_message(&Message::user("Hi"));
        screen.append_message(&Message::bot("Hello"));

        let content = render_to_string(&screen, 60, 14);
        assert!(content.contains("you"));
        assert!(content.contains("assistant"));
        assert!(content.contains("Hi"));
        assert!(content.contains("Hello"));
    }

    #[test]
    fn test_pane_renders_typing_line() {
        let mut screen = ChatScreen::new();
        screen.append_message(&Message::user("Hi"));
        let _handle = screen.show_typing_indicator("Typing...");

        let content = render_to_string(&screen, 60, 12);
        assert!(content.contains("Typing..."));
    }

    #[test]
    fn test_pane_shows_newest_when_overflowing() {
        let mut screen = ChatScreen::new();
        for i in 0..20 {
            screen.append_message(&Message::bot(format!("message-{i}")));
        }

        let content = render_to_string(&screen, 40, 10);
        assert!(content.contains("message-19"));
        assert!(!content.contains("message-0 "));
    }

    /// Foreground of the first cell of `needle` in the rendered pane.
    fn fg_of(screen: &ChatScreen, needle: &str) -> Option<ratatui::style::Color> {
        let theme = Theme::default();
        let mut terminal = create_test_terminal(60, 14);
        terminal
            .draw(|frame| {
                frame.render_widget(ChatPane::new(screen, &theme), frame.area());
            })
            .unwrap();
        let cells = terminal.backend().buffer().content().to_vec();
        let symbols: Vec<&str> = cells.iter().map(|cell| cell.symbol()).collect();
        let len = needle.chars().count();
        (0..symbols.len().saturating_sub(len))
            .find(|&i| symbols[i..i + len].concat() == needle)
            .map(|i| cells[i].fg)
    }

    #[test]
    fn test_failed_bubble_uses_error_color() {
        let theme = Theme::default();

        let mut screen = ChatScreen::new();
        screen.append_message(&Message::bot("fine"));
        assert_eq!(fg_of(&screen, "assistant"), Some(theme.bot));

        let mut screen = ChatScreen::new();
        screen.append_message(&Message::bot("broken"));
        screen.mark_last_failed();
        assert_eq!(fg_of(&screen, "assistant"), Some(theme.error));
    }

    #[test]
    fn test_pane_minimum_size() {
        let mut screen = ChatScreen::new();
        screen.append_message(&Message::bot("hello"));
        // Very small terminal - should not panic
        let _ = render_to_string(&screen, 10, 3);
    }

    #[test]
    fn test_tail_fitting() {
        assert_eq!(tail_fitting("hello", 10), "hello");
        assert_eq!(tail_fitting("hello", 3), "llo");
        assert_eq!(tail_fitting("", 0), "");
    }

    #[test]
    fn test_split_at_char_multibyte() {
        assert_eq!(split_at_char("سلام", 2), ("سل", "ام"));
        assert_eq!(split_at_char("abc", 5), ("abc", ""));
    }
}
