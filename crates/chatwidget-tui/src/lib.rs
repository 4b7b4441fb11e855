//! chatwidget-tui: Terminal front end for the chat widget
//!
//! This crate renders the same controller the browser uses into a terminal:
//! - [`ChatScreen`] is the terminal's `ChatView`
//! - [`ChatPane`] draws bubbles, the typing line and the input
//! - [`run_tui`] drives it against an HTTP chat endpoint

mod app;
mod event;
mod input;
mod pane;
mod screen;
mod theme;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use input::TextInputState;
pub use pane::ChatPane;
pub use screen::{ChatScreen, Entry, TypingHandle};
pub use theme::Theme;

use chatwidget_engine::{ChatError, ChatResponse, ChatTransport, HttpTransport, WidgetConfig};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

/// Options for [`run_tui`].
#[derive(Debug, Clone, Default)]
pub struct TuiOptions {
    /// Use basic terminal colors instead of the RGB palette.
    pub high_contrast: bool,
}

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the terminal chat widget.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui(
    config: &WidgetConfig,
    options: &TuiOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let transport = HttpTransport::from_config(config)?;
    info!(endpoint = transport.url(), "starting terminal chat");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = if options.high_contrast {
        Theme::high_contrast()
    } else {
        Theme::default()
    };
    let mut app = App::new(config.strings(), theme, transport.url());

    // 10 Hz keeps the typing pulse and reply pickup responsive
    let mut events = EventHandler::new(100);

    let result = run_loop(&mut terminal, &mut app, &mut events, &transport).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    transport: &HttpTransport,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pending: Option<JoinHandle<Result<ChatResponse, ChatError>>> = None;
    let mut arrived: Option<oneshot::Receiver<()>> = None;

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.render(area, frame.buffer_mut());
        })?;

        if arrived.as_mut().is_some_and(|rx| rx.try_recv().is_ok()) {
            arrived = None;
            app.response_arrived();
        }

        if pending.as_ref().is_some_and(JoinHandle::is_finished) {
            arrived = None;
            if let Some(handle) = pending.take() {
                let result = handle
                    .await
                    .unwrap_or_else(|e| Err(ChatError::Transport(e.to_string())));
                app.complete(result);
            }
        }

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(request) = app.handle_action(key_to_action(key)) {
                        let transport = transport.clone();
                        let (arrived_tx, arrived_rx) = oneshot::channel();
                        arrived = Some(arrived_rx);
                        pending = Some(tokio::spawn(async move {
                            match transport.post(&request).await {
                                Ok(response) => {
                                    let _ = arrived_tx.send(());
                                    transport.read(response).await
                                }
                                Err(err) => Err(err),
                            }
                        }));
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        app.handle_action(Action::ScrollUp);
                    }
                    MouseEventKind::ScrollDown => {
                        app.handle_action(Action::ScrollDown);
                    }
                    _ => {}
                },
                Event::Tick => app.tick(),
                Event::Key(_) | Event::Resize(_, _) => {}
            }
        }

        if app.should_quit {
            if let Some(handle) = pending {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}
