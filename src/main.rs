mod api;
mod app;
mod config;
mod error;
mod events;
mod form;
mod models;
mod orchestrator;
mod presenter;
mod prompt;
mod templates;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{GeminiClient, TextGenerator};
use app::App;
use events::AppEvent;
use presenter::{ClipboardSink, SystemClipboard};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config = config::load_config()?;
    let client: Arc<dyn TextGenerator> = Arc::new(GeminiClient::from_config(&config)?);
    let mut clipboard = SystemClipboard::default();
    let mut app = App::new(config.model.clone());

    tracing::info!(model = %config.model, "starting wildcopy");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channel for async events
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let res = run_app(&mut terminal, &mut app, &client, &mut clipboard, &tx, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "application error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Logs go to a file next to the config so they never draw over the UI
fn init_logging() -> Result<()> {
    let log_path = config::get_log_path()?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wildcopy=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

const OUTPUT_PAGE: usize = 10;

/// Output panel scrolling. Returns true when the key was consumed.
fn handle_scroll_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match key {
        KeyCode::PageUp => app.scroll_up(OUTPUT_PAGE),
        KeyCode::PageDown => app.scroll_down(OUTPUT_PAGE),
        KeyCode::Up if ctrl => app.scroll_up(1),
        KeyCode::Down if ctrl => app.scroll_down(1),
        KeyCode::Home if ctrl => app.scroll_to_top(),
        KeyCode::End if ctrl => app.scroll_to_bottom(),
        _ => return false,
    }
    true
}

/// Keys that work regardless of focus. Returns true when the key was consumed.
fn handle_global_keys(
    app: &mut App,
    key: KeyCode,
    modifiers: KeyModifiers,
    client: &Arc<dyn TextGenerator>,
    clipboard: &mut dyn ClipboardSink,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) -> bool {
    if !modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('h') => app.toggle_help(),
        KeyCode::Char('g' | 's') => {
            if !app.submit(Arc::clone(client), event_tx) {
                app.notice = Some("Add some project details first".to_string());
            }
        }
        KeyCode::Char('y') => app.copy_output(clipboard, event_tx),
        _ => return false,
    }
    true
}

fn handle_form_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
    match key {
        KeyCode::Tab => app.form.focus_next(),
        KeyCode::BackTab => app.form.focus_prev(),
        KeyCode::Enter => app.form.enter(),
        KeyCode::Backspace => app.form.pop_char(),
        KeyCode::Delete => {
            app.form.delete_selected();
        }
        KeyCode::Left => app.form.shift(false),
        KeyCode::Right => app.form.shift(true),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.push_char(c);
        }
        _ => {}
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &Arc<dyn TextGenerator>,
    clipboard: &mut dyn ClipboardSink,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        app.tick = app.tick.wrapping_add(1);
        terminal.draw(|f| ui::render(f, app))?;

        // Drain app events (generation results, timers) first
        while let Ok(app_event) = event_rx.try_recv() {
            app.handle_event(app_event);
        }

        // ~60fps keeps the spinner smooth
        if event::poll(Duration::from_millis(16))? {
            let key = match event::read()? {
                Event::Key(key) => key,
                // Pasted text lands in the focused field in one piece
                Event::Paste(text) if !app.show_help => {
                    app.form.paste(&text);
                    continue;
                }
                _ => continue,
            };

            if key.kind != KeyEventKind::Press {
                continue;
            }

            // Help window swallows everything but its own toggles
            if app.show_help {
                if key.code == KeyCode::Esc
                    || (key.code == KeyCode::Char('h')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    app.show_help = false;
                }
                continue;
            }

            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if app.exit_pending {
                        app.quit();
                    } else {
                        app.exit_pending = true;
                    }
                    continue;
                }
                KeyCode::Esc => {
                    app.exit_pending = false;
                    app.notice = None;
                    continue;
                }
                _ if app.exit_pending => {
                    // Any other key cancels pending exit
                    app.exit_pending = false;
                }
                _ => {}
            }

            if !handle_scroll_keys(app, key.code, key.modifiers)
                && !handle_global_keys(app, key.code, key.modifiers, client, clipboard, event_tx)
            {
                handle_form_keys(app, key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
