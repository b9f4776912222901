use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Action, App};
use crate::config;
use crate::ingest::discover;
use crate::playback::AudioOutput;
use crate::storage::KeyValueStore;
use crate::ui;

/// Main terminal event loop: ticks the app, draws, and turns key presses
/// into actions. Returns `Ok(())` when the user quits.
pub fn run<S: KeyValueStore, O: AudioOutput>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<S, O>,
) -> Result<(), Box<dyn std::error::Error>> {
    let poll_interval = Duration::from_millis(settings.ui.poll_interval_ms);

    loop {
        app.dispatch(Action::Tick(Instant::now()));

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
fn handle_key_event<S: KeyValueStore, O: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<S, O>,
) -> bool {
    if app.input.is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.pop_input(),
            KeyCode::Enter => {
                let typed = app.submit_input();
                if !typed.is_empty() {
                    let paths = discover(&typed, &settings.library);
                    app.dispatch(Action::Ingest {
                        paths,
                        now: Instant::now(),
                    });
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_input(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Enter => {
            if !app.playlist.is_empty() {
                let cursor = app.cursor;
                app.dispatch(Action::Select(cursor));
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => app.dispatch(Action::TogglePlay),
        KeyCode::Char('n') => app.dispatch(Action::TrackEnded),
        KeyCode::Char('a') => app.open_input(),
        _ => {}
    }

    false
}
