//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::UiSettings;
use crate::playback::AudioOutput;
use crate::storage::KeyValueStore;

const CONTROLS: [(&str, &str); 6] = [
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("n", "next"),
    ("a", "add files"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// The upload gauge only shows while a batch is partway through.
fn upload_visible(progress: u8) -> bool {
    progress > 0 && progress < 100
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into `frame`.
pub fn draw<S: KeyValueStore, O: AudioOutput>(frame: &mut Frame, app: &App<S, O>, ui: &UiSettings) {
    let uploading = upload_visible(app.upload_progress);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if uploading { 3 } else { 0 }),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadence ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    if uploading {
        let upload = Gauge::default()
            .block(Block::bordered().title(" uploading "))
            .percent(u16::from(app.upload_progress));
        frame.render_widget(upload, chunks[1]);
    }

    // Playlist
    {
        let current = app.playlist.current_index();
        let items: Vec<ListItem> = app
            .playlist
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, track)| {
                if i == current && app.now_playing().is_some() {
                    ListItem::new(format!("♪ {}", track.name)).bold()
                } else {
                    ListItem::new(format!("  {}", track.name))
                }
            })
            .collect();

        let title = format!(" playlist ({}) ", app.playlist.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if !app.playlist.is_empty() {
            state.select(Some(app.cursor));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Now playing
    {
        let block = Block::bordered().padding(left_pad()).title(" now playing ");
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(block.inner(chunks[3]));

        let label = match app.now_playing() {
            Some(name) => {
                let state = if app.is_playing() { "Pause" } else { "Play" };
                format!("Now playing: {name}  [{state}]")
            }
            None => "Nothing playing  [Play]".to_string(),
        };
        frame.render_widget(block, chunks[3]);
        frame.render_widget(Paragraph::new(label), rows[0]);

        let progress = Gauge::default()
            .ratio((app.progress / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.0}%", app.progress));
        frame.render_widget(progress, rows[1]);
    }

    // Footer: notice when there is one, controls otherwise.
    let (title, footer_text) = match app.notice.as_deref() {
        Some(notice) => (" notice ", notice.to_string()),
        None => (" controls ", controls_text()),
    };
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    // Add-files prompt over the playlist.
    if let Some(input) = app.input.as_deref() {
        let popup_area = centered_rect_sized(72, 3, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(format!("{input}_")).block(
            Block::default()
                .borders(Borders::ALL)
                .padding(left_pad())
                .title(" add files (enter submits, esc cancels) "),
        );
        frame.render_widget(prompt, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_gauge_hidden_at_rest_and_at_completion() {
        assert!(!upload_visible(0));
        assert!(upload_visible(1));
        assert!(upload_visible(99));
        assert!(!upload_visible(100));
    }

    #[test]
    fn controls_list_every_key() {
        let text = controls_text();
        for (key, _) in CONTROLS {
            assert!(text.contains(&format!("[{key}]")));
        }
    }
}
