//! The application model: `App` and the `Action`s that drive it.
//!
//! Every input the runtime sees (a key press, a timer tick, the end of a
//! track, shutdown) is turned into an `Action` and passed to
//! `App::dispatch`, which performs the transition and its side effects.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};

use crate::ingest::{IngestPoll, Ingestor};
use crate::playback::{AudioOutput, HandleState, PlaybackController};
use crate::playlist::{PlaylistStore, Selection};
use crate::session::RestoredSession;
use crate::storage::KeyValueStore;

/// An input to `App::dispatch`.
#[derive(Debug)]
pub enum Action {
    /// Start ingesting `paths` as one batch.
    Ingest { paths: Vec<PathBuf>, now: Instant },
    /// Play the track at this index.
    Select(usize),
    /// Play/pause, or start the current selection when nothing is loaded.
    TogglePlay,
    /// Periodic update: ingestion, end of track, progress.
    Tick(Instant),
    /// The playing track finished (or the user skipped it).
    TrackEnded,
    /// Save what is needed to resume later.
    SessionEnd,
    /// Stop everything and release the output.
    Teardown,
}

/// The main application model.
pub struct App<S, O> {
    pub playlist: PlaylistStore<S>,
    pub player: PlaybackController<O>,
    pub ingest: Ingestor,

    /// Playback progress of the bound track, in percent.
    pub progress: f64,
    /// Upload progress of the in-flight batch, 0 when there is none.
    pub upload_progress: u8,

    /// Playlist row under the cursor.
    pub cursor: usize,
    /// Text of the add-files prompt while it is open.
    pub input: Option<String>,
    /// Last message for the user.
    pub notice: Option<String>,
}

impl<S: KeyValueStore, O: AudioOutput> App<S, O> {
    pub fn new(playlist: PlaylistStore<S>, player: PlaybackController<O>, ingest: Ingestor) -> Self {
        let cursor = playlist.current_index();
        let mut app = Self {
            playlist,
            player,
            ingest,
            progress: 0.0,
            upload_progress: 0,
            cursor,
            input: None,
            notice: None,
        };
        app.clamp_cursor();
        app.progress = app.player.progress();
        app
    }

    /// Build the model around a restored session and the controller it
    /// resumed into.
    pub fn from_session(
        session: RestoredSession<S>,
        player: PlaybackController<O>,
        ingest: Ingestor,
    ) -> Self {
        let RestoredSession {
            playlist, report, ..
        } = session;
        let mut app = Self::new(playlist, player, ingest);
        if !report.dropped.is_empty() {
            app.notice = Some(format!(
                "{} saved track(s) could not be restored",
                report.dropped.len()
            ));
        }
        app
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Ingest { paths, now } => match self.ingest.begin(paths, now) {
                Ok(()) => {
                    self.upload_progress = self.ingest.progress(now);
                    self.notice = None;
                }
                Err(e) => self.report(e.to_string()),
            },
            Action::Select(index) => self.select(index),
            Action::TogglePlay => self.toggle_play(),
            Action::Tick(now) => self.tick(now),
            Action::TrackEnded => self.advance(),
            Action::SessionEnd => self.player.on_session_end(self.playlist.store_mut()),
            Action::Teardown => {
                self.ingest.cancel();
                self.player.teardown();
                self.progress = 0.0;
                self.upload_progress = 0;
            }
        }
    }

    fn select(&mut self, index: usize) {
        match self.playlist.select(index) {
            Selection::Selected(i) => {
                self.cursor = i;
                let Some(track) = self.playlist.get(i) else {
                    return;
                };
                match self.player.load_and_maybe_play(track, true) {
                    Ok(()) => info!(index = i, track = %track.name, "playing selection"),
                    Err(e) => {
                        let message = format!("cannot play {}: {e}", track.name);
                        self.report(message);
                    }
                }
            }
            Selection::Clamped(_) => {
                self.report(format!("no track at position {}", index.saturating_add(1)));
            }
        }
        self.progress = self.player.progress();
    }

    fn toggle_play(&mut self) {
        if self.player.state() == HandleState::Idle {
            let Some(track) = self.playlist.current_track() else {
                return;
            };
            if let Err(e) = self.player.load_and_maybe_play(track, true) {
                let message = format!("cannot play {}: {e}", track.name);
                self.report(message);
            }
        } else {
            self.player.toggle_play();
        }
        self.progress = self.player.progress();
    }

    fn tick(&mut self, now: Instant) {
        self.upload_progress = match self.ingest.poll(now) {
            IngestPoll::Idle => 0,
            IngestPoll::Pending { progress } => progress,
            IngestPoll::Committed(tracks) => {
                let added = tracks.len();
                self.playlist.append(tracks);
                self.notice = Some(format!("added {added} track(s)"));
                0
            }
            IngestPoll::Failed(e) => {
                self.report(e.to_string());
                0
            }
        };

        if self.player.poll_ended() {
            self.advance();
        }
        self.progress = self.player.progress();
    }

    fn advance(&mut self) {
        match self.player.on_track_ended(&mut self.playlist) {
            Ok(Some(index)) => self.cursor = index,
            Ok(None) => {}
            Err(e) => self.report(format!("cannot play next track: {e}")),
        }
        self.progress = self.player.progress();
    }

    fn report(&mut self, message: String) {
        warn!("{message}");
        self.notice = Some(message);
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.playlist.len() {
            self.cursor = 0;
        }
    }

    /// Move the cursor down one row, wrapping to the top.
    pub fn cursor_down(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    /// Move the cursor up one row, wrapping to the bottom.
    pub fn cursor_up(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.cursor = (self.cursor + len - 1) % len;
        }
    }

    /// Name of the bound track, if any.
    pub fn now_playing(&self) -> Option<&str> {
        if self.player.state() == HandleState::Idle {
            return None;
        }
        self.playlist.current_track().map(|t| t.name.as_str())
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Open the add-files prompt.
    pub fn open_input(&mut self) {
        self.input = Some(String::new());
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    pub fn push_input(&mut self, c: char) {
        if let Some(input) = self.input.as_mut() {
            input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.pop();
        }
    }

    /// Close the prompt and return the whitespace-separated paths typed in.
    pub fn submit_input(&mut self) -> Vec<PathBuf> {
        self.input
            .take()
            .map(|text| text.split_whitespace().map(PathBuf::from).collect())
            .unwrap_or_default()
    }
}
