use std::time::Duration;

use tracing::{debug, info, warn};

use crate::playlist::{PlaylistStore, Track};
use crate::storage::{KEY_AUDIO_POSITION, KeyValueStore};

use super::binding::{BlobUrls, ObjectUrl};
use super::output::{AudioOutput, MediaSource};
use super::types::{HandleState, PlaybackError, PlaybackState, progress_percent};

/// Drives one `AudioOutput` through `Idle`, `LoadedPaused` and
/// `LoadedPlaying`, keeping at most one object URL alive at a time.
pub struct PlaybackController<O> {
    output: O,
    urls: BlobUrls,
    binding: Option<ObjectUrl>,
    state: HandleState,
}

impl<O: AudioOutput> PlaybackController<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            urls: BlobUrls::new(),
            binding: None,
            state: HandleState::Idle,
        }
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == HandleState::LoadedPlaying
    }

    /// The object URL currently bound to the output.
    pub fn binding(&self) -> Option<&ObjectUrl> {
        self.binding.as_ref()
    }

    pub fn urls(&self) -> &BlobUrls {
        &self.urls
    }

    /// Bind `track` and start it iff `should_play`.
    pub fn load_and_maybe_play(
        &mut self,
        track: &Track,
        should_play: bool,
    ) -> Result<(), PlaybackError> {
        self.load_at(track, should_play, Duration::ZERO)
    }

    /// Like `load_and_maybe_play`, starting `start_at` into the track.
    ///
    /// On failure the output is unbound and the controller is `Idle`.
    pub fn load_at(
        &mut self,
        track: &Track,
        should_play: bool,
        start_at: Duration,
    ) -> Result<(), PlaybackError> {
        let url = self.urls.create(&track.data);
        let bytes = self
            .urls
            .resolve(url.as_str())
            .ok_or_else(|| PlaybackError::Revoked(url.as_str().to_string()))?;

        let loaded = self.output.load(MediaSource {
            url: url.as_str(),
            bytes,
            start_at,
            duration: track.data.duration(),
        });
        if let Err(e) = loaded {
            self.output.stop();
            self.binding = None;
            self.state = HandleState::Idle;
            return Err(e);
        }

        // Replacing the binding drops (and revokes) the previous URL.
        self.binding = Some(url);
        if should_play {
            self.output.play();
            self.state = HandleState::LoadedPlaying;
        } else {
            self.state = HandleState::LoadedPaused;
        }

        debug!(
            track = %track.name,
            url = self.binding.as_ref().map(ObjectUrl::as_str).unwrap_or_default(),
            ?start_at,
            state = ?self.state,
            "loaded track"
        );
        Ok(())
    }

    /// Flip between playing and paused. Does nothing while `Idle`.
    pub fn toggle_play(&mut self) -> PlaybackState {
        self.state = match self.state {
            HandleState::Idle => HandleState::Idle,
            HandleState::LoadedPaused => {
                self.output.play();
                HandleState::LoadedPlaying
            }
            HandleState::LoadedPlaying => {
                self.output.pause();
                HandleState::LoadedPaused
            }
        };
        self.playback_state()
    }

    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            is_playing: self.is_playing(),
            progress_percent: self.progress(),
        }
    }

    /// Progress of the bound track, from the output's live position.
    pub fn progress(&self) -> f64 {
        if self.state == HandleState::Idle {
            return 0.0;
        }
        Self::on_time_update(self.output.current_time(), self.output.duration())
    }

    /// Convert a time update into a percentage that is never NaN.
    pub fn on_time_update(current_time: f64, duration: f64) -> f64 {
        progress_percent(current_time, duration)
    }

    /// Whether the playing track just reached its end.
    pub fn poll_ended(&mut self) -> bool {
        self.state == HandleState::LoadedPlaying && self.output.poll_ended()
    }

    /// Advance to the next track (wrapping) and start it. Returns the new
    /// index, or `None` for an empty playlist, in which case nothing changes.
    pub fn on_track_ended<S: KeyValueStore>(
        &mut self,
        playlist: &mut PlaylistStore<S>,
    ) -> Result<Option<usize>, PlaybackError> {
        let Some(next) = playlist.advance() else {
            return Ok(None);
        };
        let Some(track) = playlist.get(next) else {
            return Ok(None);
        };
        self.load_and_maybe_play(track, true)?;
        info!(index = next, track = %track.name, "advanced to next track");
        Ok(Some(next))
    }

    /// Save the current position under `audioPosition`. Best effort: the
    /// session is ending, so failures are only logged.
    pub fn on_session_end<K: KeyValueStore + ?Sized>(&self, store: &mut K) {
        let position = self.output.current_time();
        let position = if position.is_finite() && position > 0.0 {
            position
        } else {
            0.0
        };

        match store.set(KEY_AUDIO_POSITION, &position.to_string()) {
            Ok(()) => debug!(position, "saved playback position"),
            Err(e) => warn!(error = %e, "failed to save playback position"),
        }
    }

    /// Stop the output and release the binding.
    pub fn teardown(&mut self) {
        if self.state != HandleState::Idle {
            self.output.stop();
        }
        self.binding = None;
        self.state = HandleState::Idle;
    }
}
