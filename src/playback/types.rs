//! Playback state types and errors.

use thiserror::Error;

/// Lifecycle of the playback handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HandleState {
    /// Nothing bound.
    Idle,
    /// A track is bound and paused.
    LoadedPaused,
    /// A track is bound and playing.
    LoadedPlaying,
}

impl Default for HandleState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Snapshot reported to the UI.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Always finite and within `0.0..=100.0`.
    pub progress_percent: f64,
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("cannot decode {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("object URL {0} was revoked before it could be loaded")]
    Revoked(String),
}

/// `current_time / duration * 100`, or 0 when either side is degenerate
/// (zero, negative, NaN or infinite duration; NaN or negative time).
pub fn progress_percent(current_time: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !current_time.is_finite() {
        return 0.0;
    }
    (current_time / duration * 100.0).clamp(0.0, 100.0)
}
