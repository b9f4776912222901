//! A scriptable `AudioOutput` for tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::output::{AudioOutput, MediaSource};
use super::types::PlaybackError;

#[derive(Debug, Default)]
pub struct FakeState {
    /// URLs passed to `load`, in order.
    pub loads: Vec<String>,
    /// Payload of the most recent load.
    pub bytes: Option<Vec<u8>>,
    pub start_at: Duration,
    pub playing: bool,
    pub stopped: usize,
    pub current_time: f64,
    pub duration: f64,
    pub ended: bool,
    pub fail_next_load: bool,
}

/// Cloning shares the state, so a test can keep a handle after moving the
/// output into a controller.
#[derive(Clone, Default)]
pub struct FakeOutput {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, source: MediaSource<'_>) -> Result<(), PlaybackError> {
        self.with(|s| {
            if s.fail_next_load {
                s.fail_next_load = false;
                return Err(PlaybackError::Decode {
                    url: source.url.to_string(),
                    reason: "scripted failure".to_string(),
                });
            }
            s.loads.push(source.url.to_string());
            s.bytes = Some(source.bytes.to_vec());
            s.start_at = source.start_at;
            s.playing = false;
            s.ended = false;
            s.current_time = source.start_at.as_secs_f64();
            s.duration = source.duration.map_or(f64::NAN, |d| d.as_secs_f64());
            Ok(())
        })
    }

    fn play(&mut self) {
        self.with(|s| s.playing = true);
    }

    fn pause(&mut self) {
        self.with(|s| s.playing = false);
    }

    fn stop(&mut self) {
        self.with(|s| {
            s.playing = false;
            s.stopped += 1;
        });
    }

    fn current_time(&self) -> f64 {
        self.with(|s| s.current_time)
    }

    fn duration(&self) -> f64 {
        self.with(|s| s.duration)
    }

    fn poll_ended(&mut self) -> bool {
        self.with(|s| std::mem::take(&mut s.ended))
    }
}
