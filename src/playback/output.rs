//! The audio output seam and its rodio implementation.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::types::PlaybackError;

/// What the controller hands to an output when it binds a track.
pub struct MediaSource<'a> {
    /// Object URL the payload is bound to.
    pub url: &'a str,
    pub bytes: Arc<[u8]>,
    /// Offset to start decoding from.
    pub start_at: Duration,
    /// Known duration, if the payload was probed at ingestion.
    pub duration: Option<Duration>,
}

/// A native playback handle.
///
/// `load` leaves the output paused; `play`/`pause` never fail. Times are in
/// seconds, and `duration` may be NaN when unknown.
pub trait AudioOutput {
    fn load(&mut self, source: MediaSource<'_>) -> Result<(), PlaybackError>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Unbind whatever is loaded.
    fn stop(&mut self);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    /// True once the loaded track has played to its end.
    fn poll_ended(&mut self) -> bool;
}

/// Plays through the default output device with one `Sink` per loaded track.
pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    // `Sink::get_pos` counts from where decoding started.
    offset: Duration,
    duration: Option<Duration>,
}

impl RodioOutput {
    pub fn open() -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::NoOutputDevice(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which would end up
        // on top of the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            offset: Duration::ZERO,
            duration: None,
        })
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, source: MediaSource<'_>) -> Result<(), PlaybackError> {
        let decoder = Decoder::new(Cursor::new(source.bytes)).map_err(|e| PlaybackError::Decode {
            url: source.url.to_string(),
            reason: e.to_string(),
        })?;
        let duration = source.duration.or_else(|| decoder.total_duration());

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
        sink.append(decoder.skip_duration(source.start_at));

        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.offset = source.start_at;
        self.duration = duration;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.offset = Duration::ZERO;
        self.duration = None;
    }

    fn current_time(&self) -> f64 {
        self.sink
            .as_ref()
            .map_or(0.0, |s| (self.offset + s.get_pos()).as_secs_f64())
    }

    fn duration(&self) -> f64 {
        self.duration.map_or(f64::NAN, |d| d.as_secs_f64())
    }

    fn poll_ended(&mut self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|s| !s.is_paused() && s.empty())
    }
}
