//! Startup restore: rebuild the playlist from the store and pick up the
//! selected track where the last session left it.

use std::time::Duration;

use tracing::{info, warn};

use crate::playback::{AudioOutput, PlaybackController};
use crate::playlist::{PlaylistStore, RestoreReport, Track};
use crate::storage::{KEY_AUDIO_POSITION, KeyValueStore};

/// What `restore` brought back.
pub struct RestoredSession<S> {
    pub playlist: PlaylistStore<S>,
    pub report: RestoreReport,
    /// Offset the selected track was loaded at, if one was loaded.
    pub resumed_at: Option<Duration>,
}

/// Restore the playlist from `store` and, when the selected entry survived,
/// load it into `controller` playing from the saved position.
///
/// Never fails: anything that cannot be restored is logged and left out,
/// and the controller stays `Idle` when nothing can be resumed.
pub fn restore<S, O>(store: S, controller: &mut PlaybackController<O>) -> RestoredSession<S>
where
    S: KeyValueStore,
    O: AudioOutput,
{
    let position = parse_position(store.get(KEY_AUDIO_POSITION).as_deref());
    let (playlist, report) = PlaylistStore::restore(store);

    let mut resumed_at = None;
    if report.resumable {
        if let Some(track) = playlist.current_track() {
            let offset = resume_offset(track, position);
            match controller.load_at(track, true, offset) {
                Ok(()) => {
                    info!(track = %track.name, ?offset, "resumed playback");
                    resumed_at = Some(offset);
                }
                Err(e) => warn!(track = %track.name, error = %e, "failed to resume playback"),
            }
        }
    }

    RestoredSession {
        playlist,
        report,
        resumed_at,
    }
}

/// Parse a saved `audioPosition`. Missing, negative, non-numeric or
/// out-of-range values mean the start of the track.
pub fn parse_position(raw: Option<&str>) -> Duration {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(Duration::ZERO)
}

/// Where to start `track` given the saved position: from the top when the
/// position is at or past the track's known end.
pub fn resume_offset(track: &Track, position: Duration) -> Duration {
    match track.data.duration() {
        Some(total) if position >= total => Duration::ZERO,
        _ => position,
    }
}
