//! Persisted playlist entries and their validation on restore.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::model::{AudioBlob, Track};

/// What gets written to the `playlist` key for each track: the display name
/// and a reference to the audio payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub name: String,
    pub source: PathBuf,
}

/// Why a persisted entry could not be turned back into a track.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("malformed entry: {0}")]
    Malformed(String),

    #[error("audio source no longer exists")]
    Missing,

    #[error("audio source unreadable: {0}")]
    Unreadable(String),

    #[error("audio source is empty")]
    Empty,
}

#[derive(Debug)]
pub enum RestoredEntry {
    Valid(Track),
    Invalid {
        name: Option<String>,
        reason: InvalidReason,
    },
}

impl RestoredEntry {
    /// Validate one raw JSON entry of the persisted playlist.
    pub fn from_value(value: serde_json::Value) -> Self {
        let name = value
            .get("name")
            .and_then(|n| n.as_str())
            .map(str::to_string);

        match serde_json::from_value::<TrackDescriptor>(value) {
            Ok(descriptor) => Self::resolve(descriptor),
            Err(e) => Self::Invalid {
                name,
                reason: InvalidReason::Malformed(e.to_string()),
            },
        }
    }

    /// Load the payload a descriptor points at.
    pub fn resolve(descriptor: TrackDescriptor) -> Self {
        let TrackDescriptor { name, source } = descriptor;
        let reason = match AudioBlob::read(&source) {
            Ok(blob) if !blob.is_empty() => return Self::Valid(Track::new(name, blob)),
            Ok(_) => InvalidReason::Empty,
            Err(e) if e.kind() == ErrorKind::NotFound => InvalidReason::Missing,
            Err(e) => InvalidReason::Unreadable(e.to_string()),
        };
        Self::Invalid {
            name: Some(name),
            reason,
        }
    }
}

/// Outcome of `PlaylistStore::restore`.
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Number of tracks that made it back into the playlist.
    pub restored: usize,
    /// Entries that were dropped, with the reason.
    pub dropped: Vec<(Option<String>, InvalidReason)>,
    /// The persisted selection points at a track that was restored.
    pub resumable: bool,
}

/// Decode the raw `playlist` value. Anything that is not a JSON array is
/// logged and treated as an empty playlist.
pub(super) fn decode_playlist(raw: Option<&str>) -> Vec<RestoredEntry> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values.into_iter().map(RestoredEntry::from_value).collect(),
        Err(e) => {
            warn!(error = %e, "persisted playlist is not a JSON array, starting empty");
            Vec::new()
        }
    }
}

/// Parse the `currentTrackIndex` value; anything unusable means 0.
pub(super) fn parse_index(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok()).unwrap_or(0)
}
