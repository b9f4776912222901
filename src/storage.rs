//! Key-value persistence for the player's session state.
//!
//! The store is a flat map of string keys to string values, shared by every
//! writer in the process. Writers use the `KEY_*` constants below so the key
//! set stays stable between releases.

use std::collections::BTreeMap;

use thiserror::Error;

mod file;
#[cfg(test)]
mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

/// Serialized playlist (JSON array of track descriptors).
pub const KEY_PLAYLIST: &str = "playlist";
/// Selected track index, as a decimal integer.
pub const KEY_CURRENT_TRACK_INDEX: &str = "currentTrackIndex";
/// Playback position in seconds, saved when the session ends.
pub const KEY_AUDIO_POSITION: &str = "audioPosition";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid TOML: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("failed to encode store contents: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("store quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("failed to serialize value for `{key}`: {reason}")]
    Serialize { key: String, reason: String },
}

/// Synchronous string-keyed storage that survives restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. On error the previous value is kept.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Size in bytes the map would occupy after writing `key = value`.
fn size_after_write(entries: &BTreeMap<String, String>, key: &str, value: &str) -> usize {
    entries
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum::<usize>()
        + key.len()
        + value.len()
}

pub(crate) fn check_quota(
    entries: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StoreError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let needed = size_after_write(entries, key, value);
    if needed > quota {
        return Err(StoreError::QuotaExceeded { needed, quota });
    }
    Ok(())
}
