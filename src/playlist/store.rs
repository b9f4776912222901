use tracing::{debug, info, warn};

use crate::storage::{KEY_CURRENT_TRACK_INDEX, KEY_PLAYLIST, KeyValueStore, StoreError};

use super::model::Track;
use super::restore::{RestoreReport, RestoredEntry, decode_playlist, parse_index};

/// Result of `PlaylistStore::select`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The requested index was in bounds and is now current.
    Selected(usize),
    /// The requested index was out of bounds; the selection fell back to 0.
    Clamped(usize),
}

impl Selection {
    pub fn index(self) -> usize {
        match self {
            Self::Selected(i) | Self::Clamped(i) => i,
        }
    }
}

/// The ordered playlist and the selected index, synchronized to `S`.
pub struct PlaylistStore<S> {
    tracks: Vec<Track>,
    current: usize,
    store: S,
}

impl<S: KeyValueStore> PlaylistStore<S> {
    /// An empty playlist over `store`. Nothing is written until the first
    /// mutation.
    pub fn new(store: S) -> Self {
        Self {
            tracks: Vec::new(),
            current: 0,
            store,
        }
    }

    /// Rebuild the playlist and selection from `store`.
    ///
    /// Entries whose payload cannot be loaded are dropped and reported. The
    /// persisted index is mapped onto the surviving entries; when the
    /// selected entry itself was dropped the selection falls back to 0.
    pub fn restore(store: S) -> (Self, RestoreReport) {
        let raw_playlist = store.get(KEY_PLAYLIST);
        let entries = decode_playlist(raw_playlist.as_deref());
        let persisted_index = parse_index(store.get(KEY_CURRENT_TRACK_INDEX).as_deref());

        let mut report = RestoreReport::default();
        let mut tracks: Vec<Track> = Vec::with_capacity(entries.len());
        let mut selected: Option<usize> = None;

        for (i, entry) in entries.into_iter().enumerate() {
            match entry {
                RestoredEntry::Valid(track) => {
                    if i == persisted_index {
                        selected = Some(tracks.len());
                    }
                    tracks.push(track);
                }
                RestoredEntry::Invalid { name, reason } => {
                    warn!(
                        entry = i,
                        name = name.as_deref().unwrap_or("<unnamed>"),
                        %reason,
                        "dropping invalid playlist entry"
                    );
                    report.dropped.push((name, reason));
                }
            }
        }

        report.restored = tracks.len();
        report.resumable = selected.is_some();
        let current = selected.unwrap_or(0);

        info!(
            restored = report.restored,
            dropped = report.dropped.len(),
            current,
            "restored playlist"
        );

        let mut playlist = Self {
            tracks,
            current,
            store,
        };

        // Write back the cleaned-up view so stale entries do not linger.
        if !report.dropped.is_empty() || current != persisted_index {
            playlist.sync();
        }

        (playlist, report)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// The raw selection index. It may be out of range; use
    /// `current_track` to dereference it.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The selected track, or `None` when the selection is out of range.
    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Append `tracks` in order and persist.
    pub fn append(&mut self, tracks: Vec<Track>) -> &[Track] {
        let added = tracks.len();
        self.tracks.extend(tracks);
        debug!(added, len = self.tracks.len(), "appended to playlist");
        self.sync();
        &self.tracks
    }

    /// Make `index` the current track. Out-of-range indices clamp the
    /// selection to 0 instead of failing.
    pub fn select(&mut self, index: usize) -> Selection {
        let selection = if index < self.tracks.len() {
            Selection::Selected(index)
        } else {
            debug!(index, len = self.tracks.len(), "selection out of range, clamping");
            Selection::Clamped(0)
        };
        self.current = selection.index();
        self.sync();
        selection
    }

    /// Move to the next track, wrapping at the end. `None` on an empty
    /// playlist, which leaves the selection untouched.
    pub fn advance(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.tracks.len();
        self.sync();
        Some(self.current)
    }

    /// Write the playlist descriptors and the selection index to the store.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let descriptors: Vec<_> = self.tracks.iter().map(Track::descriptor).collect();
        let encoded = serde_json::to_string(&descriptors).map_err(|e| StoreError::Serialize {
            key: KEY_PLAYLIST.to_string(),
            reason: e.to_string(),
        })?;

        self.store.set(KEY_PLAYLIST, &encoded)?;
        self.store.set(KEY_CURRENT_TRACK_INDEX, &self.current.to_string())?;
        Ok(())
    }

    /// Persist after a mutation. Storage failures never reach the caller:
    /// the in-memory playlist stays authoritative.
    fn sync(&mut self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to persist playlist");
        }
    }
}
