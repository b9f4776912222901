//! Playlist store: the ordered tracks, the selected index, and their
//! persisted form.
//!
//! Every mutation goes through `PlaylistStore`, which writes the playlist and
//! selection back to the key-value store in the same call.

mod model;
mod restore;
mod store;

pub use model::{AudioBlob, Track};
pub use restore::{InvalidReason, RestoreReport, RestoredEntry, TrackDescriptor};
pub use store::{PlaylistStore, Selection};
