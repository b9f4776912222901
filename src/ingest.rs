//! Ingestion: turning user-selected paths into playlist tracks.
//!
//! Paths are expanded into audio files (`discover`), read on a loader thread,
//! and committed to the playlist as one batch once the staged progress
//! animation has run its course. Only one batch is in flight at a time.
//!
//! The progress shown while a batch is pending is simulated: it advances in
//! fixed steps on a timer and says nothing about how far the reads got.

use thiserror::Error;

mod discover;
mod loader;
mod task;

pub use discover::discover;
pub use task::{IngestPoll, Ingestor};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("no audio files selected")]
    EmptyBatch,

    #[error("ingestion already in progress ({pending} files pending)")]
    InProgress { pending: usize },

    #[error("none of the selected files could be read")]
    NothingReadable,

    #[error("file loader stopped unexpectedly")]
    LoaderDisconnected,
}
