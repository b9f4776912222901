//! Playback controller and the output it drives.
//!
//! `PlaybackController` is the only owner of the audio output. Every track it
//! loads is bound through an `ObjectUrl`, which is revoked as soon as the
//! next track replaces it or the controller is torn down.

mod binding;
mod controller;
mod output;
mod types;

pub use binding::{BlobUrls, ObjectUrl};
pub use controller::PlaybackController;
pub use output::{AudioOutput, MediaSource, RodioOutput};
pub use types::{HandleState, PlaybackError, PlaybackState, progress_percent};

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
