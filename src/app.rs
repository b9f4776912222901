//! Application module: the state container the runtime and UI share.
//!
//! `App` in `app::model` owns the playlist, the playback controller and the
//! ingestor; `Action`s are the only way to change them.

mod model;

pub use model::*;
