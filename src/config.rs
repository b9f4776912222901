//! Settings for ingestion, storage, logging and the terminal UI.
//!
//! `Settings::load` layers environment overrides over an optional TOML file
//! over the struct defaults; `Settings::validate` rejects values the player
//! cannot run with.

mod load;
mod schema;

pub use schema::*;
