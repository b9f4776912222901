use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::app::{Action, App};
use crate::config;
use crate::ingest::{Ingestor, discover};
use crate::playback::{AudioOutput, PlaybackController};
use crate::session;
use crate::storage::FileStore;

/// Open the state file, restore the last session into `output` and queue
/// any paths given on the command line as the first upload.
pub fn build_app<O: AudioOutput>(
    settings: &config::Settings,
    output: O,
    args: &[PathBuf],
) -> App<FileStore, O> {
    let store = FileStore::open(settings.state_path(), settings.storage.quota_bytes);
    info!(path = %store.path().display(), "opened session store");

    let mut player = PlaybackController::new(output);
    let restored = session::restore(store, &mut player);
    info!(
        tracks = restored.playlist.len(),
        resumed_at = ?restored.resumed_at,
        "session restored"
    );
    let mut app = App::from_session(restored, player, Ingestor::new(settings.ingest.clone()));

    if !args.is_empty() {
        let paths = discover(args, &settings.library);
        app.dispatch(Action::Ingest {
            paths,
            now: Instant::now(),
        });
    }

    app
}
