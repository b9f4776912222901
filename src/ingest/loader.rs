//! Background file reads for an ingestion batch.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::trace;

use crate::playlist::{AudioBlob, Track};

pub(super) type LoadOutcome = Result<Track, (PathBuf, io::Error)>;

/// Read every file of the batch on its own thread. The whole batch arrives
/// as a single message, in input order.
pub(super) fn spawn_loader(paths: Vec<PathBuf>) -> Receiver<Vec<LoadOutcome>> {
    let (tx, rx) = mpsc::channel::<Vec<LoadOutcome>>();

    thread::spawn(move || {
        let outcomes: Vec<LoadOutcome> = paths
            .into_iter()
            .map(|path| {
                trace!(path = %path.display(), "reading");
                match AudioBlob::read(&path) {
                    Ok(blob) if blob.is_empty() => Err((
                        path,
                        io::Error::new(io::ErrorKind::InvalidData, "file is empty"),
                    )),
                    Ok(blob) => Ok(Track::from_blob(blob)),
                    Err(e) => Err((path, e)),
                }
            })
            .collect();
        // The receiver is gone when the batch was cancelled.
        let _ = tx.send(outcomes);
    });

    rx
}
