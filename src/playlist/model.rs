use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::*;

use super::restore::TrackDescriptor;

/// The bytes of an ingested audio file, plus where they came from.
///
/// Cloning is cheap: the payload is shared and never mutated.
#[derive(Clone)]
pub struct AudioBlob {
    path: PathBuf,
    bytes: Arc<[u8]>,
    duration: Option<Duration>,
}

impl AudioBlob {
    pub fn new(
        path: impl Into<PathBuf>,
        bytes: impl Into<Arc<[u8]>>,
        duration: Option<Duration>,
    ) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
            duration,
        }
    }

    /// Read the whole file at `path` into memory and probe its duration.
    pub fn read(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let duration = probe_duration(path);
        Ok(Self::new(path, bytes, duration))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Duration from the file's tags/stream info, when it could be read.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl fmt::Debug for AudioBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioBlob")
            .field("path", &self.path)
            .field("len", &self.bytes.len())
            .field("duration", &self.duration)
            .finish()
    }
}

/// Zero means lofty could not determine it.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

/// One playlist entry: a display name and the audio it plays.
#[derive(Clone, Debug)]
pub struct Track {
    pub name: String,
    pub data: AudioBlob,
}

impl Track {
    pub fn new(name: impl Into<String>, data: AudioBlob) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Name the track after its file name, extension included.
    pub fn from_blob(data: AudioBlob) -> Self {
        let name = data
            .path()
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self { name, data }
    }

    /// The persisted reference to this track.
    pub fn descriptor(&self) -> TrackDescriptor {
        TrackDescriptor {
            name: self.name.clone(),
            source: self.data.path().to_path_buf(),
        }
    }
}
