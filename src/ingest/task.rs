use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::IngestSettings;
use crate::playlist::Track;

use super::IngestError;
use super::loader::{LoadOutcome, spawn_loader};

/// Highest progress reported while a batch is still pending. 100 is only
/// ever implied by the commit itself.
const MAX_PENDING_PROGRESS: u8 = 99;

/// What `Ingestor::poll` observed.
#[derive(Debug)]
pub enum IngestPoll {
    /// Nothing in flight.
    Idle,
    /// A batch is in flight.
    Pending { progress: u8 },
    /// The batch is done; these tracks go to the playlist, in order.
    Committed(Vec<Track>),
    /// The batch ended without anything to commit.
    Failed(IngestError),
}

/// One in-flight batch: the loader's channel plus the progress schedule.
///
/// Dropping the task cancels it; the loader's result is discarded.
pub struct IngestTask {
    started_at: Instant,
    files: usize,
    rx: Receiver<Vec<LoadOutcome>>,
    loaded: Option<Vec<Track>>,
    step_interval: Duration,
    step_percent: u8,
    commit_delay: Duration,
}

impl IngestTask {
    pub fn start(paths: Vec<PathBuf>, settings: &IngestSettings, now: Instant) -> Self {
        let files = paths.len();
        Self {
            started_at: now,
            files,
            rx: spawn_loader(paths),
            loaded: None,
            step_interval: Duration::from_millis(settings.step_interval_ms.max(1)),
            step_percent: settings.step_percent,
            commit_delay: Duration::from_millis(settings.commit_delay_ms),
        }
    }

    /// Number of files in the batch.
    pub fn files(&self) -> usize {
        self.files
    }

    /// Simulated progress at `now`: one fixed step per elapsed interval.
    pub fn progress(&self, now: Instant) -> u8 {
        let elapsed = now.saturating_duration_since(self.started_at);
        let steps = elapsed.as_millis() / self.step_interval.as_millis().max(1);
        let percent = steps.saturating_mul(u128::from(self.step_percent));
        percent.min(u128::from(MAX_PENDING_PROGRESS)) as u8
    }

    fn poll(&mut self, now: Instant) -> IngestPoll {
        if self.loaded.is_none() {
            match self.rx.try_recv() {
                Ok(outcomes) => self.loaded = Some(Self::keep_readable(outcomes)),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    return IngestPoll::Failed(IngestError::LoaderDisconnected);
                }
            }
        }

        let due = now.saturating_duration_since(self.started_at) >= self.commit_delay;
        match self.loaded.take() {
            Some(tracks) if due => {
                if tracks.is_empty() {
                    IngestPoll::Failed(IngestError::NothingReadable)
                } else {
                    IngestPoll::Committed(tracks)
                }
            }
            loaded => {
                self.loaded = loaded;
                IngestPoll::Pending {
                    progress: self.progress(now),
                }
            }
        }
    }

    fn keep_readable(outcomes: Vec<LoadOutcome>) -> Vec<Track> {
        outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(track) => Some(track),
                Err((path, e)) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    None
                }
            })
            .collect()
    }
}

/// Serializes ingestion: at most one `IngestTask` at a time.
pub struct Ingestor {
    settings: IngestSettings,
    task: Option<IngestTask>,
}

impl Ingestor {
    pub fn new(settings: IngestSettings) -> Self {
        Self {
            settings,
            task: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    /// Upload progress to display: 0 when nothing is in flight.
    pub fn progress(&self, now: Instant) -> u8 {
        self.task.as_ref().map_or(0, |t| t.progress(now))
    }

    /// Start ingesting `paths`. A second batch while one is in flight is
    /// rejected, never interleaved.
    pub fn begin(&mut self, paths: Vec<PathBuf>, now: Instant) -> Result<(), IngestError> {
        if paths.is_empty() {
            return Err(IngestError::EmptyBatch);
        }
        if let Some(task) = self.task.as_ref() {
            return Err(IngestError::InProgress {
                pending: task.files(),
            });
        }

        info!(files = paths.len(), "ingestion started");
        self.task = Some(IngestTask::start(paths, &self.settings, now));
        Ok(())
    }

    /// Advance the in-flight batch. A `Committed` or `Failed` result ends it.
    pub fn poll(&mut self, now: Instant) -> IngestPoll {
        let Some(task) = self.task.as_mut() else {
            return IngestPoll::Idle;
        };

        let poll = task.poll(now);
        if !matches!(poll, IngestPoll::Pending { .. }) {
            self.task = None;
        }
        poll
    }

    /// Drop the in-flight batch, if any. Nothing of it is committed.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.task.take().is_some();
        if cancelled {
            info!("ingestion cancelled");
        }
        cancelled
    }
}
