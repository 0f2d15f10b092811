//! Bounded-concurrency file writer with per-operation failure isolation.
//!
//! [`ParallelFileWriter::write_all`] runs every submitted operation to a
//! terminal state on a dedicated worker pool of at most `concurrency`
//! threads. One operation failing never cancels another. The returned
//! [`WriteReport`] accounts for every operation exactly once:
//! `successful + failed + skipped == submitted`. A panicking filesystem
//! adapter fails only the operation it was serving.

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, panic_message, ports::Filesystem};
use crate::domain::{GeneratedFile, validate_relative_path};
use crate::error::{FledgeError, FledgeResult};

/// One (relative path, content) pair destined for the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOperation {
    pub path: String,
    pub content: String,
    /// When `false`, an existing target is left untouched and the operation
    /// is reported as skipped.
    pub overwrite: bool,
}

impl WriteOperation {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            overwrite: true,
        }
    }

    pub fn preserve_existing(mut self) -> Self {
        self.overwrite = false;
        self
    }
}

impl From<GeneratedFile> for WriteOperation {
    fn from(file: GeneratedFile) -> Self {
        let (path, content, overwrite) = file.into_parts();
        Self {
            path,
            content,
            overwrite,
        }
    }
}

/// Terminal state of a single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Target existed and the operation asked not to overwrite it.
    Skipped,
    Failed(FledgeError),
}

/// Outcome of the operation that targeted `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub path: String,
    pub outcome: WriteOutcome,
}

/// A failed operation, for logging and reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub path: String,
    pub error: FledgeError,
}

/// Aggregate result of a batch. Never partial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// One entry per submitted operation, sorted by path.
    pub outcomes: Vec<OperationOutcome>,
}

impl WriteReport {
    pub fn total(&self) -> usize {
        self.successful + self.failed + self.skipped
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn failures(&self) -> Vec<WriteFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.outcome {
                WriteOutcome::Failed(error) => Some(WriteFailure {
                    path: o.path.clone(),
                    error: error.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

#[derive(Default)]
struct Counters {
    successful: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
}

/// Writes batches of files through the [`Filesystem`] port.
#[derive(Clone)]
pub struct ParallelFileWriter {
    filesystem: Arc<dyn Filesystem>,
}

impl ParallelFileWriter {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write every operation under `base`, at most `concurrency` at a time.
    ///
    /// Blocks until all operations are terminal. The only error is failing
    /// to start the worker pool; per-file failures land in the report.
    #[instrument(skip_all, fields(base = %base.display(), operations = operations.len(), concurrency = concurrency.get()))]
    pub fn write_all(
        &self,
        base: &Path,
        operations: Vec<WriteOperation>,
        concurrency: NonZeroUsize,
    ) -> FledgeResult<WriteReport> {
        let submitted = operations.len();
        if submitted == 0 {
            return Ok(WriteReport::default());
        }

        let workers = concurrency.get().min(submitted);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("fledge-writer-{i}"))
            .build()
            .map_err(|e| ApplicationError::WorkerPool {
                reason: e.to_string(),
            })?;

        let counters = Counters::default();

        let mut outcomes: Vec<OperationOutcome> = pool.install(|| {
            operations
                .into_par_iter()
                .map(|op| {
                    let path = op.path.clone();
                    let outcome = match self.write_one(base, op) {
                        Ok(true) => {
                            counters.successful.fetch_add(1, Ordering::Relaxed);
                            WriteOutcome::Written
                        }
                        Ok(false) => {
                            counters.skipped.fetch_add(1, Ordering::Relaxed);
                            debug!(path = %path, "Kept existing file");
                            WriteOutcome::Skipped
                        }
                        Err(error) => {
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                            warn!(path = %path, error = %error, "File write failed");
                            WriteOutcome::Failed(error)
                        }
                    };
                    OperationOutcome { path, outcome }
                })
                .collect()
        });
        outcomes.sort_by(|a, b| a.path.cmp(&b.path));

        let report = WriteReport {
            successful: counters.successful.into_inner(),
            failed: counters.failed.into_inner(),
            skipped: counters.skipped.into_inner(),
            outcomes,
        };
        debug_assert_eq!(report.total(), submitted);

        info!(
            successful = report.successful,
            failed = report.failed,
            skipped = report.skipped,
            workers,
            "Write batch finished"
        );
        Ok(report)
    }

    /// `Ok(true)` written, `Ok(false)` skipped.
    fn write_one(&self, base: &Path, op: WriteOperation) -> FledgeResult<bool> {
        validate_relative_path(&op.path)?;
        let target = base.join(&op.path);

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| -> FledgeResult<bool> {
            if !op.overwrite && self.filesystem.exists(&target) {
                return Ok(false);
            }
            if let Some(parent) = target.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&target, &op.content)?;
            Ok(true)
        }));

        attempt.unwrap_or_else(|payload| {
            Err(ApplicationError::FilesystemError {
                path: target.clone(),
                reason: format!("filesystem panicked: {}", panic_message(payload.as_ref())),
            }
            .into())
        })
    }
}
