//! Parallel bulk file copy
//!
//! A [`CopyEngine`] spreads a list of [`CopyAction`]s over a fixed pool of worker
//! threads. The action list is cut into at most `pool_size` contiguous batches of
//! `ceil(total / pool_size)` actions, one batch per worker. The call returns once every
//! batch has reported completion, or with the first failure any worker reports.
//!
//! Pools live for a single call: workers are stopped and joined when the call settles,
//! whatever the outcome. Files copied before a failure stay on disk.
//!
//! ```text
//!   copy_files([a0..a9]), pool_size = 4
//!     worker 0: a0 a1 a2
//!     worker 1: a3 a4 a5
//!     worker 2: a6 a7 a8
//!     worker 3: a9
//! ```

mod worker;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::config::{BacklogOrder, StoreConfig};
use crate::error::{Result, copy};

use worker::{Worker, WorkerEvent, WorkerHandle};

/// Copy one file from `src` to `dest`; the destination directory must already exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyAction {
    pub src: PathBuf,
    pub dest: PathBuf,
}

impl CopyAction {
    pub fn new(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
        }
    }
}

/// Ordered actions handed to a single worker
pub type WorkBatch = Vec<CopyAction>;

/// Split `actions` into contiguous batches of `ceil(len / pool_size)` actions
///
/// Never yields an empty batch, and never more than `pool_size` batches.
pub fn plan_batches(actions: Vec<CopyAction>, pool_size: usize) -> Vec<WorkBatch> {
    if actions.is_empty() {
        return Vec::new();
    }
    let chunk_size = actions.len().div_ceil(pool_size.max(1));

    let mut batches = Vec::new();
    let mut iter = actions.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(chunk_size).collect());
    }
    batches
}

/// Fixed-size pool of copy workers
#[derive(Debug, Clone)]
pub struct CopyEngine {
    pool_size: usize,
    backlog_order: BacklogOrder,
}

impl CopyEngine {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            pool_size: config.pool_size(),
            backlog_order: config.backlog_order,
        }
    }

    /// Engine with an exact pool size, ignoring CPU count
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self {
            pool_size: pool_size.max(1),
            backlog_order: BacklogOrder::default(),
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Copy every action, in parallel across the pool
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError::CopyFailed` reported by any worker, or
    /// `StoreError::WorkerFailed` if a worker cannot be started or dies.
    pub fn copy_files(&self, actions: Vec<CopyAction>) -> Result<()> {
        self.copy_files_with_report(actions).map(|_| ())
    }

    /// Like [`CopyEngine::copy_files`], also reporting which workers did the copying
    ///
    /// # Errors
    ///
    /// See [`CopyEngine::copy_files`].
    pub fn copy_files_with_report(&self, actions: Vec<CopyAction>) -> Result<CopyReport> {
        let total = actions.len();
        let batches = plan_batches(actions, self.pool_size);
        let mut report = CopyReport::default();
        if batches.is_empty() {
            return Ok(report);
        }

        let (event_tx, event_rx) = mpsc::channel();
        let pool = WorkerPool::spawn(self.pool_size, self.backlog_order, &event_tx)?;
        drop(event_tx);

        let mut pending = pool.dispatch(batches)?;
        tracing::debug!(total, workers = pending, "dispatched copy batches");

        while pending > 0 {
            match event_rx.recv() {
                Ok(WorkerEvent::Completed { worker, copied }) => {
                    tracing::trace!(worker, copied, "copy batch completed");
                    report.workers.insert(worker);
                    report.copied += copied;
                    pending -= 1;
                }
                Ok(WorkerEvent::Failed { worker, error }) => {
                    tracing::debug!(worker, %error, "copy worker failed");
                    return Err(error);
                }
                Err(_) => {
                    return Err(copy::worker_failed(
                        "copy workers exited before finishing",
                    ));
                }
            }
        }
        Ok(report)
    }
}

/// Outcome of a successful copy call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Ids of the workers that completed a batch
    pub workers: BTreeSet<usize>,
    /// Files copied
    pub copied: usize,
}

/// Workers for one `copy_files` call; stopped and joined on drop
struct WorkerPool {
    workers: Vec<WorkerHandle>,
}

impl WorkerPool {
    fn spawn(
        size: usize,
        order: BacklogOrder,
        events: &mpsc::Sender<WorkerEvent>,
    ) -> Result<Self> {
        let mut pool = Self {
            workers: Vec::with_capacity(size),
        };
        for id in 0..size {
            pool.workers.push(Worker::spawn(id, events.clone(), order)?);
        }
        Ok(pool)
    }

    /// Hand one batch to each of the first workers; returns how many were sent
    fn dispatch(&self, batches: Vec<WorkBatch>) -> Result<usize> {
        let mut sent = 0;
        for (worker, batch) in self.workers.iter().zip(batches) {
            worker.send(batch)?;
            sent += 1;
        }
        Ok(sent)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in &self.workers {
            worker.stop();
        }
        for worker in &mut self.workers {
            worker.join();
        }
    }
}

/// Copy files with an engine configured from the environment
///
/// # Errors
///
/// Returns `StoreError::ConfigInvalid` for a bad `WORKERS_LIMIT`, otherwise see
/// [`CopyEngine::copy_files`].
pub fn copy_files(actions: Vec<CopyAction>) -> Result<()> {
    CopyEngine::new(&StoreConfig::from_env()?).copy_files(actions)
}
