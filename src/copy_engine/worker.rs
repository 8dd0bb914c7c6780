//! Copy worker thread
//!
//! Each worker owns a [`WorkerState`]: an idle/active flag plus a backlog of batches
//! that arrived while it was busy. A batch's copies are all issued at once on short-lived
//! copier threads (at most `MAX_IN_FLIGHT` per worker) and counted down as they report
//! back. While waiting the worker polls its inbox, so a batch sent to a busy worker lands
//! on the backlog instead of being started.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::{CopyAction, WorkBatch};
use crate::config::BacklogOrder;
use crate::error::{Result, StoreError, copy};

/// Copies one worker keeps in flight at once
const MAX_IN_FLIGHT: usize = 16;

/// How often a worker waiting on copies checks its inbox
const INBOX_POLL_INTERVAL: Duration = Duration::from_millis(20);

pub(crate) enum WorkerCommand {
    Run(WorkBatch),
    Stop,
}

#[derive(Debug)]
pub(crate) enum WorkerEvent {
    Completed { worker: usize, copied: usize },
    Failed { worker: usize, error: StoreError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerStatus {
    Idle,
    Active,
}

#[derive(Debug)]
pub(crate) struct WorkerState {
    status: WorkerStatus,
    backlog: VecDeque<WorkBatch>,
    order: BacklogOrder,
}

impl WorkerState {
    pub(crate) fn new(order: BacklogOrder) -> Self {
        Self {
            status: WorkerStatus::Idle,
            backlog: VecDeque::new(),
            order,
        }
    }

    /// Take a batch; returns it back if the worker was idle and should start it now
    pub(crate) fn accept(&mut self, batch: WorkBatch) -> Option<WorkBatch> {
        match self.status {
            WorkerStatus::Idle => {
                self.status = WorkerStatus::Active;
                Some(batch)
            }
            WorkerStatus::Active => {
                self.backlog.push_back(batch);
                None
            }
        }
    }

    /// The active batch is done: hand out the next backlog entry or go idle
    pub(crate) fn finish(&mut self) -> Option<WorkBatch> {
        let next = match self.order {
            BacklogOrder::Fifo => self.backlog.pop_front(),
            BacklogOrder::Lifo => self.backlog.pop_back(),
        };
        if next.is_none() {
            self.status = WorkerStatus::Idle;
        }
        next
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> WorkerStatus {
        self.status
    }

    #[cfg(test)]
    pub(crate) fn backlog_len(&self) -> usize {
        self.backlog.len()
    }
}

enum BatchOutcome {
    Done(usize),
    Failed(StoreError),
    Stopped,
}

pub(crate) struct Worker {
    id: usize,
    commands: Receiver<WorkerCommand>,
    events: Sender<WorkerEvent>,
    state: WorkerState,
}

/// Controller side of a running worker
pub(crate) struct WorkerHandle {
    id: usize,
    commands: Sender<WorkerCommand>,
    thread: Option<JoinHandle<()>>,
}

/// Reports a panicking worker so the controller never waits on a dead thread
struct PanicGuard<'a> {
    id: usize,
    events: &'a Sender<WorkerEvent>,
}

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let _ = self.events.send(WorkerEvent::Failed {
                worker: self.id,
                error: copy::worker_failed(format!("copy worker {} panicked", self.id)),
            });
        }
    }
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        commands: Receiver<WorkerCommand>,
        events: Sender<WorkerEvent>,
        order: BacklogOrder,
    ) -> Self {
        Self {
            id,
            commands,
            events,
            state: WorkerState::new(order),
        }
    }

    /// Spawn a named worker thread
    pub(crate) fn spawn(
        id: usize,
        events: Sender<WorkerEvent>,
        order: BacklogOrder,
    ) -> Result<WorkerHandle> {
        let (tx, rx) = mpsc::channel();
        let worker = Worker::new(id, rx, events, order);
        let thread = std::thread::Builder::new()
            .name(format!("copy-worker-{id}"))
            .spawn(move || worker.run())
            .map_err(|e| copy::worker_failed(format!("failed to spawn worker {id}: {e}")))?;

        Ok(WorkerHandle {
            id,
            commands: tx,
            thread: Some(thread),
        })
    }

    /// Serve commands until stopped, the controller hangs up, or a copy fails
    pub(crate) fn run(mut self) {
        let events = self.events.clone();
        let _guard = PanicGuard {
            id: self.id,
            events: &events,
        };

        while let Ok(command) = self.commands.recv() {
            let WorkerCommand::Run(batch) = command else {
                break;
            };
            let mut next = self.state.accept(batch);
            while let Some(batch) = next {
                match self.run_batch(batch) {
                    BatchOutcome::Done(copied) => {
                        tracing::debug!(worker = self.id, copied, "copy batch finished");
                        let _ = self.events.send(WorkerEvent::Completed {
                            worker: self.id,
                            copied,
                        });
                        next = self.state.finish();
                    }
                    BatchOutcome::Failed(error) => {
                        let _ = self.events.send(WorkerEvent::Failed {
                            worker: self.id,
                            error,
                        });
                        return;
                    }
                    BatchOutcome::Stopped => return,
                }
            }
        }
    }

    /// Issue every copy of `batch` at once and count them down
    ///
    /// The inbox is polled while copies are in flight. The first failure or a stop
    /// returns immediately; copier threads still running finish their current file and
    /// take nothing further.
    fn run_batch(&mut self, batch: WorkBatch) -> BatchOutcome {
        let total = batch.len();
        if self.poll_inbox() {
            return BatchOutcome::Stopped;
        }
        if total == 0 {
            return BatchOutcome::Done(0);
        }

        let shared = Arc::new(InFlight {
            queue: Mutex::new(batch.into()),
            cancelled: AtomicBool::new(false),
        });
        let (done_tx, done_rx) = mpsc::channel();
        let mut spawned = 0;
        for n in 0..total.min(MAX_IN_FLIGHT) {
            let shared = Arc::clone(&shared);
            let done = done_tx.clone();
            let copier = std::thread::Builder::new()
                .name(format!("copy-worker-{}-{n}", self.id))
                .spawn(move || shared.drain(&done));
            match copier {
                Ok(_) => spawned += 1,
                Err(e) => {
                    tracing::debug!(worker = self.id, error = %e, "copier thread not started");
                    break;
                }
            }
        }
        drop(done_tx);
        if spawned == 0 {
            return BatchOutcome::Failed(copy::worker_failed(format!(
                "copy worker {} could not start any copier",
                self.id
            )));
        }

        let mut remaining = total;
        while remaining > 0 {
            match done_rx.recv_timeout(INBOX_POLL_INTERVAL) {
                Ok(Ok(())) => remaining -= 1,
                Ok(Err(error)) => {
                    shared.cancel();
                    return BatchOutcome::Failed(error);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return BatchOutcome::Failed(copy::worker_failed(format!(
                        "copy worker {} lost {remaining} copies",
                        self.id
                    )));
                }
            }
            if self.poll_inbox() {
                shared.cancel();
                return BatchOutcome::Stopped;
            }
        }

        BatchOutcome::Done(total)
    }

    /// Move newly arrived batches onto the backlog; true if asked to stop
    fn poll_inbox(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(WorkerCommand::Run(batch)) => {
                    let started = self.state.accept(batch);
                    debug_assert!(started.is_none());
                }
                Ok(WorkerCommand::Stop) => return true,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return false,
            }
        }
    }
}

impl WorkerHandle {
    #[cfg(test)]
    pub(crate) fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn send(&self, batch: WorkBatch) -> Result<()> {
        self.commands
            .send(WorkerCommand::Run(batch))
            .map_err(|_| copy::worker_failed(format!("copy worker {} is gone", self.id)))
    }

    pub(crate) fn stop(&self) {
        let _ = self.commands.send(WorkerCommand::Stop);
    }

    pub(crate) fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Copies of one batch, shared by its copier threads
struct InFlight {
    queue: Mutex<VecDeque<CopyAction>>,
    cancelled: AtomicBool,
}

impl InFlight {
    fn next(&self) -> Option<CopyAction> {
        if self.cancelled.load(Ordering::Acquire) {
            return None;
        }
        self.queue.lock().ok()?.pop_front()
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Copy until the queue is empty or the batch is cancelled, reporting every copy
    fn drain(&self, done: &Sender<Result<()>>) {
        while let Some(action) = self.next() {
            if done.send(copy_one(&action)).is_err() {
                return;
            }
        }
    }
}

fn copy_one(action: &CopyAction) -> Result<()> {
    std::fs::copy(&action.src, &action.dest)
        .map(|_| ())
        .map_err(|e| copy::from_io(&action.src, &action.dest, &e))
}
