//! Background snapshot writer.
//!
//! Mutating store operations serialize their persisted subset and hand the
//! bytes here; the caller returns as soon as the snapshot is enqueued. A
//! dedicated worker thread drains the queue, keeps only the newest snapshot
//! per store name (every snapshot is a full replacement, so intermediate
//! ones are dead weight), and writes through the [`BackingStore`]. Write
//! failures never reach the mutating caller: they are logged and parked in
//! a diagnostic slot readable via [`SnapshotWriter::last_error`].

use crate::backing::BackingStore;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

enum Job {
    Write { store: String, payload: Vec<u8> },
    Flush(Sender<()>),
}

/// Handle to the snapshot worker thread.
///
/// Dropping the writer drains the queue and joins the worker, so snapshots
/// enqueued before shutdown still hit the backing store.
pub struct SnapshotWriter {
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl SnapshotWriter {
    /// Spawn the worker thread over the given backing store.
    pub fn spawn(backing: Arc<dyn BackingStore>) -> Self {
        let (sender, receiver) = unbounded();
        let last_error = Arc::new(Mutex::new(None));
        let worker_error = Arc::clone(&last_error);

        let worker = thread::spawn(move || run_worker(receiver, backing, worker_error));

        Self {
            sender: Some(sender),
            worker: Some(worker),
            last_error,
        }
    }

    /// Enqueue a snapshot for a store. Returns immediately.
    pub fn submit(&self, store: &str, payload: Vec<u8>) {
        if let Some(sender) = &self.sender {
            let job = Job::Write {
                store: store.to_string(),
                payload,
            };
            if sender.send(job).is_err() {
                // Worker is gone; remember that the snapshot was dropped.
                *self.last_error.lock() = Some("snapshot worker unavailable".to_string());
            }
        }
    }

    /// Block until every snapshot enqueued so far has been written.
    ///
    /// The completion guarantee for shutdown hooks; regular mutations never
    /// call this.
    pub fn flush(&self) {
        if let Some(sender) = &self.sender {
            let (ack_tx, ack_rx) = bounded(1);
            if sender.send(Job::Flush(ack_tx)).is_ok() {
                let _ = ack_rx.recv();
            }
        }
    }

    /// The most recent persistence failure this session, if any.
    ///
    /// Sticky: a later successful write does not clear it, since the failed
    /// snapshot may still have been lost.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain remaining jobs and exit.
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(
    receiver: Receiver<Job>,
    backing: Arc<dyn BackingStore>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    while let Ok(first) = receiver.recv() {
        let mut pending: HashMap<String, Vec<u8>> = HashMap::new();
        let mut flush_acks = Vec::new();

        let absorb = |job: Job, acks: &mut Vec<Sender<()>>, pending: &mut HashMap<_, _>| {
            match job {
                Job::Write { store, payload } => {
                    // Last snapshot per store wins; earlier ones in the
                    // burst were already superseded in memory.
                    pending.insert(store, payload);
                }
                Job::Flush(ack) => acks.push(ack),
            }
        };

        absorb(first, &mut flush_acks, &mut pending);
        while let Ok(job) = receiver.try_recv() {
            absorb(job, &mut flush_acks, &mut pending);
        }

        for (store, payload) in pending {
            match backing.save(&store, &payload) {
                Ok(()) => {
                    tracing::debug!(store = %store, bytes = payload.len(), "snapshot written");
                }
                Err(e) => {
                    tracing::warn!(store = %store, error = %e, "snapshot write failed");
                    *last_error.lock() = Some(e.to_string());
                }
            }
        }

        for ack in flush_acks {
            let _ = ack.send(());
        }
    }
}
