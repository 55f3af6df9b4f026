//! Permission grant correlation.
//!
//! Each permission request gets its own id. The platform side completes a
//! request by id with a granted/denied flag; only the waiter holding that
//! request's `PendingGrant` observes it. Several requests can be in flight.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grant-{}", self.0)
    }
}

type PendingMap = Mutex<HashMap<RequestId, Sender<bool>>>;

fn remove_pending(pending: &PendingMap, id: RequestId) -> Option<Sender<bool>> {
    pending
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&id)
}

/// Registry of outstanding grant requests.
///
/// An entry lives until its request is completed, cancelled, or its
/// `PendingGrant` is dropped.
#[derive(Default)]
pub struct GrantRegistry {
    next_id: AtomicU64,
    pending: Arc<PendingMap>,
}

impl GrantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a request. Hand the id to the platform and wait on the grant.
    pub fn register(&self) -> (RequestId, PendingGrant) {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let (tx, rx) = mpsc::channel();
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);
        tracing::debug!(%id, "grant requested");
        let grant = PendingGrant {
            id,
            rx,
            registry: Arc::downgrade(&self.pending),
        };
        (id, grant)
    }

    /// Delivers the outcome for `id`. False when the id is unknown, already
    /// completed, or its waiter has gone away.
    pub fn complete(&self, id: RequestId, granted: bool) -> bool {
        let sender = remove_pending(&self.pending, id);
        let delivered = sender.is_some_and(|tx| tx.send(granted).is_ok());
        tracing::debug!(%id, granted, delivered, "grant completed");
        delivered
    }

    /// Withdraws `id` without an outcome; its waiter sees `None`. False when
    /// the id is unknown or already finished.
    pub fn cancel(&self, id: RequestId) -> bool {
        let cancelled = remove_pending(&self.pending, id).is_some();
        tracing::debug!(%id, cancelled, "grant cancelled");
        cancelled
    }

    /// Requests registered but not yet completed.
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Waiter side of one request. Dropping it withdraws the request.
#[derive(Debug)]
pub struct PendingGrant {
    id: RequestId,
    rx: Receiver<bool>,
    registry: Weak<PendingMap>,
}

impl PendingGrant {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Blocks until the request is completed. `None` if it was cancelled or
    /// the registry was dropped first.
    pub fn wait(self) -> Option<bool> {
        self.rx.recv().ok()
    }

    /// `None` on timeout, cancellation, or when the registry was dropped.
    /// The request stays registered after a timeout; drop the grant to give up.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<bool> {
        match self.rx.recv_timeout(timeout) {
            Ok(granted) => Some(granted),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for PendingGrant {
    fn drop(&mut self) {
        if let Some(pending) = self.registry.upgrade() {
            remove_pending(&pending, self.id);
        }
    }
}
