//! Gateway control-path serialization.
//!
//! The registry and the stores are each internally consistent, but ordering
//! guarantees span two steps: apply a mutation, then enqueue the resulting
//! event into recipients' channels. If the enqueue happens outside the
//! mutation's critical section, two concurrent relays can apply A then B yet
//! deliver B before A. Every relaying usecase therefore holds this lock
//! across both steps; enqueueing into unbounded senders is cheap, so the
//! lock is never held across slow I/O.

use tokio::sync::{Mutex, MutexGuard};

/// Serializes the gateway's mutate-then-enqueue sequences.
///
/// One instance is shared by all relaying usecases so that, within a room,
/// recipients observe playback updates in server arrival order and chat
/// messages in persistence order.
pub struct RelayLock {
    inner: Mutex<()>,
}

impl RelayLock {
    /// Create a new lock.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(()),
        }
    }

    /// Enter the serialized section. Held until the guard drops.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}

impl Default for RelayLock {
    fn default() -> Self {
        Self::new()
    }
}
