// Bounded Channel - fixed-capacity FIFO handoff between roles
//
// Monitor layout: one mutex over the item sequence plus two wait-queues,
// "not full" for blocked senders and "not empty" for blocked receivers.
// No critical section spans an `.await`, so a cancelled waiter can never
// leave a half-inserted or half-removed item behind.

use crate::application::cancel::CancelToken;
use crate::domain::{ChannelState, ChannelStats};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::Notify;
use tracing::debug;

/// Channel errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Channel capacity must be at least 1 (rendezvous channels are not supported)")]
    ZeroCapacity,

    #[error("Interrupted while waiting to {0}")]
    Interrupted(Operation),
}

/// Blocking operation that was interrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Send,
    Receive,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Send => write!(f, "send"),
            Operation::Receive => write!(f, "receive"),
        }
    }
}

struct Inner<T> {
    items: VecDeque<T>,
    stats: ChannelStats,
}

/// Fixed-capacity FIFO channel with blocking send/receive
///
/// Shared between roles through `Arc`; any number of senders and receivers may use it.
pub struct BoundedChannel<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,
    not_full: Notify,
    not_empty: Notify,
}

/// Reject capacities that cannot hold a single item
pub fn check_capacity(capacity: usize) -> Result<(), ChannelError> {
    if capacity == 0 {
        return Err(ChannelError::ZeroCapacity);
    }
    Ok(())
}

impl<T> BoundedChannel<T> {
    /// Create a channel holding at most `capacity` items
    ///
    /// # Errors
    /// - ChannelError::ZeroCapacity if `capacity == 0`
    pub fn new(capacity: usize) -> Result<Self, ChannelError> {
        check_capacity(capacity)?;
        Ok(Self {
            capacity,
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                stats: ChannelStats {
                    capacity,
                    ..ChannelStats::default()
                },
            }),
            not_full: Notify::new(),
            not_empty: Notify::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self) -> ChannelState {
        ChannelState::classify(self.len(), self.capacity)
    }

    pub fn stats(&self) -> ChannelStats {
        self.lock().stats.clone()
    }

    /// Send an item, waiting while the channel is FULL
    ///
    /// Wakes one waiting receiver once the item is stored.
    ///
    /// # Errors
    /// - ChannelError::Interrupted if `cancel` fires while waiting; the item is not stored
    pub async fn send(&self, item: T, cancel: &CancelToken) -> Result<(), ChannelError> {
        let mut item = item;
        let mut waited = false;
        loop {
            // Register interest before checking, so a receive between the check and
            // the wait still wakes us.
            let notified = self.not_full.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match self.push(item, &mut waited) {
                Ok(len) => {
                    debug!(len, capacity = self.capacity, "Item stored");
                    self.not_empty.notify_one();
                    return Ok(());
                }
                Err(rejected) => item = rejected,
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ChannelError::Interrupted(Operation::Send)),
                _ = &mut notified => {}
            }
        }
    }

    /// Receive the oldest item, waiting while the channel is EMPTY
    ///
    /// Wakes one waiting sender once the item is removed.
    ///
    /// # Errors
    /// - ChannelError::Interrupted if `cancel` fires while waiting; nothing is removed
    pub async fn receive(&self, cancel: &CancelToken) -> Result<T, ChannelError> {
        let mut waited = false;
        loop {
            let notified = self.not_empty.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some((item, len)) = self.pop(&mut waited) {
                debug!(len, capacity = self.capacity, "Item removed");
                self.not_full.notify_one();
                return Ok(item);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ChannelError::Interrupted(Operation::Receive)),
                _ = &mut notified => {}
            }
        }
    }

    /// Store an item only if there is room; hands it back otherwise
    pub fn try_send(&self, item: T) -> Result<(), T> {
        let mut waited = true; // never counted as a wait
        self.push(item, &mut waited)?;
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the oldest item if there is one
    pub fn try_receive(&self) -> Option<T> {
        let mut waited = true;
        let (item, _) = self.pop(&mut waited)?;
        self.not_full.notify_one();
        Some(item)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // Nothing panics while the lock is held
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append under the lock; returns the new length, or the item when FULL
    fn push(&self, item: T, waited: &mut bool) -> Result<usize, T> {
        let mut inner = self.lock();
        if inner.items.len() >= self.capacity {
            if !*waited {
                *waited = true;
                inner.stats.send_waits += 1;
            }
            return Err(item);
        }
        inner.items.push_back(item);
        let len = inner.items.len();
        inner.stats.sent += 1;
        inner.stats.high_water = inner.stats.high_water.max(len);
        if len == self.capacity {
            inner.stats.observed_full = true;
        }
        Ok(len)
    }

    /// Remove under the lock; returns the item and the new length, or None when EMPTY
    fn pop(&self, waited: &mut bool) -> Option<(T, usize)> {
        let mut inner = self.lock();
        match inner.items.pop_front() {
            Some(item) => {
                let len = inner.items.len();
                inner.stats.received += 1;
                Some((item, len))
            }
            None => {
                inner.stats.observed_empty = true;
                if !*waited {
                    *waited = true;
                    inner.stats.receive_waits += 1;
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod channel_test;
