//! Reading feed.
//!
//! Caches the latest reading and broadcasts every published reading to all
//! live subscriptions. A new subscription first yields the cached reading.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::reading::Reading;

/// Default broadcast buffer size.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Latest-value cache plus broadcast of live readings.
#[derive(Clone)]
pub struct ReadingFeed {
    tx: broadcast::Sender<Reading>,
    latest: Arc<RwLock<Option<Reading>>>,
}

impl ReadingFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Store the reading as latest and broadcast it.
    ///
    /// Returns the number of subscriptions that received it.
    pub fn publish(&self, reading: Reading) -> usize {
        *self.latest.write() = Some(reading);
        let delivered = self.tx.send(reading).unwrap_or(0);
        tracing::trace!(
            check_value = reading.check_value,
            is_leak = reading.is_leak,
            subscribers = delivered,
            "Reading published"
        );
        delivered
    }

    pub fn latest(&self) -> Option<Reading> {
        *self.latest.read()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn subscribe(&self) -> ReadingSubscription {
        let rx = self.tx.subscribe();
        ReadingSubscription {
            rx,
            pending: self.latest(),
        }
    }

    /// Republish the latest reading with the leak flag set, closing the supply.
    pub fn close_supply(&self) -> Reading {
        self.republish(true)
    }

    /// Republish the latest reading with the leak flag cleared, opening the supply.
    pub fn open_supply(&self) -> Reading {
        self.republish(false)
    }

    fn republish(&self, is_leak: bool) -> Reading {
        let reading = match self.latest() {
            Some(latest) => latest.with_leak(is_leak),
            None => Reading::new(0.0, is_leak),
        };
        self.publish(reading);
        reading
    }
}

impl Default for ReadingFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellable handle over the live reading sequence.
///
/// Dropping the handle releases it; [`ReadingSubscription::unsubscribe`] does
/// the same explicitly.
pub struct ReadingSubscription {
    rx: broadcast::Receiver<Reading>,
    pending: Option<Reading>,
}

impl ReadingSubscription {
    /// Next reading. `None` once the feed is gone.
    pub async fn next(&mut self) -> Option<Reading> {
        if let Some(reading) = self.pending.take() {
            return Some(reading);
        }
        loop {
            match self.rx.recv().await {
                Ok(reading) => return Some(reading),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Reading subscription lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next reading if one is already buffered.
    pub fn try_next(&mut self) -> Option<Reading> {
        if let Some(reading) = self.pending.take() {
            return Some(reading);
        }
        loop {
            match self.rx.try_recv() {
                Ok(reading) => return Some(reading),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}
