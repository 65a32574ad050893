//! Memory notification channel (for testing).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gasmate_core::{ChannelKind, NotificationSettings};
use tokio::sync::Mutex;

use super::NotificationChannel;
use crate::content::NotificationContent;
use crate::{Error, Result};

/// One recorded delivery.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub account_id: String,
    pub content: NotificationContent,
}

/// In-memory channel that records deliveries, or rejects them all.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    kind: ChannelKind,
    failure: Option<String>,
    delay: Option<Duration>,
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl MemoryChannel {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            failure: None,
            delay: None,
            deliveries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reject every delivery with `message` as the transport error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Wait `delay` before each delivery is recorded.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().await.clone()
    }

    /// Number of delivery attempts, failed ones included.
    pub async fn count(&self) -> usize {
        self.deliveries.lock().await.len()
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    fn transport(&self) -> &str {
        "memory"
    }

    async fn deliver(
        &self,
        account_id: &str,
        content: &NotificationContent,
        _settings: &NotificationSettings,
    ) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.deliveries.lock().await.push(Delivery {
            account_id: account_id.to_string(),
            content: content.clone(),
        });
        match &self.failure {
            Some(message) => Err(Error::Transport(message.clone())),
            None => Ok(()),
        }
    }
}
