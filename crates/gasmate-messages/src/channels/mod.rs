//! Notification channels.

pub mod memory;
pub mod push;
pub mod sound;
pub mod whatsapp;

#[cfg(feature = "email")]
pub mod email;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use gasmate_core::{ChannelKind, NotificationSettings};
use serde::Serialize;

use crate::content::NotificationContent;
use crate::Result;

pub use memory::{Delivery, MemoryChannel};
pub use push::{FcmConfig, FcmPushChannel};
pub use sound::{SoundChannel, SoundCue};
pub use whatsapp::{TwilioConfig, TwilioWhatsAppChannel};

#[cfg(feature = "email")]
pub use email::{SmtpConfig, SmtpEmailChannel};

/// A server-side transport for one channel kind.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    /// Short transport name for logs, e.g. `twilio`.
    fn transport(&self) -> &str;

    /// Deliver `content` to the account, using the recipient details in `settings`.
    async fn deliver(
        &self,
        account_id: &str,
        content: &NotificationContent,
        settings: &NotificationSettings,
    ) -> Result<()>;
}

/// Transports configured on this server, at most one per channel kind.
#[derive(Clone, Default)]
pub struct ChannelSet {
    channels: BTreeMap<ChannelKind, Arc<dyn NotificationChannel>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelInfo {
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transport, replacing any earlier one of the same kind.
    pub fn with(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.register(channel);
        self
    }

    pub fn register(&mut self, channel: Arc<dyn NotificationChannel>) {
        let kind = channel.kind();
        if self.channels.insert(kind, channel).is_some() {
            tracing::debug!(channel = %kind, "Replaced channel transport");
        }
    }

    pub fn get(&self, kind: ChannelKind) -> Option<Arc<dyn NotificationChannel>> {
        self.channels.get(&kind).cloned()
    }

    pub fn is_configured(&self, kind: ChannelKind) -> bool {
        self.channels.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// One entry per channel kind, configured or not.
    pub fn info(&self) -> Vec<ChannelInfo> {
        ChannelKind::ALL
            .into_iter()
            .map(|kind| ChannelInfo {
                kind,
                configured: self.is_configured(kind),
                transport: self.channels.get(&kind).map(|c| c.transport().to_string()),
            })
            .collect()
    }
}
