//! Notification fanout.
//!
//! Every enabled channel is attempted concurrently and yields exactly one
//! outcome. Delivery errors and panics are folded into `failed` outcomes.

use std::sync::Arc;

use futures::future::join_all;
use gasmate_core::{ChannelKind, NotificationOutcome, NotificationSettings};

use crate::channels::ChannelSet;
use crate::content::NotificationContent;

pub struct NotificationFanout {
    channels: ChannelSet,
}

impl NotificationFanout {
    pub fn new(channels: ChannelSet) -> Self {
        Self { channels }
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Attempt every enabled channel and collect outcomes in channel order.
    pub async fn dispatch(
        &self,
        account_id: &str,
        content: &NotificationContent,
        settings: &NotificationSettings,
    ) -> Vec<NotificationOutcome> {
        let content = Arc::new(content.clone());
        let settings = Arc::new(settings.clone());

        let attempts = settings.enabled_channels().into_iter().map(|kind| {
            let content = content.clone();
            let settings = settings.clone();
            self.attempt_isolated(kind, account_id, content, settings)
        });

        let outcomes = join_all(attempts).await;
        let failed = outcomes.iter().filter(|o| !o.is_sent()).count();
        tracing::info!(
            account_id,
            attempted = outcomes.len(),
            failed,
            "Notification fanout complete"
        );
        outcomes
    }

    /// Attempt a single channel, regardless of whether settings enable it.
    pub async fn attempt(
        &self,
        kind: ChannelKind,
        account_id: &str,
        content: &NotificationContent,
        settings: &NotificationSettings,
    ) -> NotificationOutcome {
        self.attempt_isolated(
            kind,
            account_id,
            Arc::new(content.clone()),
            Arc::new(settings.clone()),
        )
        .await
    }

    async fn attempt_isolated(
        &self,
        kind: ChannelKind,
        account_id: &str,
        content: Arc<NotificationContent>,
        settings: Arc<NotificationSettings>,
    ) -> NotificationOutcome {
        let Some(channel) = self.channels.get(kind) else {
            tracing::warn!(channel = %kind, account_id, "Channel enabled but not configured");
            return NotificationOutcome::failed(
                kind,
                format!("{} channel is not configured on this server", kind),
            );
        };

        let account = account_id.to_string();
        let task = tokio::spawn(async move { channel.deliver(&account, &content, &settings).await });

        match task.await {
            Ok(Ok(())) => {
                tracing::debug!(channel = %kind, account_id, "Notification sent");
                NotificationOutcome::sent(kind)
            }
            Ok(Err(e)) => {
                tracing::warn!(channel = %kind, account_id, error = %e, "Notification failed");
                NotificationOutcome::failed(kind, e.to_string())
            }
            Err(e) => {
                tracing::error!(channel = %kind, account_id, error = %e, "Notification task aborted");
                NotificationOutcome::failed(kind, format!("Delivery task aborted: {}", e))
            }
        }
    }
}
