//! Sound cues for connected dashboards.
//!
//! Each account has its own broadcast channel. A delivery only succeeds when
//! at least one dashboard session for that account is listening.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use gasmate_core::{AlertId, AlertKind, ChannelKind, NotificationSettings};
use serde::Serialize;
use tokio::sync::broadcast;

use super::NotificationChannel;
use crate::content::NotificationContent;
use crate::{Error, Result};

const CUE_CHANNEL_CAPACITY: usize = 32;

/// Instruction for a dashboard to play an alert sound.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundCue {
    pub account_id: String,
    pub alert_id: Option<AlertId>,
    pub kind: Option<AlertKind>,
    pub sound_type: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct SoundChannel {
    senders: Arc<DashMap<String, broadcast::Sender<SoundCue>>>,
}

impl SoundChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for the account's cues.
    pub fn subscribe(&self, account_id: &str) -> broadcast::Receiver<SoundCue> {
        self.senders.retain(|_, tx| tx.receiver_count() > 0);
        self.senders
            .entry(account_id.to_string())
            .or_insert_with(|| broadcast::channel(CUE_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    pub fn listener_count(&self, account_id: &str) -> usize {
        let count = self
            .senders
            .get(account_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0);
        if count == 0 {
            self.release(account_id);
        }
        count
    }

    /// Accounts that currently hold a cue sender.
    pub fn account_count(&self) -> usize {
        self.senders.len()
    }

    /// Drop the account's sender once its last listener is gone.
    fn release(&self, account_id: &str) {
        self.senders
            .remove_if(account_id, |_, tx| tx.receiver_count() == 0);
    }

    fn emit(&self, cue: SoundCue) -> Result<usize> {
        let account_id = cue.account_id.clone();
        let sent = self.senders.get(&account_id).map(|tx| tx.send(cue));
        match sent {
            Some(Ok(listeners)) => Ok(listeners),
            _ => {
                self.release(&account_id);
                Err(Error::Transport(
                    "No dashboard session is listening for sound alerts".to_string(),
                ))
            }
        }
    }
}

#[async_trait]
impl NotificationChannel for SoundChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sound
    }

    fn transport(&self) -> &str {
        "dashboard"
    }

    async fn deliver(
        &self,
        account_id: &str,
        content: &NotificationContent,
        settings: &NotificationSettings,
    ) -> Result<()> {
        let cue = SoundCue {
            account_id: account_id.to_string(),
            alert_id: content.alert_id.clone(),
            kind: content.kind,
            sound_type: settings.sound.sound_type.clone(),
            timestamp: Utc::now(),
        };
        let listeners = self.emit(cue)?;
        tracing::debug!(account_id, listeners, "Sound cue emitted");
        Ok(())
    }
}
