//! Per-account reading monitor.
//!
//! Watches a reading subscription, classifies each reading against the
//! account's thresholds and raises an alert whenever the tier escalates.
//! The monitor is bound to an identity verified when it starts, so it keeps
//! working after the starting credential expires.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gasmate_core::{
    AlertKind, AlertRecord, Reading, ReadingSubscription, Thresholds, Tier, VerifiedIdentity,
};
use tokio::task::JoinHandle;

use crate::pipeline::AlertPipeline;

/// Tracks the last committed tier. Fires only when the tier rises.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscalationTracker {
    current: Tier,
}

impl EscalationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Tier {
        self.current
    }

    /// The alert kind to raise if `tier` is above the committed tier.
    pub fn escalation(&self, tier: Tier) -> Option<AlertKind> {
        if tier > self.current {
            AlertKind::try_from(tier).ok()
        } else {
            None
        }
    }

    pub fn commit(&mut self, tier: Tier) {
        self.current = tier;
    }
}

pub struct AlertMonitor {
    pipeline: Arc<AlertPipeline>,
    identity: VerifiedIdentity,
    account_id: String,
    tracker: EscalationTracker,
}

impl AlertMonitor {
    pub fn new(pipeline: Arc<AlertPipeline>, identity: VerifiedIdentity) -> Self {
        Self {
            pipeline,
            account_id: identity.account_id.clone(),
            identity,
            tracker: EscalationTracker::new(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    fn thresholds(&self) -> Thresholds {
        match self.pipeline.settings_for(&self.account_id) {
            Ok(Some(settings)) => settings.thresholds,
            Ok(None) => Thresholds::default(),
            Err(e) => {
                tracing::warn!(account_id = %self.account_id, error = %e, "Falling back to default thresholds");
                Thresholds::default()
            }
        }
    }

    pub fn current_tier(&self) -> Tier {
        self.tracker.current()
    }

    /// Handle one reading. Returns the raised alert, if any.
    ///
    /// A failed raise leaves the escalation pending, so the next reading at
    /// the same tier tries again.
    pub async fn handle(&mut self, reading: &Reading) -> Option<AlertRecord> {
        let tier = self.thresholds().classify(reading.check_value);
        let Some(kind) = self.tracker.escalation(tier) else {
            self.tracker.commit(tier);
            return None;
        };

        match self
            .pipeline
            .raise_alert_for(&self.identity, reading, kind)
            .await
        {
            Ok(record) => {
                self.tracker.commit(tier);
                Some(record)
            }
            Err(e) => {
                tracing::error!(
                    account_id = %self.account_id,
                    kind = %kind,
                    error = %e,
                    "Failed to raise alert"
                );
                None
            }
        }
    }

    /// Consume readings until the feed closes.
    pub async fn run(mut self, mut subscription: ReadingSubscription) {
        tracing::info!(account_id = %self.account_id, "Reading monitor started");
        while let Some(reading) = subscription.next().await {
            self.handle(&reading).await;
        }
        tracing::info!(account_id = %self.account_id, "Reading monitor stopped");
    }

    pub fn spawn(self, subscription: ReadingSubscription) -> MonitorHandle {
        let account_id = self.account_id.clone();
        let task = tokio::spawn(self.run(subscription));
        MonitorHandle {
            account_id,
            started_at: Utc::now(),
            task,
        }
    }
}

/// Running monitor task. Dropping the handle cancels the task.
pub struct MonitorHandle {
    account_id: String,
    started_at: DateTime<Utc>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
