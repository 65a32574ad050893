//! Alert recorder.

use std::sync::Arc;

use gasmate_core::config::defaults;
use gasmate_core::{AlertId, AlertKind, AlertRecord, NotificationOutcome, Reading, Result};
use gasmate_storage::{AlertStore, SettingsStore};

/// Persists alert records and attaches fanout outcomes exactly once.
#[derive(Clone)]
pub struct AlertRecorder {
    alerts: Arc<AlertStore>,
    settings: Arc<SettingsStore>,
}

impl AlertRecorder {
    pub fn new(alerts: Arc<AlertStore>, settings: Arc<SettingsStore>) -> Self {
        Self { alerts, settings }
    }

    /// Write a pending record for `reading`.
    ///
    /// The kind is taken as given. Accounts without a settings document are
    /// refused with `ConfigurationMissing` and nothing is written.
    pub async fn record_alert(
        &self,
        account_id: &str,
        reading: &Reading,
        kind: AlertKind,
    ) -> Result<AlertRecord> {
        if !self.settings.exists(account_id)? {
            return Err(gasmate_core::Error::ConfigurationMissing(account_id.to_string()));
        }

        let record = AlertRecord::new(kind, reading);
        self.alerts.insert(account_id, &record)?;
        tracing::info!(
            account_id,
            alert_id = %record.id,
            kind = %kind,
            gas_level = record.gas_level,
            is_leak = record.is_leak,
            "Alert recorded"
        );
        Ok(record)
    }

    /// Claim a pending record so exactly one fanout sends its notifications.
    pub async fn claim_alert(&self, account_id: &str, alert_id: &AlertId) -> Result<AlertRecord> {
        let stale_after = chrono::Duration::seconds(defaults::FANOUT_CLAIM_STALE_SECS);
        let record = self.alerts.claim(account_id, alert_id, stale_after)?;
        tracing::debug!(account_id, alert_id = %alert_id, "Alert claimed for fanout");
        Ok(record)
    }

    /// Attach the complete outcome list. Fails on an unknown or finalized record.
    pub async fn attach_outcomes(
        &self,
        account_id: &str,
        alert_id: &AlertId,
        outcomes: Vec<NotificationOutcome>,
    ) -> Result<AlertRecord> {
        let record = self.alerts.finalize(account_id, alert_id, outcomes)?;
        tracing::debug!(account_id, alert_id = %alert_id, "Alert finalized");
        Ok(record)
    }

    pub async fn get_alert(&self, account_id: &str, alert_id: &AlertId) -> Result<AlertRecord> {
        self.alerts
            .get(account_id, alert_id)?
            .ok_or_else(|| gasmate_core::Error::NotFound(format!("Alert {}", alert_id)))
    }

    /// Newest first. `limit` defaults to the alert history page size.
    pub async fn list_alerts(&self, account_id: &str, limit: Option<usize>) -> Result<Vec<AlertRecord>> {
        let limit = gasmate_core::config::clamp_limit(limit, defaults::ALERT_HISTORY_LIMIT);
        Ok(self.alerts.list(account_id, limit)?)
    }
}
