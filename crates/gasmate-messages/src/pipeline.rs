//! Alert pipeline.
//!
//! Composes identity verification, settings lookup, recording and fanout.
//! The credential is always verified first, so an unauthorized caller never
//! reaches a store or a transport.
//!
//! Once a record is claimed, its channels are attempted and its outcomes
//! attached on a detached task. Dropping the caller's future does not leave a
//! record pending after its channels have been attempted.

use std::future::Future;
use std::sync::Arc;

use gasmate_core::identity::verify_credential;
use gasmate_core::{
    AccountSettings, AlertKind, AlertNotice, AlertRecord, ChannelKind, Error, IdentityVerifier,
    NotificationOutcome, Reading, Result, VerifiedIdentity,
};
use gasmate_storage::SettingsStore;

use crate::channels::TwilioWhatsAppChannel;
use crate::content::NotificationContent;
use crate::fanout::NotificationFanout;
use crate::recorder::AlertRecorder;

pub struct AlertPipeline {
    verifier: Arc<dyn IdentityVerifier>,
    settings: Arc<SettingsStore>,
    recorder: AlertRecorder,
    fanout: Arc<NotificationFanout>,
    whatsapp: Option<Arc<TwilioWhatsAppChannel>>,
}

/// Owned handles for work that runs on a detached task.
#[derive(Clone)]
struct FanoutJob {
    settings: Arc<SettingsStore>,
    recorder: AlertRecorder,
    fanout: Arc<NotificationFanout>,
}

impl FanoutJob {
    fn required_settings(&self, account_id: &str) -> Result<AccountSettings> {
        self.settings
            .get(account_id)?
            .ok_or_else(|| Error::ConfigurationMissing(account_id.to_string()))
    }

    /// Claim the record, attempt every enabled channel, then finalize.
    async fn deliver(
        &self,
        account_id: &str,
        notice: &AlertNotice,
        settings: &AccountSettings,
    ) -> Result<Vec<NotificationOutcome>> {
        self.recorder.claim_alert(account_id, &notice.alert_id).await?;

        let content = NotificationContent::for_alert(notice);
        let outcomes = self
            .fanout
            .dispatch(account_id, &content, &settings.notifications)
            .await;

        self.recorder
            .attach_outcomes(account_id, &notice.alert_id, outcomes.clone())
            .await?;
        Ok(outcomes)
    }
}

/// Run `task` to completion on its own tokio task and wait for it.
async fn detached<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    tokio::spawn(task)
        .await
        .map_err(|e| Error::Internal(format!("Fanout task failed: {}", e)))?
}

impl AlertPipeline {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        settings: Arc<SettingsStore>,
        recorder: AlertRecorder,
        fanout: NotificationFanout,
    ) -> Self {
        Self {
            verifier,
            settings,
            recorder,
            fanout: Arc::new(fanout),
            whatsapp: None,
        }
    }

    /// Transport used by the unauthenticated standalone WhatsApp relay.
    pub fn with_whatsapp_relay(mut self, channel: Arc<TwilioWhatsAppChannel>) -> Self {
        self.whatsapp = Some(channel);
        self
    }

    pub fn recorder(&self) -> &AlertRecorder {
        &self.recorder
    }

    pub fn fanout_channels(&self) -> &crate::channels::ChannelSet {
        self.fanout.channels()
    }

    fn job(&self) -> FanoutJob {
        FanoutJob {
            settings: self.settings.clone(),
            recorder: self.recorder.clone(),
            fanout: self.fanout.clone(),
        }
    }

    pub async fn authorize(&self, credential: Option<&str>) -> Result<VerifiedIdentity> {
        verify_credential(self.verifier.as_ref(), credential).await
    }

    pub fn settings_for(&self, account_id: &str) -> Result<Option<AccountSettings>> {
        Ok(self.settings.get(account_id)?)
    }

    fn required_settings(&self, account_id: &str) -> Result<AccountSettings> {
        self.settings_for(account_id)?
            .ok_or_else(|| Error::ConfigurationMissing(account_id.to_string()))
    }

    /// Verify the caller, then write a pending alert record.
    pub async fn record_alert(
        &self,
        credential: Option<&str>,
        reading: &Reading,
        kind: AlertKind,
    ) -> Result<AlertRecord> {
        let identity = self.authorize(credential).await?;
        self.recorder
            .record_alert(&identity.account_id, reading, kind)
            .await
    }

    /// Fan the notice out to every enabled channel and finalize its record.
    ///
    /// Verification, settings and the record's state are all checked before
    /// any channel is attempted. Concurrent calls for one alert are refused
    /// with `FanoutInProgress` while the first is running.
    pub async fn fanout(
        &self,
        credential: Option<&str>,
        notice: &AlertNotice,
    ) -> Result<Vec<NotificationOutcome>> {
        let identity = self.authorize(credential).await?;
        let settings = self.required_settings(&identity.account_id)?;
        let job = self.job();
        let notice = notice.clone();

        detached(async move {
            job.deliver(&identity.account_id, &notice, &settings).await
        })
        .await
    }

    /// Record an alert and fan it out in one step. Returns the finalized record.
    pub async fn raise_alert(
        &self,
        credential: Option<&str>,
        reading: &Reading,
        kind: AlertKind,
    ) -> Result<AlertRecord> {
        let identity = self.authorize(credential).await?;
        self.raise_alert_for(&identity, reading, kind).await
    }

    /// [`raise_alert`](Self::raise_alert) for an identity verified earlier.
    pub async fn raise_alert_for(
        &self,
        identity: &VerifiedIdentity,
        reading: &Reading,
        kind: AlertKind,
    ) -> Result<AlertRecord> {
        let job = self.job();
        let account_id = identity.account_id.clone();
        let reading = reading.clone();

        detached(async move {
            let record = job.recorder.record_alert(&account_id, &reading, kind).await?;
            let settings = job.required_settings(&account_id)?;
            job.deliver(&account_id, &record.notice(), &settings).await?;
            job.recorder.get_alert(&account_id, &record.id).await
        })
        .await
    }

    /// Send a test notice through one channel. No alert record is written.
    pub async fn test_channel(
        &self,
        credential: Option<&str>,
        kind: ChannelKind,
    ) -> Result<NotificationOutcome> {
        let identity = self.authorize(credential).await?;
        let settings = self.required_settings(&identity.account_id)?;
        let outcome = self
            .fanout
            .attempt(
                kind,
                &identity.account_id,
                &NotificationContent::test(kind),
                &settings.notifications,
            )
            .await;
        tracing::info!(
            account_id = %identity.account_id,
            channel = %kind,
            status = outcome.status.as_str(),
            "Test notification"
        );
        Ok(outcome)
    }

    /// Standalone WhatsApp relay. Returns the transport message id.
    pub async fn send_whatsapp_text(&self, to: &str, message: &str) -> Result<String> {
        if to.trim().is_empty() {
            return Err(Error::Validation("Recipient number is required".into()));
        }
        let channel = self.whatsapp.as_ref().ok_or_else(|| Error::ChannelDelivery {
            channel: ChannelKind::WhatsApp.to_string(),
            message: "whatsapp channel is not configured on this server".into(),
        })?;
        channel
            .send_text(to, message)
            .await
            .map_err(|e| e.into_delivery(ChannelKind::WhatsApp))
    }
}
