//! Push channel over the Firebase Cloud Messaging HTTP v1 API.

use std::time::Duration;

use async_trait::async_trait;
use gasmate_core::config::{defaults, endpoints};
use gasmate_core::{ChannelKind, NotificationSettings};
use serde::Deserialize;
use serde_json::json;

use super::NotificationChannel;
use crate::content::{NotificationContent, PushContent};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct FcmConfig {
    pub project_id: String,
    /// OAuth2 bearer token for the FCM API.
    pub access_token: String,
    pub api_base: String,
}

impl FcmConfig {
    pub fn new(project_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            access_token: access_token.into(),
            api_base: endpoints::FCM_API.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct FcmErrorBody {
    error: FcmErrorDetail,
}

#[derive(Debug, Deserialize)]
struct FcmErrorDetail {
    message: String,
}

#[derive(Debug, Clone)]
pub struct FcmPushChannel {
    config: FcmConfig,
    client: reqwest::Client,
}

impl FcmPushChannel {
    pub fn new(config: FcmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::InvalidConfiguration(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.config.api_base.trim_end_matches('/'),
            self.config.project_id
        )
    }

    pub async fn send_to_token(&self, token: &str, push: &PushContent) -> Result<()> {
        let payload = json!({
            "message": {
                "token": token,
                "notification": {
                    "title": push.title,
                    "body": push.body,
                },
                "data": push.data,
            }
        });

        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(&self.config.access_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<FcmErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("FCM returned status {}", status));
            return Err(Error::Transport(message));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for FcmPushChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Push
    }

    fn transport(&self) -> &str {
        "fcm"
    }

    async fn deliver(
        &self,
        _account_id: &str,
        content: &NotificationContent,
        settings: &NotificationSettings,
    ) -> Result<()> {
        let token = settings
            .fcm_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::MissingRecipient("No push device token registered".to_string())
            })?;
        self.send_to_token(token, &content.push).await
    }
}
