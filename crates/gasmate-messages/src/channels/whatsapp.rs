//! WhatsApp channel over the Twilio Messages API.

use std::time::Duration;

use async_trait::async_trait;
use gasmate_core::config::{defaults, endpoints};
use gasmate_core::{ChannelKind, NotificationSettings};
use serde::Deserialize;

use super::NotificationChannel;
use crate::content::NotificationContent;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number, with or without the `whatsapp:` prefix.
    pub from_number: String,
    pub api_base: String,
}

impl TwilioConfig {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            api_base: endpoints::TWILIO_API.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    message: String,
}

/// Prefix a phone number with `whatsapp:` unless it already has it.
pub fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{}", number)
    }
}

#[derive(Debug, Clone)]
pub struct TwilioWhatsAppChannel {
    config: TwilioConfig,
    client: reqwest::Client,
}

impl TwilioWhatsAppChannel {
    pub fn new(config: TwilioConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::InvalidConfiguration(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }

    /// Send a text message and return the Twilio message sid.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<String> {
        let to = whatsapp_address(to);
        let from = whatsapp_address(&self.config.from_number);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("From", from.as_str()), ("To", to.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioError>(&text)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("Twilio returned status {}", status));
            tracing::debug!(status = %status, to = %to, "Twilio rejected message");
            return Err(Error::Transport(message));
        }

        let message: TwilioMessage = response
            .json()
            .await
            .map_err(|e| Error::SendFailed(format!("Unreadable Twilio response: {}", e)))?;
        tracing::debug!(sid = %message.sid, "WhatsApp message accepted");
        Ok(message.sid)
    }
}

#[async_trait]
impl NotificationChannel for TwilioWhatsAppChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::WhatsApp
    }

    fn transport(&self) -> &str {
        "twilio"
    }

    async fn deliver(
        &self,
        _account_id: &str,
        content: &NotificationContent,
        settings: &NotificationSettings,
    ) -> Result<()> {
        let number = settings.whatsapp.number.trim();
        if number.is_empty() {
            return Err(Error::MissingRecipient(
                "No WhatsApp number configured".to_string(),
            ));
        }
        self.send_text(number, &content.text).await.map(|_| ())
    }
}
