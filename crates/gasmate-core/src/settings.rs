//! Per-account settings document.
//!
//! Every field is optional on the wire and falls back to its default, so a
//! partially written document still deserializes.

use serde::{Deserialize, Serialize};

use crate::alert::ChannelKind;
use crate::config::defaults;
use crate::error::Result;
use crate::tier::Thresholds;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountSettings {
    pub notifications: NotificationSettings,
    pub thresholds: Thresholds,
    pub display: DisplaySettings,
}

impl AccountSettings {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub providers: ProviderFlags,
    /// Device registration token for push delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
    pub email: EmailSettings,
    pub whatsapp: WhatsAppSettings,
    pub sound: SoundSettings,
}

impl NotificationSettings {
    pub fn is_enabled(&self, channel: ChannelKind) -> bool {
        match channel {
            ChannelKind::Push => self.providers.firebase,
            ChannelKind::WhatsApp => self.whatsapp.enabled,
            ChannelKind::Email => self.email.enabled,
            ChannelKind::Sound => self.sound.enabled,
        }
    }

    /// Enabled channels in dispatch order.
    pub fn enabled_channels(&self) -> Vec<ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderFlags {
    pub firebase: bool,
    pub smtp: bool,
    pub twilio: bool,
}

impl Default for ProviderFlags {
    fn default() -> Self {
        Self {
            firebase: true,
            smtp: false,
            twilio: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub enabled: bool,
    pub address: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            address: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppSettings {
    pub enabled: bool,
    pub number: String,
}

impl Default for WhatsAppSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            number: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSettings {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub sound_type: String,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_type: defaults::SOUND_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplaySettings {
    pub theme: String,
    pub chart_interval: String,
    pub temperature: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            chart_interval: "1h".to_string(),
            temperature: "celsius".to_string(),
        }
    }
}
