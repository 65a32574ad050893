//! Alert records and notification outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::reading::Reading;
use crate::tier::Tier;

/// Unique alert identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(pub Uuid);

impl AlertId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> std::result::Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The tiers that produce alert records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Critical,
    Danger,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Danger => "danger",
        }
    }

    /// Upper-case label used in message bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Danger => "DANGER",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Self::Critical => Tier::Critical,
            Self::Danger => Tier::Danger,
        }
    }
}

impl TryFrom<Tier> for AlertKind {
    type Error = Error;

    fn try_from(tier: Tier) -> Result<Self> {
        match tier {
            Tier::Critical => Ok(Self::Critical),
            Tier::Danger => Ok(Self::Danger),
            Tier::Normal => Err(Error::Validation(
                "A normal reading does not produce an alert".into(),
            )),
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification channels, in their fixed dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Push,
    WhatsApp,
    Email,
    Sound,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 4] = [Self::Push, Self::WhatsApp, Self::Email, Self::Sound];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::WhatsApp => "whatsapp",
            Self::Email => "email",
            Self::Sound => "sound",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "push" | "fcm" | "firebase" => Some(Self::Push),
            "whatsapp" => Some(Self::WhatsApp),
            "email" => Some(Self::Email),
            "sound" => Some(Self::Sound),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// Result of one delivery attempt on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    #[serde(rename = "type")]
    pub channel: ChannelKind,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationOutcome {
    pub fn sent(channel: ChannelKind) -> Self {
        Self {
            channel,
            status: DeliveryStatus::Sent,
            error: None,
        }
    }

    pub fn failed(channel: ChannelKind, error: impl Into<String>) -> Self {
        Self {
            channel,
            status: DeliveryStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn is_sent(&self) -> bool {
        self.status == DeliveryStatus::Sent
    }

    /// One-line rendering used by alert history, e.g. `whatsapp: failed — Error: bad number`.
    pub fn summary(&self) -> String {
        match &self.error {
            Some(error) => format!(
                "{}: {} — Error: {}",
                self.channel,
                self.status.as_str(),
                error
            ),
            None => format!("{}: {}", self.channel, self.status.as_str()),
        }
    }
}

/// A persisted alert.
///
/// Only `notifications` changes after creation, and only once, when
/// `finalized_at` is stamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub gas_level: f64,
    pub is_leak: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notifications: Vec<NotificationOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
}

impl AlertRecord {
    /// New pending record. The timestamp is the current server time, not the reading's.
    pub fn new(kind: AlertKind, reading: &Reading) -> Self {
        Self {
            id: AlertId::new(),
            kind,
            gas_level: reading.check_value,
            is_leak: reading.is_leak,
            timestamp: Utc::now(),
            notifications: Vec::new(),
            finalized_at: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized_at.is_some()
    }

    /// Attach outcomes and stamp the record as finalized.
    pub fn finalize(&mut self, outcomes: Vec<NotificationOutcome>) -> Result<()> {
        if self.is_finalized() {
            return Err(Error::AlreadyFinalized(self.id.to_string()));
        }
        self.notifications = outcomes;
        self.finalized_at = Some(Utc::now());
        Ok(())
    }

    pub fn failed_channels(&self) -> Vec<ChannelKind> {
        self.notifications
            .iter()
            .filter(|o| !o.is_sent())
            .map(|o| o.channel)
            .collect()
    }

    pub fn notice(&self) -> AlertNotice {
        AlertNotice {
            alert_id: self.id.clone(),
            kind: self.kind,
            gas_level: self.gas_level,
            is_leak: self.is_leak,
            timestamp: self.timestamp,
        }
    }
}

/// What the fanout needs to know about an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertNotice {
    pub alert_id: AlertId,
    pub kind: AlertKind,
    pub gas_level: f64,
    pub is_leak: bool,
    pub timestamp: DateTime<Utc>,
}
