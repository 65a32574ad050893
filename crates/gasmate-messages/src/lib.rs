//! Alert notification for GasMate.
//!
//! Alerts are recorded once and then fanned out to every channel the
//! account has enabled. Each attempt produces one outcome, and the full
//! outcome list is written back onto the alert record.
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `email` | ✅ | Email notification channel via SMTP |
//!
//! ## Channels
//!
//! - **Push**: Firebase Cloud Messaging HTTP v1
//! - **WhatsApp**: Twilio Messages API
//! - **Email**: SMTP via lettre
//! - **Sound**: cues broadcast to connected dashboards
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gasmate_core::{AlertKind, Reading, StaticIdentityVerifier};
//! use gasmate_messages::{AlertPipeline, AlertRecorder, ChannelSet, NotificationFanout};
//! use gasmate_storage::Stores;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stores = Stores::memory()?;
//!     let verifier = StaticIdentityVerifier::new().with_token("dev", "acct-1");
//!     let pipeline = AlertPipeline::new(
//!         Arc::new(verifier),
//!         stores.settings.clone(),
//!         AlertRecorder::new(stores.alerts.clone(), stores.settings.clone()),
//!         NotificationFanout::new(ChannelSet::new()),
//!     );
//!
//!     let record = pipeline
//!         .raise_alert(Some("dev"), &Reading::new(7.2, true), AlertKind::Danger)
//!         .await?;
//!     println!("{} outcomes", record.notifications.len());
//!     Ok(())
//! }
//! ```

pub mod channels;
pub mod content;
pub mod error;
pub mod fanout;
pub mod monitor;
pub mod pipeline;
pub mod recorder;

pub use channels::{
    ChannelSet, FcmConfig, FcmPushChannel, MemoryChannel, NotificationChannel, SoundChannel,
    SoundCue, TwilioConfig, TwilioWhatsAppChannel,
};
pub use content::{NotificationContent, PushContent};
pub use error::{Error, Result};
pub use fanout::NotificationFanout;
pub use monitor::{AlertMonitor, EscalationTracker, MonitorHandle};
pub use pipeline::AlertPipeline;
pub use recorder::AlertRecorder;

#[cfg(feature = "email")]
pub use channels::{SmtpConfig, SmtpEmailChannel};
