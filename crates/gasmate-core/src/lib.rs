//! GasMate core.
//!
//! Domain types shared by every other crate in the workspace:
//!
//! - [`Reading`] and [`GasSupply`]: one observation from the gas sensor
//! - [`Tier`], [`Thresholds`] and [`classify`]: the threshold classifier
//! - [`AlertRecord`], [`AlertKind`] and [`NotificationOutcome`]: persisted alerts
//! - [`AccountSettings`]: the per-account settings document
//! - [`ReadingFeed`]: latest-value cache plus broadcast of live readings
//! - [`ReadingStats`]: aggregates over reading history
//! - [`IdentityVerifier`]: the seam for bearer-token verification

pub mod alert;
pub mod config;
pub mod error;
pub mod feed;
pub mod identity;
pub mod reading;
pub mod settings;
pub mod stats;
pub mod tier;

pub use alert::{
    AlertId, AlertKind, AlertNotice, AlertRecord, ChannelKind, DeliveryStatus, NotificationOutcome,
};
pub use error::{Error, Result};
pub use feed::{ReadingFeed, ReadingSubscription};
pub use identity::{IdentityVerifier, StaticIdentityVerifier, VerifiedIdentity};
pub use reading::{GasSupply, Reading};
pub use settings::{
    AccountSettings, DisplaySettings, EmailSettings, NotificationSettings, ProviderFlags,
    SoundSettings, WhatsAppSettings,
};
pub use stats::{daily_average, daily_averages, DailyAverage, ReadingStats, TimeRange};
pub use tier::{classify, Thresholds, Tier};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
