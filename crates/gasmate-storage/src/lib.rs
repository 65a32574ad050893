//! GasMate storage.
//!
//! Three redb databases under one data directory, each holding JSON values:
//!
//! - `alerts.redb`: alert records keyed by account and alert id
//! - `settings.redb`: one settings document per account
//! - `readings.redb`: ingested reading history keyed by time

pub mod alerts;
pub mod db;
pub mod error;
pub mod readings;
pub mod settings;

pub use alerts::AlertStore;
pub use error::{Error, Result};
pub use readings::ReadingStore;
pub use settings::SettingsStore;

use std::path::Path;
use std::sync::Arc;

/// All stores opened from one data directory.
#[derive(Clone)]
pub struct Stores {
    pub alerts: Arc<AlertStore>,
    pub settings: Arc<SettingsStore>,
    pub readings: Arc<ReadingStore>,
}

impl Stores {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            alerts: Arc::new(AlertStore::open(dir)?),
            settings: Arc::new(SettingsStore::open(dir)?),
            readings: Arc::new(ReadingStore::open(dir)?),
        })
    }

    pub fn memory() -> Result<Self> {
        Ok(Self {
            alerts: Arc::new(AlertStore::memory()?),
            settings: Arc::new(SettingsStore::memory()?),
            readings: Arc::new(ReadingStore::memory()?),
        })
    }
}
