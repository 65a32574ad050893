//! Account settings storage.

use std::path::Path;
use std::sync::Arc;

use gasmate_core::AccountSettings;
use redb::{Database, ReadableTable, TableDefinition};

use crate::db::{open_file, open_memory};
use crate::Result;

// Settings table: key = account_id, value = AccountSettings (JSON)
const SETTINGS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("settings");

pub struct SettingsStore {
    db: Arc<Database>,
}

impl SettingsStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let db = open_file(dir.as_ref(), "settings.redb", SETTINGS_TABLE)?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn memory() -> Result<Self> {
        Ok(Self {
            db: Arc::new(open_memory(SETTINGS_TABLE)?),
        })
    }

    /// Load the account's settings document, `None` if it was never saved.
    pub fn get(&self, account_id: &str) -> Result<Option<AccountSettings>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;
        match table.get(account_id)? {
            Some(value) => Ok(Some(serde_json::from_str(value.value())?)),
            None => Ok(None),
        }
    }

    /// Save (replace) the account's settings document.
    pub fn put(&self, account_id: &str, settings: &AccountSettings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.insert(account_id, json.as_str())?;
        }
        write_txn.commit()?;
        tracing::debug!(account_id, "Saved account settings");
        Ok(())
    }

    pub fn exists(&self, account_id: &str) -> Result<bool> {
        Ok(self.get(account_id)?.is_some())
    }
}
