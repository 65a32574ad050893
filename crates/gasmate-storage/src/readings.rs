//! Reading history storage.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gasmate_core::Reading;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use uuid::Uuid;

use crate::db::{open_file, open_memory};
use crate::Result;

// Readings table: key = "{timestamp_micros:020}_{uuid}", value = Reading (JSON).
// Keys sort chronologically.
const READINGS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("readings");

fn time_prefix(ts: &DateTime<Utc>) -> String {
    format!("{:020}", ts.timestamp_micros().max(0))
}

pub struct ReadingStore {
    db: Arc<Database>,
}

impl ReadingStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let db = open_file(dir.as_ref(), "readings.redb", READINGS_TABLE)?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn memory() -> Result<Self> {
        Ok(Self {
            db: Arc::new(open_memory(READINGS_TABLE)?),
        })
    }

    pub fn append(&self, reading: &Reading) -> Result<()> {
        let key = format!("{}_{}", time_prefix(&reading.timestamp), Uuid::new_v4().simple());
        let json = serde_json::to_string(reading)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(READINGS_TABLE)?;
            table.insert(key.as_str(), json.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Most recent readings, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<Reading>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(READINGS_TABLE)?;

        let mut readings = Vec::with_capacity(limit.min(64));
        for entry in table.iter()?.rev().take(limit) {
            let (_, value) = entry?;
            readings.push(serde_json::from_str(value.value())?);
        }
        Ok(readings)
    }

    /// Readings taken at or after `since`, oldest first.
    pub fn since(&self, since: DateTime<Utc>) -> Result<Vec<Reading>> {
        let start = time_prefix(&since);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(READINGS_TABLE)?;

        let mut readings = Vec::new();
        for entry in table.range(start.as_str()..)? {
            let (_, value) = entry?;
            readings.push(serde_json::from_str(value.value())?);
        }
        Ok(readings)
    }

    pub fn latest(&self) -> Result<Option<Reading>> {
        Ok(self.recent(1)?.into_iter().next())
    }

    pub fn len(&self) -> Result<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(READINGS_TABLE)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
