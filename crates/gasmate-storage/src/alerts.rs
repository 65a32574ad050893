//! Alert record storage using redb.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use gasmate_core::{AlertId, AlertRecord, NotificationOutcome};
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};

use crate::db::{ensure_table, open_file, open_memory, prefix_bounds};
use crate::{Error, Result};

// Alerts table: key = "{account_id}\0{alert_id}", value = AlertRecord (JSON)
const ALERTS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("alerts");

// Fanout claims: same key as the alert, value = RFC 3339 claim time
const CLAIMS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("alert_claims");

fn alert_key(account_id: &str, alert_id: &AlertId) -> String {
    format!("{}\u{0}{}", account_id, alert_id)
}

/// Per-account alert history.
pub struct AlertStore {
    db: Arc<Database>,
}

impl AlertStore {
    /// Open the alert store under the given data directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let db = open_file(dir.as_ref(), "alerts.redb", ALERTS_TABLE)?;
        ensure_table(&db, CLAIMS_TABLE)?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn memory() -> Result<Self> {
        let db = open_memory(ALERTS_TABLE)?;
        ensure_table(&db, CLAIMS_TABLE)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Insert a new record.
    pub fn insert(&self, account_id: &str, record: &AlertRecord) -> Result<()> {
        let key = alert_key(account_id, &record.id);
        let json = serde_json::to_string(record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ALERTS_TABLE)?;
            table
                .insert(key.as_str(), json.as_str())
                .map_err(|e| Error::Storage(format!("Failed to insert alert: {}", e)))?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get(&self, account_id: &str, alert_id: &AlertId) -> Result<Option<AlertRecord>> {
        let key = alert_key(account_id, alert_id);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALERTS_TABLE)?;

        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_str(value.value())?)),
            None => Ok(None),
        }
    }

    /// Claim a pending record for one fanout.
    ///
    /// Fails with `NotFound`, `AlreadyFinalized`, or `Claimed` while another
    /// claim younger than `stale_after` is held. An older claim belongs to a
    /// fanout that never finished and is taken over.
    pub fn claim(
        &self,
        account_id: &str,
        alert_id: &AlertId,
        stale_after: Duration,
    ) -> Result<AlertRecord> {
        let key = alert_key(account_id, alert_id);
        let now = Utc::now();
        let write_txn = self.db.begin_write()?;

        let record = {
            let alerts = write_txn.open_table(ALERTS_TABLE)?;
            let json = alerts
                .get(key.as_str())?
                .map(|v| v.value().to_string())
                .ok_or_else(|| Error::NotFound(format!("Alert {}", alert_id)))?;
            let record: AlertRecord = serde_json::from_str(&json)?;
            if record.is_finalized() {
                return Err(Error::AlreadyFinalized(alert_id.to_string()));
            }

            let mut claims = write_txn.open_table(CLAIMS_TABLE)?;
            let held = claims.get(key.as_str())?.map(|v| v.value().to_string());
            if let Some(held) = held {
                match DateTime::parse_from_rfc3339(&held) {
                    Ok(at) if now.signed_duration_since(at) < stale_after => {
                        return Err(Error::Claimed(alert_id.to_string()));
                    }
                    _ => tracing::warn!(
                        account_id,
                        alert_id = %alert_id,
                        claimed_at = %held,
                        "Taking over stale fanout claim"
                    ),
                }
            }
            claims.insert(key.as_str(), now.to_rfc3339().as_str())?;
            record
        };

        write_txn.commit()?;
        Ok(record)
    }

    /// Attach outcomes to a pending record in a single write transaction.
    ///
    /// Fails with `NotFound` for an unknown id and `AlreadyFinalized` when the
    /// record already carries outcomes. Nothing is written on failure.
    pub fn finalize(
        &self,
        account_id: &str,
        alert_id: &AlertId,
        outcomes: Vec<NotificationOutcome>,
    ) -> Result<AlertRecord> {
        let key = alert_key(account_id, alert_id);
        let write_txn = self.db.begin_write()?;

        let record = {
            let mut table = write_txn.open_table(ALERTS_TABLE)?;
            let existing = table.get(key.as_str())?.map(|v| v.value().to_string());
            let json = existing.ok_or_else(|| Error::NotFound(format!("Alert {}", alert_id)))?;

            let mut record: AlertRecord = serde_json::from_str(&json)?;
            if record.is_finalized() {
                return Err(Error::AlreadyFinalized(alert_id.to_string()));
            }
            record
                .finalize(outcomes)
                .map_err(|_| Error::AlreadyFinalized(alert_id.to_string()))?;

            let updated = serde_json::to_string(&record)?;
            table.insert(key.as_str(), updated.as_str())?;

            let mut claims = write_txn.open_table(CLAIMS_TABLE)?;
            claims.remove(key.as_str())?;
            record
        };

        write_txn.commit()?;
        Ok(record)
    }

    /// Records for one account, newest first.
    pub fn list(&self, account_id: &str, limit: usize) -> Result<Vec<AlertRecord>> {
        let (start, end) = prefix_bounds(account_id);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALERTS_TABLE)?;

        let mut records = Vec::new();
        for entry in table.range(start.as_str()..end.as_str())? {
            let (_, value) = entry?;
            match serde_json::from_str::<AlertRecord>(value.value()) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(account_id, error = %e, "Skipping unreadable alert record"),
            }
        }

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        Ok(records)
    }

    pub fn count(&self, account_id: &str) -> Result<usize> {
        let (start, end) = prefix_bounds(account_id);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALERTS_TABLE)?;
        Ok(table.range(start.as_str()..end.as_str())?.count())
    }

    /// Total records across all accounts.
    pub fn len(&self) -> Result<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALERTS_TABLE)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
