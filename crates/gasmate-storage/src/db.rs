//! Database opening helpers shared by the stores.

use std::path::Path;

use redb::{backends::InMemoryBackend, Database, TableDefinition};

use crate::{Error, Result};

/// Open (or create) `file` under `dir` and make sure `table` exists.
pub(crate) fn open_file(
    dir: &Path,
    file: &str,
    table: TableDefinition<&str, &str>,
) -> Result<Database> {
    std::fs::create_dir_all(dir)?;
    let db = Database::create(dir.join(file))
        .map_err(|e| Error::Storage(format!("Failed to open {}: {}", file, e)))?;
    ensure_table(&db, table)?;
    tracing::debug!(path = %dir.join(file).display(), "Opened database");
    Ok(db)
}

/// In-memory database for tests and ephemeral servers.
pub(crate) fn open_memory(table: TableDefinition<&str, &str>) -> Result<Database> {
    let db = Database::builder()
        .create_with_backend(InMemoryBackend::new())
        .map_err(|e| Error::Storage(format!("Failed to create in-memory database: {}", e)))?;
    ensure_table(&db, table)?;
    Ok(db)
}

pub(crate) fn ensure_table(db: &Database, table: TableDefinition<&str, &str>) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(table)?;
    }
    write_txn.commit()?;
    Ok(())
}

/// Key range covering every key that starts with `prefix` followed by `\0`.
pub(crate) fn prefix_bounds(prefix: &str) -> (String, String) {
    (format!("{}\u{0}", prefix), format!("{}\u{1}", prefix))
}
