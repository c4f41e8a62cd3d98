//! Schema migrations, tracked with `PRAGMA user_version`.
//!
//! [`MIGRATIONS`] lists every step in order; a step runs only when the
//! stored version is below its number, and the version is bumped in the same
//! transaction as the step itself.

pub mod v001_initial;
pub mod v002_catalog;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

type Step = fn(&Connection) -> rusqlite::Result<()>;

/// `(version, name, step)` in ascending version order.
const MIGRATIONS: &[(u32, &str, Step)] = &[
    (1, "v001_initial", v001_initial::up),
    (2, "v002_catalog", v002_catalog::up),
];

/// Schema version after all migrations ran.
pub const CURRENT_VERSION: u32 = MIGRATIONS[MIGRATIONS.len() - 1].0;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let stored: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if stored >= CURRENT_VERSION {
        tracing::debug!(version = stored, "schema up to date");
        return Ok(());
    }

    for &(version, name, step) in MIGRATIONS.iter().filter(|(v, _, _)| *v > stored) {
        tracing::info!(from = stored, to = version, migration = name, "migrating schema");

        let tx = conn.unchecked_transaction()?;
        step(&tx).map_err(|e| StoreError::Migration(format!("{name}: {e}")))?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }

    Ok(())
}
