//! Versioned worker table definitions.
//!
//! Each entry in `STEPS` upgrades the file by exactly one `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const STEPS: &[(u32, &str)] = &[(1, include_str!("v1_workers.sql"))];

/// Schema version written by this build.
pub fn schema_version() -> u32 {
    STEPS.last().map_or(0, |&(version, _)| version)
}

/// Upgrades `conn` to [`schema_version`], refusing files from newer builds.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let supported = schema_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<_> = STEPS
        .iter()
        .filter(|&&(version, _)| version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &(version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!("event=db_schema module=db status=ok from_version={found} to_version={supported}");
    Ok(())
}

pub(crate) fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
