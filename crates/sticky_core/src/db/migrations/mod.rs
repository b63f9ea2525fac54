//! Ordered schema scripts for the state database.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_entries",
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Schema versions before and after a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
}

impl MigrationReport {
    /// True when at least one script ran.
    pub fn applied(&self) -> bool {
        self.to_version > self.from_version
    }
}

/// Highest schema version this build can write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings the schema up to [`latest_version`] in one transaction.
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build; nothing is touched.
/// - `Migration` naming the script that failed; the run is rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationReport> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let report = MigrationReport {
        from_version: found,
        to_version: supported,
    };
    if !report.applied() {
        return Ok(report);
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|migration| migration.version > found) {
        tx.execute_batch(migration.sql).map_err(|source| DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        })?;
        tx.pragma_update(None, "user_version", migration.version)?;
        debug!(
            "event=db_migrate module=db status=step version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(report)
}
