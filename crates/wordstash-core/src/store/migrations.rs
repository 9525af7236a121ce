//! Versioned schema migrations.
//!
//! Each migration runs in its own transaction and is recorded in
//! `schema_migrations`, so it is applied at most once per database.

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::store::collections;

/// Latest schema version.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

const INIT_SCHEMA: &str = include_str!("schema.sql");

enum Step {
    Sql(&'static str),
    SeedCollections,
}

struct Migration {
    version: i32,
    name: &'static str,
    step: Step,
}

fn migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            name: "initial schema",
            step: Step::Sql(INIT_SCHEMA),
        },
        Migration {
            version: 2,
            name: "seed bundled collections",
            step: Step::SeedCollections,
        },
    ]
}

/// Apply every migration newer than the recorded version.
pub(crate) fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            applied_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )?;

    let current = current_version(conn)?;
    for migration in migrations().into_iter().filter(|m| m.version > current) {
        let tx = conn.unchecked_transaction()?;
        match migration.step {
            Step::Sql(sql) => tx.execute_batch(sql)?,
            Step::SeedCollections => {
                let seeded = collections::seed_bundled(&tx)?;
                tracing::info!(seeded, "seeded bundled collections");
            }
        }
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )?;
        tx.commit()?;
        tracing::debug!(version = migration.version, name = migration.name, "applied migration");
    }
    Ok(())
}

pub(crate) fn current_version(conn: &Connection) -> Result<i32> {
    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |r| r.get(0))?;
    Ok(version.unwrap_or(0))
}
