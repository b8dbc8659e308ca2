//! Schema migrations
//!
//! The applied version is recorded in `schema_migrations`; opening a
//! database applies whatever is still pending, in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// One schema change
pub struct Migration {
    /// Sequential version, starting at 1
    pub version: u32,
    /// What this migration does
    pub description: &'static str,
    /// SQL applied as a single batch
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Users table
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                role INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Sessions table
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );

            -- Venues table
            CREATE TABLE IF NOT EXISTS venues (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                description TEXT,
                location_json TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (owner_id) REFERENCES users(id)
            );

            -- Halls table
            -- Hall names are unique per venue; the composite key carries the
            -- uniqueness rule so concurrent creates cannot both pass a
            -- read-side check.
            CREATE TABLE IF NOT EXISTS halls (
                id TEXT PRIMARY KEY,
                venue_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                blocks_json TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (venue_id) REFERENCES venues(id) ON DELETE CASCADE,
                UNIQUE(venue_id, name)
            );

            -- Ordered hall-reference collection per venue
            CREATE TABLE IF NOT EXISTS venue_halls (
                venue_id TEXT NOT NULL,
                hall_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                PRIMARY KEY (venue_id, hall_id),
                FOREIGN KEY (venue_id) REFERENCES venues(id) ON DELETE CASCADE,
                FOREIGN KEY (hall_id) REFERENCES halls(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for query performance",
        sql: r#"
            -- Session indexes
            CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);

            -- Venue indexes
            CREATE INDEX IF NOT EXISTS idx_venues_owner ON venues(owner_id);

            -- Hall indexes
            CREATE INDEX IF NOT EXISTS idx_halls_venue ON halls(venue_id);
            CREATE INDEX IF NOT EXISTS idx_halls_created ON halls(created_at);

            -- Hall-reference collection ordering
            CREATE INDEX IF NOT EXISTS idx_venue_halls_position ON venue_halls(venue_id, position);
        "#,
    },
];

fn ensure_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn current_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn mark_applied(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Apply every migration newer than the recorded schema version.
///
/// Safe to call on every open; an up-to-date database is a no-op.
/// Returns how many migrations ran.
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    ensure_version_table(conn)?;
    let from = current_version(conn)?;

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        info!(
            version = migration.version,
            "Applying migration '{}'", migration.description
        );
        conn.execute_batch(migration.sql)?;
        mark_applied(conn, migration)?;
        applied += 1;
    }

    if applied > 0 {
        info!(from, to = from + applied, "Schema migrated");
    }

    Ok(applied)
}
