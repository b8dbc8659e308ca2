//! SQLite storage layer for Tessera

mod halls;
mod migrations;
mod parse;
mod traits;
mod users;
mod venues;

use std::path::Path;

use rusqlite::Connection;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ActorId, Hall, Session, User, Venue};

pub use halls::HallStore;
pub use traits::{HallRepository, Storage, UserRepository, VenueRepository};
pub use users::UserStore;
pub use venues::VenueStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0)
    }

    /// Get user store
    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    /// Get venue store
    pub fn venues(&self) -> VenueStore<'_> {
        VenueStore::new(&self.conn)
    }

    /// Get hall store
    pub fn halls(&self) -> HallStore<'_> {
        HallStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl UserRepository for Database {
    fn create_user(&self, user: &User) -> Result<()> {
        self.users().create(user)
    }

    fn find_user_by_id(&self, id: ActorId) -> Result<Option<User>> {
        self.users().find_by_id(id)
    }

    fn create_session(&self, session: &Session) -> Result<()> {
        self.users().create_session(session)
    }

    fn find_valid_session(&self, session_id: Uuid) -> Result<Option<Session>> {
        self.users().find_valid_session(session_id)
    }

    fn delete_session(&self, session_id: Uuid) -> Result<()> {
        self.users().delete_session(session_id)
    }

    fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.users().cleanup_expired_sessions()
    }
}

impl VenueRepository for Database {
    fn create_venue(&self, venue: &Venue) -> Result<()> {
        self.venues().insert(venue)
    }

    fn find_venue_by_slug(&self, slug: &str) -> Result<Option<Venue>> {
        self.venues().find_by_slug(slug)
    }

    fn append_hall(&self, venue_id: Uuid, hall_id: Uuid) -> Result<()> {
        self.venues().append_hall(venue_id, hall_id)
    }

    fn hall_ids(&self, venue_id: Uuid) -> Result<Vec<Uuid>> {
        self.venues().hall_ids(venue_id)
    }
}

impl HallRepository for Database {
    /// Hall row insert and reference-collection append ride one savepoint,
    /// so a failure in either leaves no orphaned hall behind.
    fn create_hall(&self, hall: &Hall) -> Result<()> {
        self.conn.execute_batch("SAVEPOINT create_hall")?;

        let outcome = self
            .halls()
            .insert(hall)
            .and_then(|_| self.venues().append_hall(hall.venue_id, hall.id));

        match outcome {
            Ok(()) => {
                self.conn.execute_batch("RELEASE create_hall")?;
                Ok(())
            }
            Err(err) => {
                let _ = self
                    .conn
                    .execute_batch("ROLLBACK TO create_hall; RELEASE create_hall");
                Err(err)
            }
        }
    }

    fn find_hall_by_id(&self, id: Uuid) -> Result<Option<Hall>> {
        self.halls().find_by_id(id)
    }

    fn list_halls_for_venue(&self, venue_id: Uuid) -> Result<Vec<Hall>> {
        self.halls().list_for_venue(venue_id)
    }

    fn list_all_halls(&self) -> Result<Vec<Hall>> {
        self.halls().list_all()
    }

    fn update_hall(&self, hall: &Hall) -> Result<()> {
        self.halls().update(hall)
    }
}
