//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, mock, future network backend). Stores only
//! move rows; every rule that spans two entities lives in the
//! hierarchy coordinator.

use uuid::Uuid;

use crate::error::Result;
use crate::models::{ActorId, Hall, Session, User, Venue};

/// User and session repository operations
pub trait UserRepository {
    /// Create a new user
    fn create_user(&self, user: &User) -> Result<()>;

    /// Find user by ID
    fn find_user_by_id(&self, id: ActorId) -> Result<Option<User>>;

    /// Create a session
    fn create_session(&self, session: &Session) -> Result<()>;

    /// Find a valid (non-expired) session
    fn find_valid_session(&self, session_id: Uuid) -> Result<Option<Session>>;

    /// Delete a session
    fn delete_session(&self, session_id: Uuid) -> Result<()>;

    /// Clean up expired sessions
    fn cleanup_expired_sessions(&self) -> Result<u64>;
}

/// Venue repository operations
pub trait VenueRepository {
    /// Create a new Venue; a slug collision fails BadRequest
    fn create_venue(&self, venue: &Venue) -> Result<()>;

    /// Find Venue by slug
    fn find_venue_by_slug(&self, slug: &str) -> Result<Option<Venue>>;

    /// Append a hall id to the venue's ordered hall-reference collection
    fn append_hall(&self, venue_id: Uuid, hall_id: Uuid) -> Result<()>;

    /// Hall ids in the venue's reference collection, in insertion order
    fn hall_ids(&self, venue_id: Uuid) -> Result<Vec<Uuid>>;
}

/// Hall repository operations
pub trait HallRepository {
    /// Create a new Hall and append it to the owning venue's reference
    /// collection in one atomic step; a name collision within the venue
    /// fails BadRequest and neither write survives
    fn create_hall(&self, hall: &Hall) -> Result<()>;

    /// Find Hall by ID
    fn find_hall_by_id(&self, id: Uuid) -> Result<Option<Hall>>;

    /// List a venue's halls in insertion order
    fn list_halls_for_venue(&self, venue_id: Uuid) -> Result<Vec<Hall>>;

    /// List all halls across venues
    fn list_all_halls(&self) -> Result<Vec<Hall>>;

    /// Update a Hall's mutable fields; renames re-check uniqueness
    fn update_hall(&self, hall: &Hall) -> Result<()>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
/// Implementations may be backed by SQLite, mocks, or network.
pub trait Storage: UserRepository + VenueRepository + HallRepository {}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where T: UserRepository + VenueRepository + HallRepository {}
