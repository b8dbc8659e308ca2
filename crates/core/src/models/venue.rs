//! Venue model - the top-level owned resource

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ActorId;

/// Structured address for a venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// A Venue is a physical location with exactly one owner.
///
/// Looked up by `slug` at the boundary; its halls live in the hall store
/// with an ordered back-reference collection maintained alongside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: Uuid,
    pub owner_id: ActorId,
    pub name: String,
    /// Unique human-readable identifier, unique across all venues
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    pub fn new(name: String, slug: String, owner_id: ActorId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            slug,
            description: None,
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}
