//! Hall model - a subdivision of a Venue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Block;

/// A Hall belongs to exactly one Venue and carries its own seating
/// structure. Hall names are unique within the owning venue, not globally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hall {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Seating blocks, owned exclusively by this hall
    pub blocks: Vec<Block>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hall {
    pub fn new(venue_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            venue_id,
            name,
            description: None,
            blocks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}
