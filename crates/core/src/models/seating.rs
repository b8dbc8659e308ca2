//! Seating structure embedded in a Hall
//!
//! Blocks and seats are structural only at this layer; reservation-time
//! state lives with the seat-management collaborator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A seating subdivision within a Hall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub label: String,
    #[serde(default)]
    pub seats: Vec<Seat>,
}

impl Block {
    pub fn new(label: String) -> Self {
        Self {
            label,
            seats: Vec::new(),
        }
    }

    pub fn with_seats(mut self, seats: Vec<Seat>) -> Self {
        self.seats = seats;
        self
    }
}

/// An individually addressable seat within a Block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: Uuid,
    pub name: String,
}

impl Seat {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}
