//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Hall, Venue};

/// Validate that a Venue's state is internally consistent
pub fn assert_venue_invariants(venue: &Venue) {
    debug_assert!(
        !venue.name.trim().is_empty(),
        "Venue {} has empty name",
        venue.id
    );

    debug_assert!(
        !venue.slug.trim().is_empty(),
        "Venue {} has empty slug",
        venue.id
    );
}

/// Validate that a Hall's state is internally consistent
pub fn assert_hall_invariants(hall: &Hall) {
    debug_assert!(
        !hall.name.trim().is_empty(),
        "Hall {} has empty name",
        hall.id
    );

    debug_assert!(
        hall.venue_id != Uuid::nil(),
        "Hall {} has nil venue reference",
        hall.id
    );

    // Seat ids must not repeat anywhere within the hall
    let mut seen = HashSet::new();
    for block in &hall.blocks {
        for seat in &block.seats {
            debug_assert!(
                seen.insert(seat.id),
                "Hall {} repeats seat {} across blocks",
                hall.id,
                seat.id
            );
        }
    }
}

/// Validate that a venue's reference collection matches the halls it claims
pub fn assert_hall_list_consistent(venue_id: Uuid, hall_ids: &[Uuid], halls: &[Hall]) {
    debug_assert!(
        hall_ids.len() == halls.len(),
        "Venue {} references {} halls but resolved {}",
        venue_id,
        hall_ids.len(),
        halls.len()
    );

    for hall in halls {
        debug_assert!(
            hall.venue_id == venue_id,
            "Hall {} resolved for venue {} but references venue {}",
            hall.id,
            venue_id,
            hall.venue_id
        );

        debug_assert!(
            hall_ids.contains(&hall.id),
            "Hall {} missing from venue {} reference collection",
            hall.id,
            venue_id
        );
    }
}
