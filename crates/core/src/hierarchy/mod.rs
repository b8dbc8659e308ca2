//! Hierarchy coordination across venues and halls
//!
//! The coordinator resolves the parent, checks ownership, and persists
//! children through the store's conflict-detecting writes. Stores never
//! look across entities; every cross-entity rule lives here.

use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{ActorId, Block, Hall, Location, Venue};
use crate::permissions;
use crate::storage::Storage;

/// Payload for hall creation, schema-validated at the boundary
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHall {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Payload for venue registration
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterVenue {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// Coordinates create/read operations across the venue/hall hierarchy.
///
/// Holds its store by injected reference so tests can run against an
/// in-memory database or any other `Storage` implementation.
pub struct HierarchyCoordinator<'a, S: Storage> {
    store: &'a S,
}

impl<'a, S: Storage> HierarchyCoordinator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// List a venue's halls, or every hall when no slug is given.
    ///
    /// The scoped listing resolves through the venue's reference
    /// collection; the unscoped listing is the administrative view across
    /// all venues. No authorization on either path.
    #[instrument(skip(self))]
    pub fn list_halls(&self, venue_slug: Option<&str>) -> Result<Vec<Hall>> {
        match venue_slug {
            Some(slug) => {
                let venue = self.resolve_venue(slug)?;
                let halls = self.store.list_halls_for_venue(venue.id)?;

                if cfg!(debug_assertions) {
                    let ids = self.store.hall_ids(venue.id)?;
                    invariants::assert_hall_list_consistent(venue.id, &ids, &halls);
                }

                Ok(halls)
            }
            None => self.store.list_all_halls(),
        }
    }

    /// Create a hall under the venue identified by `venue_slug`.
    ///
    /// Owner-only. The hall insert and the venue-side reference append are
    /// one atomic store operation; a duplicate name within the venue comes
    /// back from the UNIQUE key as BadRequest, with nothing written.
    #[instrument(skip(self, payload), fields(hall_name = %payload.name))]
    pub fn create_hall(
        &self,
        venue_slug: &str,
        payload: CreateHall,
        actor: Option<ActorId>,
    ) -> Result<Hall> {
        let venue = self.resolve_venue(venue_slug)?;
        permissions::authorize_owner(&venue, actor)?;

        let mut hall = Hall::new(venue.id, payload.name).with_blocks(payload.blocks);
        if let Some(description) = payload.description {
            hall = hall.with_description(description);
        }
        invariants::assert_hall_invariants(&hall);

        self.store.create_hall(&hall)?;
        Ok(hall)
    }

    /// Register a new venue owned by the acting identity.
    ///
    /// Slug uniqueness is global and enforced the same way hall names are:
    /// by the store's key, not a read-side check.
    #[instrument(skip(self, payload), fields(slug = %payload.slug))]
    pub fn register_venue(
        &self,
        payload: RegisterVenue,
        actor: Option<ActorId>,
    ) -> Result<Venue> {
        let owner =
            actor.ok_or_else(|| Error::Forbidden("authentication required".to_string()))?;

        let mut venue = Venue::new(payload.name, payload.slug, owner);
        if let Some(description) = payload.description {
            venue = venue.with_description(description);
        }
        if let Some(location) = payload.location {
            venue = venue.with_location(location);
        }
        invariants::assert_venue_invariants(&venue);

        self.store.create_venue(&venue)?;
        Ok(venue)
    }

    /// Rename a hall under the venue identified by `venue_slug`.
    ///
    /// Owner-only. A hall id that belongs to a different venue is NotFound
    /// here, not a cross-venue mutation. Renaming to the current name is a
    /// no-op success.
    #[instrument(skip(self))]
    pub fn rename_hall(
        &self,
        venue_slug: &str,
        hall_id: Uuid,
        new_name: String,
        actor: Option<ActorId>,
    ) -> Result<Hall> {
        let venue = self.resolve_venue(venue_slug)?;
        permissions::authorize_owner(&venue, actor)?;

        let mut hall = self
            .store
            .find_hall_by_id(hall_id)?
            .filter(|h| h.venue_id == venue.id)
            .ok_or_else(|| Error::NotFound("Hall not found".to_string()))?;

        if hall.name == new_name {
            return Ok(hall);
        }

        hall.name = new_name;
        hall.updated_at = Utc::now();
        invariants::assert_hall_invariants(&hall);

        self.store.update_hall(&hall)?;
        Ok(hall)
    }

    fn resolve_venue(&self, slug: &str) -> Result<Venue> {
        self.store
            .find_venue_by_slug(slug)?
            .ok_or_else(|| Error::NotFound("Venue not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActorRole, Seat, User};
    use crate::storage::{Database, HallRepository, UserRepository, VenueRepository};

    fn setup() -> (Database, User) {
        let db = Database::open_in_memory().unwrap();
        let user = User::new("avery".to_string(), ActorRole::Organizer);
        db.create_user(&user).unwrap();
        (db, user)
    }

    fn acme(db: &Database, owner: &User) -> Venue {
        let coordinator = HierarchyCoordinator::new(db);
        coordinator
            .register_venue(
                RegisterVenue {
                    name: "Acme Hall".to_string(),
                    slug: "acme-hall".to_string(),
                    description: None,
                    location: None,
                },
                Some(owner.id),
            )
            .unwrap()
    }

    fn main_floor() -> CreateHall {
        CreateHall {
            name: "Main Floor".to_string(),
            description: Some("Ground level".to_string()),
            blocks: vec![Block::new("Stalls".to_string())
                .with_seats(vec![Seat::new("A1".to_string()), Seat::new("A2".to_string())])],
        }
    }

    #[test]
    fn test_owner_creates_hall() {
        let (db, user) = setup();
        let venue = acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        let hall = coordinator
            .create_hall("acme-hall", main_floor(), Some(user.id))
            .unwrap();

        assert_eq!(hall.venue_id, venue.id);
        assert_eq!(hall.name, "Main Floor");
        assert_eq!(db.hall_ids(venue.id).unwrap(), vec![hall.id]);

        // Round-trip: the created hall is reachable through the venue listing
        let listed = coordinator.list_halls(Some("acme-hall")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, hall.id);
        assert_eq!(listed[0].blocks, hall.blocks);
    }

    #[test]
    fn test_non_owner_cannot_create_hall() {
        let (db, user) = setup();
        let venue = acme(&db, &user);

        let intruder = User::new("blake".to_string(), ActorRole::Organizer);
        db.create_user(&intruder).unwrap();

        let coordinator = HierarchyCoordinator::new(&db);
        let err = coordinator
            .create_hall("acme-hall", main_floor(), Some(intruder.id))
            .unwrap_err();

        assert!(matches!(err, Error::Forbidden(_)));
        assert!(db.hall_ids(venue.id).unwrap().is_empty());
    }

    #[test]
    fn test_anonymous_cannot_create_hall() {
        let (db, user) = setup();
        acme(&db, &user);

        let coordinator = HierarchyCoordinator::new(&db);
        let err = coordinator
            .create_hall("acme-hall", main_floor(), None)
            .unwrap_err();

        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[test]
    fn test_duplicate_hall_name_rejected() {
        let (db, user) = setup();
        let venue = acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        coordinator
            .create_hall("acme-hall", main_floor(), Some(user.id))
            .unwrap();
        let err = coordinator
            .create_hall("acme-hall", main_floor(), Some(user.id))
            .unwrap_err();

        assert!(matches!(err, Error::BadRequest(_)));
        assert_eq!(db.hall_ids(venue.id).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_venue_is_not_found() {
        let (db, _) = setup();
        let coordinator = HierarchyCoordinator::new(&db);

        let err = coordinator
            .list_halls(Some("nonexistent-slug"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = coordinator
            .create_hall("nonexistent-slug", main_floor(), Some(ActorId::new()))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // Nothing was written on either path
        assert!(db.list_all_halls().unwrap().is_empty());
    }

    #[test]
    fn test_unscoped_listing_spans_venues() {
        let (db, user) = setup();
        acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        coordinator
            .register_venue(
                RegisterVenue {
                    name: "Orpheum".to_string(),
                    slug: "orpheum".to_string(),
                    description: None,
                    location: None,
                },
                Some(user.id),
            )
            .unwrap();

        coordinator
            .create_hall("acme-hall", main_floor(), Some(user.id))
            .unwrap();
        coordinator
            .create_hall(
                "orpheum",
                CreateHall {
                    name: "Main Floor".to_string(),
                    description: None,
                    blocks: Vec::new(),
                },
                Some(user.id),
            )
            .unwrap();

        let all = coordinator.list_halls(None).unwrap();
        assert_eq!(all.len(), 2);

        let scoped = coordinator.list_halls(Some("orpheum")).unwrap();
        assert_eq!(scoped.len(), 1);
    }

    #[test]
    fn test_scoped_listing_preserves_creation_order() {
        let (db, user) = setup();
        acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        for name in ["West Wing", "Main Floor", "Balcony"] {
            coordinator
                .create_hall(
                    "acme-hall",
                    CreateHall {
                        name: name.to_string(),
                        description: None,
                        blocks: Vec::new(),
                    },
                    Some(user.id),
                )
                .unwrap();
        }

        let names: Vec<_> = coordinator
            .list_halls(Some("acme-hall"))
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, ["West Wing", "Main Floor", "Balcony"]);
    }

    #[test]
    fn test_register_venue_requires_actor() {
        let (db, _) = setup();
        let coordinator = HierarchyCoordinator::new(&db);

        let err = coordinator
            .register_venue(
                RegisterVenue {
                    name: "Acme Hall".to_string(),
                    slug: "acme-hall".to_string(),
                    description: None,
                    location: None,
                },
                None,
            )
            .unwrap_err();

        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[test]
    fn test_register_venue_duplicate_slug_rejected() {
        let (db, user) = setup();
        acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        let err = coordinator
            .register_venue(
                RegisterVenue {
                    name: "Acme Annex".to_string(),
                    slug: "acme-hall".to_string(),
                    description: None,
                    location: None,
                },
                Some(user.id),
            )
            .unwrap_err();

        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_owner_renames_hall() {
        let (db, user) = setup();
        acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        let hall = coordinator
            .create_hall("acme-hall", main_floor(), Some(user.id))
            .unwrap();

        let renamed = coordinator
            .rename_hall("acme-hall", hall.id, "Grand Floor".to_string(), Some(user.id))
            .unwrap();
        assert_eq!(renamed.name, "Grand Floor");

        let stored = db.find_hall_by_id(hall.id).unwrap().unwrap();
        assert_eq!(stored.name, "Grand Floor");
    }

    #[test]
    fn test_rename_to_taken_name_rejected() {
        let (db, user) = setup();
        acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        coordinator
            .create_hall("acme-hall", main_floor(), Some(user.id))
            .unwrap();
        let hall = coordinator
            .create_hall(
                "acme-hall",
                CreateHall {
                    name: "Balcony".to_string(),
                    description: None,
                    blocks: Vec::new(),
                },
                Some(user.id),
            )
            .unwrap();

        let err = coordinator
            .rename_hall("acme-hall", hall.id, "Main Floor".to_string(), Some(user.id))
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_rename_requires_owner() {
        let (db, user) = setup();
        acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        let hall = coordinator
            .create_hall("acme-hall", main_floor(), Some(user.id))
            .unwrap();

        let intruder = User::new("blake".to_string(), ActorRole::Organizer);
        db.create_user(&intruder).unwrap();

        let err = coordinator
            .rename_hall(
                "acme-hall",
                hall.id,
                "Grand Floor".to_string(),
                Some(intruder.id),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[test]
    fn test_rename_hall_from_other_venue_not_found() {
        let (db, user) = setup();
        acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        coordinator
            .register_venue(
                RegisterVenue {
                    name: "Orpheum".to_string(),
                    slug: "orpheum".to_string(),
                    description: None,
                    location: None,
                },
                Some(user.id),
            )
            .unwrap();
        let foreign = coordinator
            .create_hall("orpheum", main_floor(), Some(user.id))
            .unwrap();

        // Right owner, wrong venue for this hall id
        let err = coordinator
            .rename_hall(
                "acme-hall",
                foreign.id,
                "Grand Floor".to_string(),
                Some(user.id),
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let (db, user) = setup();
        acme(&db, &user);
        let coordinator = HierarchyCoordinator::new(&db);

        let hall = coordinator
            .create_hall("acme-hall", main_floor(), Some(user.id))
            .unwrap();
        let unchanged = coordinator
            .rename_hall("acme-hall", hall.id, "Main Floor".to_string(), Some(user.id))
            .unwrap();

        assert_eq!(unchanged.updated_at, hall.updated_at);
    }
}
