//! Venue storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    is_unique_violation, parse_actor_id, parse_datetime, parse_location_opt, parse_uuid,
    OptionalExt,
};
use crate::error::{Error, Result};
use crate::models::Venue;

pub struct VenueStore<'a> {
    conn: &'a Connection,
}

impl<'a> VenueStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a new Venue
    ///
    /// A slug collision surfaces as BadRequest; slugs are unique across all
    /// venues and the constraint lives in the store, not in a pre-check.
    #[instrument(skip(self, venue), fields(slug = %venue.slug))]
    pub fn insert(&self, venue: &Venue) -> Result<()> {
        let location_json = venue
            .location
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = self.conn.execute(
            "INSERT INTO venues (id, owner_id, name, slug, description, location_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                venue.id.to_string(),
                venue.owner_id.to_string(),
                venue.name,
                venue.slug,
                venue.description,
                location_json,
                venue.created_at.to_rfc3339(),
                venue.updated_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(Error::BadRequest("'slug' is already taken".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Find Venue by slug
    #[instrument(skip(self))]
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Venue>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, name, slug, description, location_json, created_at, updated_at
             FROM venues WHERE slug = ?1",
        )?;

        let venue = stmt
            .query_row(params![slug], |row| {
                Ok(Venue {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    owner_id: parse_actor_id(&row.get::<_, String>(1)?)?,
                    name: row.get(2)?,
                    slug: row.get(3)?,
                    description: row.get(4)?,
                    location: parse_location_opt(row.get::<_, Option<String>>(5)?)?,
                    created_at: parse_datetime(&row.get::<_, String>(6)?)?,
                    updated_at: parse_datetime(&row.get::<_, String>(7)?)?,
                })
            })
            .optional()?;

        Ok(venue)
    }

    /// Append a hall to the venue's ordered hall-reference collection
    ///
    /// Positions are assigned at append time; insertion order is the only
    /// order this collection ever has.
    #[instrument(skip(self))]
    pub fn append_hall(&self, venue_id: Uuid, hall_id: Uuid) -> Result<()> {
        self.conn.execute(
            "INSERT INTO venue_halls (venue_id, hall_id, position)
             SELECT ?1, ?2, COALESCE(MAX(position) + 1, 0)
             FROM venue_halls WHERE venue_id = ?1",
            params![venue_id.to_string(), hall_id.to_string()],
        )?;
        Ok(())
    }

    /// Hall ids in the venue's reference collection, in insertion order
    #[instrument(skip(self))]
    pub fn hall_ids(&self, venue_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare(
            "SELECT hall_id FROM venue_halls WHERE venue_id = ?1 ORDER BY position",
        )?;

        let ids = stmt
            .query_map(params![venue_id.to_string()], |row| {
                parse_uuid(&row.get::<_, String>(0)?)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ids)
    }
}
