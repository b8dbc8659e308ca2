//! Hall storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{is_unique_violation, parse_blocks, parse_datetime, parse_uuid, OptionalExt};
use crate::error::{Error, Result};
use crate::models::Hall;

pub struct HallStore<'a> {
    conn: &'a Connection,
}

fn hall_from_row(row: &Row<'_>) -> std::result::Result<Hall, rusqlite::Error> {
    Ok(Hall {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        venue_id: parse_uuid(&row.get::<_, String>(1)?)?,
        name: row.get(2)?,
        description: row.get(3)?,
        blocks: parse_blocks(&row.get::<_, String>(4)?)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}

impl<'a> HallStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a new Hall row
    ///
    /// The UNIQUE(venue_id, name) key turns a concurrent duplicate into a
    /// BadRequest here instead of relying on a racy read-side check.
    #[instrument(skip(self, hall), fields(hall_name = %hall.name))]
    pub fn insert(&self, hall: &Hall) -> Result<()> {
        let blocks_json = serde_json::to_string(&hall.blocks)?;

        let result = self.conn.execute(
            "INSERT INTO halls (id, venue_id, name, description, blocks_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                hall.id.to_string(),
                hall.venue_id.to_string(),
                hall.name,
                hall.description,
                blocks_json,
                hall.created_at.to_rfc3339(),
                hall.updated_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(Error::BadRequest("'name' is already taken".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Find Hall by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Hall>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, venue_id, name, description, blocks_json, created_at, updated_at
             FROM halls WHERE id = ?1",
        )?;

        let hall = stmt
            .query_row(params![id.to_string()], hall_from_row)
            .optional()?;

        Ok(hall)
    }

    /// List a venue's halls via its reference collection, in insertion order
    #[instrument(skip(self))]
    pub fn list_for_venue(&self, venue_id: Uuid) -> Result<Vec<Hall>> {
        let mut stmt = self.conn.prepare(
            "SELECT h.id, h.venue_id, h.name, h.description, h.blocks_json, h.created_at, h.updated_at
             FROM venue_halls vh
             INNER JOIN halls h ON h.id = vh.hall_id
             WHERE vh.venue_id = ?1
             ORDER BY vh.position",
        )?;

        let halls = stmt
            .query_map(params![venue_id.to_string()], hall_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(halls)
    }

    /// List all halls across venues (administrative listing)
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Result<Vec<Hall>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, venue_id, name, description, blocks_json, created_at, updated_at
             FROM halls ORDER BY created_at, rowid",
        )?;

        let halls = stmt
            .query_map([], hall_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(halls)
    }

    /// Update a Hall's mutable fields
    ///
    /// Renames hit the same UNIQUE(venue_id, name) key as inserts.
    #[instrument(skip(self, hall), fields(hall_id = %hall.id))]
    pub fn update(&self, hall: &Hall) -> Result<()> {
        let blocks_json = serde_json::to_string(&hall.blocks)?;

        let result = self.conn.execute(
            "UPDATE halls SET name = ?1, description = ?2, blocks_json = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                hall.name,
                hall.description,
                blocks_json,
                hall.updated_at.to_rfc3339(),
                hall.id.to_string(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(Error::BadRequest("'name' is already taken".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
