//! Ownership checks for venue mutations
//!
//! Pure comparison on canonical actor ids; no store access, no side
//! effects. Whether an actor exists at all is the identity layer's problem.

use crate::error::{Error, Result};
use crate::models::{ActorId, Venue};

/// A resource with exactly one owning actor
pub trait OwnedResource {
    fn owner(&self) -> ActorId;

    /// Short label used in error messages ("venue")
    fn kind(&self) -> &'static str;
}

impl OwnedResource for Venue {
    fn owner(&self) -> ActorId {
        self.owner_id
    }

    fn kind(&self) -> &'static str {
        "venue"
    }
}

/// Check that the acting identity owns the resource.
///
/// Anonymous actors fail the same way as wrong actors: Forbidden.
pub fn authorize_owner<R: OwnedResource>(resource: &R, actor: Option<ActorId>) -> Result<()> {
    let actor = actor.ok_or_else(|| Error::Forbidden("authentication required".to_string()))?;

    if resource.owner() != actor {
        return Err(Error::Forbidden(format!(
            "you are not the owner of this {}",
            resource.kind()
        )));
    }

    Ok(())
}
