//! Tessera Core Library
//!
//! Models, storage, ownership checks, and hierarchy coordination for the
//! Tessera venue-ticketing platform.

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod identity;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod storage;

pub use config::CoreConfig;
pub use error::{Error, Result};
pub use hierarchy::{CreateHall, HierarchyCoordinator, RegisterVenue};
pub use identity::{end_session, sweep_expired_sessions, IdentityContext};
pub use models::*;
pub use permissions::*;
pub use storage::{
    Database, HallRepository, HallStore, Storage, UserRepository, UserStore, VenueRepository,
    VenueStore,
};
