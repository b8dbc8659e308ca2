//! Data models for Tessera

mod actor;
mod hall;
mod seating;
mod venue;

pub use actor::*;
pub use hall::*;
pub use seating::*;
pub use venue::*;
