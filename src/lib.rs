//! MIDMEET — find a fair place to meet, and what to do once you're there.
//!
//! Given two or more starting points, the [`recommend::Recommender`] proposes
//! up to three meeting points, either hubs nearest the group's centroid or
//! the built-in hotspots with the least total travel. [`venues`] then lists
//! food, cafes and things to do around each point, shaped by the group's
//! [`vibe::Vibe`].

pub mod config;
pub mod geo;
pub mod hotspots;
pub mod places;
pub mod recommend;
pub mod server;
pub mod session;
pub mod venues;
pub mod vibe;
