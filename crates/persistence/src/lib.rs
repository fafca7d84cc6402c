//! Persistence layer for the dinner pairing backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations of the domain store traits
//! - SQL migrations under `src/migrations`

pub mod db;
pub mod entities;
pub mod errors;
pub mod metrics;
pub mod repositories;

pub use repositories::{AvailabilityRepository, GroupRepository, PairingRepository};
