//! Domain layer for the dinner pairing backend.
//!
//! This crate contains:
//! - Domain models (Group, Member, Venue, PairingEvent, Match, Invite, AvailabilitySlot)
//! - The pairing, venue assignment and availability matching services
//! - Collaborator traits implemented by the persistence layer
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;

pub use errors::{PairingError, PersistenceFailure, RecordKind, StoreError};
