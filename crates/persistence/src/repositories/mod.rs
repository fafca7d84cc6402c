//! Repository implementations for database operations.
//!
//! Each repository also implements the matching domain store trait.

pub mod availability;
pub mod group;
pub mod pairing;

pub use availability::AvailabilityRepository;
pub use group::GroupRepository;
pub use pairing::PairingRepository;
