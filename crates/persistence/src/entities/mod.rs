//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod availability;
pub mod group;
pub mod invite;
pub mod member;
pub mod pairing;
pub mod venue;

pub use availability::{AvailabilitySlotEntity, TimeSlotDb};
pub use group::{GroupEntity, PairingCadenceDb};
pub use invite::{InviteEntity, InviteStatusDb};
pub use member::MemberEntity;
pub use pairing::{MatchEntity, MatchGuestEntity, MatchStatusDb, PairingEventEntity};
pub use venue::VenueEntity;
