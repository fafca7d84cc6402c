//! Domain models for dinner pairing.

pub mod availability;
pub mod group;
pub mod invite;
pub mod member;
pub mod pairing;
pub mod venue;

pub use availability::{
    AvailabilityEntry, AvailabilitySlot, SaveAvailabilityRequest, SlotChoice, TimeSlot,
};
pub use group::{Group, PairingCadence};
pub use invite::{Invite, InviteStatus};
pub use member::Member;
pub use pairing::{ConfirmationState, Match, MatchGuest, PairingEvent};
pub use venue::Venue;
