//! Domain services for dinner pairing.
//!
//! The algorithms here depend only on the traits in [`store`]; the persistence crate
//! supplies the PostgreSQL implementations.

pub mod availability_matcher;
pub mod cadence;
pub mod history_index;
pub mod memory_store;
pub mod orchestrator;
pub mod pairing_generator;
pub mod store;
pub mod venue_assigner;

pub use availability_matcher::{
    earliest_common, earliest_overlap, evaluate, respond_to_invite, save_availability,
    try_confirm, Evaluation, MatchSnapshot, MatchStatus, PartnerState, SaveOutcome,
};
pub use cadence::should_generate_pairings;
pub use history_index::{HistoryIndex, UnorderedPair};
pub use memory_store::{InMemoryStore, StoreOp};
pub use orchestrator::{PairingOrchestrator, PairingRunOutcome, PersistedMatch};
pub use pairing_generator::{generate, PairGroup, PairingPlan};
pub use store::{AvailabilityStore, GroupDirectory, PairingHistory, PairingSink};
pub use venue_assigner::{assign_venues, AssignedVenue, VenueAssignment, VenueError};
