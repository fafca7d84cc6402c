//! Collaborator traits for everything the pairing core reads or writes.
//!
//! The persistence crate implements these against PostgreSQL; [`super::memory_store`]
//! implements all of them in memory for tests and local runs.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{
    AvailabilitySlot, Group, Invite, InviteStatus, Match, MatchGuest, Member, PairingEvent,
    SlotChoice, Venue,
};

/// Read access to groups, their members and the venue catalog.
#[async_trait::async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, StoreError>;

    async fn list_groups(&self) -> Result<Vec<Group>, StoreError>;

    /// Members in join order.
    async fn list_members(&self, group_id: Uuid) -> Result<Vec<Member>, StoreError>;

    async fn list_venues(&self, city: &str) -> Result<Vec<Venue>, StoreError>;

    /// Scheduled date of the group's most recent pairing event.
    async fn last_event_date(&self, group_id: Uuid) -> Result<Option<NaiveDate>, StoreError>;
}

/// Read access to past pairings.
#[async_trait::async_trait]
pub trait PairingHistory: Send + Sync {
    /// Guest rows of every match in every event of the group.
    async fn list_past_match_guests(&self, group_id: Uuid) -> Result<Vec<MatchGuest>, StoreError>;
}

/// Writes performed by a pairing run.
///
/// Each method is a separate write; callers must not assume they share a transaction.
#[async_trait::async_trait]
pub trait PairingSink: Send + Sync {
    async fn create_event(
        &self,
        group_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<PairingEvent, StoreError>;

    async fn create_match(&self, event_id: Uuid) -> Result<Match, StoreError>;

    async fn add_match_guests(&self, match_id: Uuid, member_ids: &[Uuid])
        -> Result<(), StoreError>;

    async fn create_invites(
        &self,
        event_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Vec<Invite>, StoreError>;

    /// True when another match on an event scheduled for `scheduled_date` uses the venue.
    async fn is_venue_booked(
        &self,
        venue_id: Uuid,
        scheduled_date: NaiveDate,
        excluding_match: Uuid,
    ) -> Result<bool, StoreError>;

    async fn update_match_venue(&self, match_id: Uuid, venue_id: Uuid) -> Result<(), StoreError>;
}

/// Reads and writes used by availability matching.
#[async_trait::async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, StoreError>;

    /// The match a member belongs to within one event.
    async fn find_match_for_member(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<Match>, StoreError>;

    async fn list_match_guests(&self, match_id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    async fn get_invite_status(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<InviteStatus>, StoreError>;

    /// Returns false when the member has no invite for the event.
    async fn update_invite_status(
        &self,
        event_id: Uuid,
        member_id: Uuid,
        status: InviteStatus,
    ) -> Result<bool, StoreError>;

    async fn list_availability(
        &self,
        member_id: Uuid,
        event_id: Option<Uuid>,
    ) -> Result<Vec<AvailabilitySlot>, StoreError>;

    /// Deletes the member's set for `event_id` and inserts `slots` in its place.
    async fn replace_availability_slots(
        &self,
        member_id: Uuid,
        event_id: Option<Uuid>,
        slots: &[SlotChoice],
    ) -> Result<(), StoreError>;

    /// Writes the confirmation only if the match has none yet.
    ///
    /// Returns true when this call performed the write.
    async fn update_match_confirmation(
        &self,
        match_id: Uuid,
        choice: SlotChoice,
    ) -> Result<bool, StoreError>;
}
