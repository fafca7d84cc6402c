//! In-memory implementation of the store traits.
//!
//! Used by unit tests and local dry runs. Any operation can be made to fail with
//! [`InMemoryStore::fail_on`] or [`InMemoryStore::fail_nth`].

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::store::{AvailabilityStore, GroupDirectory, PairingHistory, PairingSink};
use crate::errors::StoreError;
use crate::models::{
    AvailabilitySlot, ConfirmationState, Group, Invite, InviteStatus, Match, MatchGuest, Member,
    PairingCadence, PairingEvent, SlotChoice, Venue,
};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListMembers,
    ListVenues,
    ListPastMatchGuests,
    CreateEvent,
    CreateMatch,
    AddMatchGuests,
    CreateInvites,
    IsVenueBooked,
    UpdateMatchVenue,
    ReplaceAvailability,
    UpdateMatchConfirmation,
}

#[derive(Debug, Default)]
struct State {
    groups: Vec<Group>,
    members: Vec<Member>,
    venues: Vec<Venue>,
    events: Vec<PairingEvent>,
    matches: Vec<Match>,
    guests: Vec<MatchGuest>,
    invites: Vec<Invite>,
    availability: Vec<AvailabilitySlot>,
    failing: HashSet<StoreOp>,
    failing_nth: HashMap<StoreOp, usize>,
    calls: HashMap<StoreOp, usize>,
    confirmation_writes: usize,
}

impl State {
    fn check(&mut self, op: StoreOp) -> Result<(), StoreError> {
        let call = {
            let count = self.calls.entry(op).or_insert(0);
            *count += 1;
            *count
        };
        if self.failing.contains(&op) || self.failing_nth.get(&op) == Some(&call) {
            return Err(StoreError::Database(format!("injected failure on {:?}", op)));
        }
        Ok(())
    }

    fn event_date(&self, event_id: Uuid) -> Option<NaiveDate> {
        self.events
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| e.scheduled_date)
    }

    fn group_events(&self, group_id: Uuid) -> HashSet<Uuid> {
        self.events
            .iter()
            .filter(|e| e.group_id == group_id)
            .map(|e| e.id)
            .collect()
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every call of `op` fail.
    pub fn fail_on(&self, op: StoreOp) {
        self.state().failing.insert(op);
    }

    /// Makes only the `n`th call (1-based) of `op` fail.
    pub fn fail_nth(&self, op: StoreOp, n: usize) {
        self.state().failing_nth.insert(op, n);
    }

    pub fn add_group(&self, name: &str, city: &str, cadence: PairingCadence) -> Uuid {
        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city: city.to_string(),
            cadence,
            created_at: Utc::now(),
        };
        let id = group.id;
        self.state().groups.push(group);
        id
    }

    /// Adds a member; members are listed in insertion order.
    pub fn add_member(&self, group_id: Uuid, display_name: &str) -> Uuid {
        let member = Member {
            id: Uuid::new_v4(),
            group_id,
            display_name: display_name.to_string(),
            joined_at: Utc::now(),
        };
        let id = member.id;
        self.state().members.push(member);
        id
    }

    pub fn add_venue(&self, name: &str, city: &str) -> Venue {
        let venue = Venue {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city: city.to_string(),
        };
        self.state().venues.push(venue.clone());
        venue
    }

    pub fn match_by_id(&self, match_id: Uuid) -> Option<Match> {
        self.state().matches.iter().find(|m| m.id == match_id).cloned()
    }

    pub fn matches_for_event(&self, event_id: Uuid) -> Vec<Match> {
        self.state()
            .matches
            .iter()
            .filter(|m| m.event_id == event_id)
            .cloned()
            .collect()
    }

    pub fn events_for_group(&self, group_id: Uuid) -> Vec<PairingEvent> {
        self.state()
            .events
            .iter()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect()
    }

    pub fn guests_of(&self, match_id: Uuid) -> Vec<Uuid> {
        self.state()
            .guests
            .iter()
            .filter(|g| g.match_id == match_id)
            .map(|g| g.member_id)
            .collect()
    }

    pub fn invites_for_event(&self, event_id: Uuid) -> Vec<Invite> {
        self.state()
            .invites
            .iter()
            .filter(|i| i.event_id == event_id)
            .cloned()
            .collect()
    }

    pub fn availability_of(&self, member_id: Uuid, event_id: Option<Uuid>) -> Vec<AvailabilitySlot> {
        self.state()
            .availability
            .iter()
            .filter(|s| s.member_id == member_id && s.event_id == event_id)
            .cloned()
            .collect()
    }

    /// Number of confirmation writes that actually changed a match.
    pub fn confirmation_writes(&self) -> usize {
        self.state().confirmation_writes
    }

    /// Number of times `op` has been called, failed calls included.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl GroupDirectory for InMemoryStore {
    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, StoreError> {
        Ok(self.state().groups.iter().find(|g| g.id == group_id).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.state().groups.clone())
    }

    async fn list_members(&self, group_id: Uuid) -> Result<Vec<Member>, StoreError> {
        let mut state = self.state();
        state.check(StoreOp::ListMembers)?;
        Ok(state
            .members
            .iter()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn list_venues(&self, city: &str) -> Result<Vec<Venue>, StoreError> {
        let mut state = self.state();
        state.check(StoreOp::ListVenues)?;
        Ok(state.venues.iter().filter(|v| v.city == city).cloned().collect())
    }

    async fn last_event_date(&self, group_id: Uuid) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self
            .state()
            .events
            .iter()
            .filter(|e| e.group_id == group_id)
            .map(|e| e.scheduled_date)
            .max())
    }
}

#[async_trait::async_trait]
impl PairingHistory for InMemoryStore {
    async fn list_past_match_guests(&self, group_id: Uuid) -> Result<Vec<MatchGuest>, StoreError> {
        let mut state = self.state();
        state.check(StoreOp::ListPastMatchGuests)?;
        let events = state.group_events(group_id);
        let matches: HashSet<Uuid> = state
            .matches
            .iter()
            .filter(|m| events.contains(&m.event_id))
            .map(|m| m.id)
            .collect();
        Ok(state
            .guests
            .iter()
            .filter(|g| matches.contains(&g.match_id))
            .copied()
            .collect())
    }
}

#[async_trait::async_trait]
impl PairingSink for InMemoryStore {
    async fn create_event(
        &self,
        group_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<PairingEvent, StoreError> {
        let mut state = self.state();
        state.check(StoreOp::CreateEvent)?;
        let event = PairingEvent {
            id: Uuid::new_v4(),
            group_id,
            scheduled_date,
            created_at: Utc::now(),
        };
        state.events.push(event.clone());
        Ok(event)
    }

    async fn create_match(&self, event_id: Uuid) -> Result<Match, StoreError> {
        let mut state = self.state();
        state.check(StoreOp::CreateMatch)?;
        if state.event_date(event_id).is_none() {
            return Err(StoreError::NotFound(format!("event {}", event_id)));
        }
        let created = Match {
            id: Uuid::new_v4(),
            event_id,
            venue_id: None,
            status: ConfirmationState::Pending,
            confirmed_date: None,
            confirmed_slot: None,
        };
        state.matches.push(created.clone());
        Ok(created)
    }

    async fn add_match_guests(&self, match_id: Uuid, member_ids: &[Uuid]) -> Result<(), StoreError> {
        let mut state = self.state();
        state.check(StoreOp::AddMatchGuests)?;
        for &member_id in member_ids {
            let row = MatchGuest { match_id, member_id };
            if state.guests.contains(&row) {
                return Err(StoreError::Conflict(format!(
                    "member {} already in match {}",
                    member_id, match_id
                )));
            }
            state.guests.push(row);
        }
        Ok(())
    }

    async fn create_invites(
        &self,
        event_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Vec<Invite>, StoreError> {
        let mut state = self.state();
        state.check(StoreOp::CreateInvites)?;
        let mut created = Vec::with_capacity(member_ids.len());
        for &member_id in member_ids {
            if state
                .invites
                .iter()
                .any(|i| i.event_id == event_id && i.member_id == member_id)
            {
                return Err(StoreError::Conflict(format!(
                    "member {} already invited to event {}",
                    member_id, event_id
                )));
            }
            let invite = Invite {
                id: Uuid::new_v4(),
                event_id,
                member_id,
                status: InviteStatus::Pending,
                created_at: Utc::now(),
            };
            state.invites.push(invite.clone());
            created.push(invite);
        }
        Ok(created)
    }

    async fn is_venue_booked(
        &self,
        venue_id: Uuid,
        scheduled_date: NaiveDate,
        excluding_match: Uuid,
    ) -> Result<bool, StoreError> {
        let mut state = self.state();
        state.check(StoreOp::IsVenueBooked)?;
        Ok(state.matches.iter().any(|m| {
            m.id != excluding_match
                && m.venue_id == Some(venue_id)
                && state.event_date(m.event_id) == Some(scheduled_date)
        }))
    }

    async fn update_match_venue(&self, match_id: Uuid, venue_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state();
        state.check(StoreOp::UpdateMatchVenue)?;
        match state.matches.iter_mut().find(|m| m.id == match_id) {
            Some(m) => {
                m.venue_id = Some(venue_id);
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("match {}", match_id))),
        }
    }
}

#[async_trait::async_trait]
impl AvailabilityStore for InMemoryStore {
    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, StoreError> {
        Ok(self.match_by_id(match_id))
    }

    async fn find_match_for_member(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<Match>, StoreError> {
        let state = self.state();
        Ok(state
            .matches
            .iter()
            .filter(|m| m.event_id == event_id)
            .find(|m| {
                state
                    .guests
                    .iter()
                    .any(|g| g.match_id == m.id && g.member_id == member_id)
            })
            .cloned())
    }

    async fn list_match_guests(&self, match_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(self.guests_of(match_id))
    }

    async fn get_invite_status(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<InviteStatus>, StoreError> {
        Ok(self
            .state()
            .invites
            .iter()
            .find(|i| i.event_id == event_id && i.member_id == member_id)
            .map(|i| i.status))
    }

    async fn update_invite_status(
        &self,
        event_id: Uuid,
        member_id: Uuid,
        status: InviteStatus,
    ) -> Result<bool, StoreError> {
        let mut state = self.state();
        match state
            .invites
            .iter_mut()
            .find(|i| i.event_id == event_id && i.member_id == member_id)
        {
            Some(invite) => {
                invite.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_availability(
        &self,
        member_id: Uuid,
        event_id: Option<Uuid>,
    ) -> Result<Vec<AvailabilitySlot>, StoreError> {
        Ok(self.availability_of(member_id, event_id))
    }

    async fn replace_availability_slots(
        &self,
        member_id: Uuid,
        event_id: Option<Uuid>,
        slots: &[SlotChoice],
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.check(StoreOp::ReplaceAvailability)?;
        state
            .availability
            .retain(|s| !(s.member_id == member_id && s.event_id == event_id));
        state
            .availability
            .extend(slots.iter().map(|choice| AvailabilitySlot {
                member_id,
                event_id,
                date: choice.date,
                time_slot: choice.time_slot,
            }));
        Ok(())
    }

    async fn update_match_confirmation(
        &self,
        match_id: Uuid,
        choice: SlotChoice,
    ) -> Result<bool, StoreError> {
        let mut state = self.state();
        state.check(StoreOp::UpdateMatchConfirmation)?;
        let Some(m) = state.matches.iter_mut().find(|m| m.id == match_id) else {
            return Err(StoreError::NotFound(format!("match {}", match_id)));
        };
        if m.confirmed_date.is_some() {
            return Ok(false);
        }
        m.status = ConfirmationState::Confirmed;
        m.confirmed_date = Some(choice.date);
        m.confirmed_slot = Some(choice.time_slot);
        state.confirmation_writes += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSlot;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[tokio::test]
    async fn test_fail_nth_only_fails_that_call() {
        let store = InMemoryStore::new();
        let group = store.add_group("Dumplings", "Seoul", PairingCadence::Monthly);
        store.fail_nth(StoreOp::CreateEvent, 2);

        assert!(store.create_event(group, date(1)).await.is_ok());
        assert!(store.create_event(group, date(2)).await.is_err());
        assert!(store.create_event(group, date(3)).await.is_ok());
        assert_eq!(store.calls(StoreOp::CreateEvent), 3);
    }

    #[tokio::test]
    async fn test_last_event_date_is_latest_scheduled() {
        let store = InMemoryStore::new();
        let group = store.add_group("Dumplings", "Seoul", PairingCadence::Monthly);
        assert_eq!(store.last_event_date(group).await.unwrap(), None);

        store.create_event(group, date(20)).await.unwrap();
        store.create_event(group, date(5)).await.unwrap();
        assert_eq!(store.last_event_date(group).await.unwrap(), Some(date(20)));
    }

    #[tokio::test]
    async fn test_history_is_scoped_to_group() {
        let store = InMemoryStore::new();
        let ours = store.add_group("Ours", "Seoul", PairingCadence::Monthly);
        let theirs = store.add_group("Theirs", "Seoul", PairingCadence::Monthly);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let event = store.create_event(theirs, date(1)).await.unwrap();
        let m = store.create_match(event.id).await.unwrap();
        store.add_match_guests(m.id, &[a, b]).await.unwrap();

        assert!(store.list_past_match_guests(ours).await.unwrap().is_empty());
        assert_eq!(store.list_past_match_guests(theirs).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_guest_is_conflict() {
        let store = InMemoryStore::new();
        let group = store.add_group("Dumplings", "Seoul", PairingCadence::Monthly);
        let event = store.create_event(group, date(1)).await.unwrap();
        let m = store.create_match(event.id).await.unwrap();
        let a = Uuid::new_v4();

        store.add_match_guests(m.id, &[a]).await.unwrap();
        let err = store.add_match_guests(m.id, &[a]).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_confirmation_written_once() {
        let store = InMemoryStore::new();
        let group = store.add_group("Dumplings", "Seoul", PairingCadence::Monthly);
        let event = store.create_event(group, date(1)).await.unwrap();
        let m = store.create_match(event.id).await.unwrap();

        let first = SlotChoice::new(date(3), TimeSlot::Dinner);
        let second = SlotChoice::new(date(2), TimeSlot::Lunch);
        assert!(store.update_match_confirmation(m.id, first).await.unwrap());
        assert!(!store.update_match_confirmation(m.id, second).await.unwrap());

        assert_eq!(store.match_by_id(m.id).unwrap().confirmation(), Some(first));
        assert_eq!(store.confirmation_writes(), 1);
    }
}
