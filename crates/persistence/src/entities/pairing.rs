//! Pairing event, match and match guest entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{ConfirmationState, Match, MatchGuest, PairingEvent};
use sqlx::FromRow;
use uuid::Uuid;

use super::availability::TimeSlotDb;

/// Database enum for match_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
pub enum MatchStatusDb {
    Pending,
    Confirmed,
}

impl From<MatchStatusDb> for ConfirmationState {
    fn from(db: MatchStatusDb) -> Self {
        match db {
            MatchStatusDb::Pending => ConfirmationState::Pending,
            MatchStatusDb::Confirmed => ConfirmationState::Confirmed,
        }
    }
}

/// Database row mapping for the pairing_events table.
#[derive(Debug, Clone, FromRow)]
pub struct PairingEventEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<PairingEventEntity> for PairingEvent {
    fn from(entity: PairingEventEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            scheduled_date: entity.scheduled_date,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the matches table.
#[derive(Debug, Clone, FromRow)]
pub struct MatchEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub venue_id: Option<Uuid>,
    pub status: MatchStatusDb,
    pub confirmed_date: Option<NaiveDate>,
    pub confirmed_slot: Option<TimeSlotDb>,
}

impl From<MatchEntity> for Match {
    fn from(entity: MatchEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            venue_id: entity.venue_id,
            status: entity.status.into(),
            confirmed_date: entity.confirmed_date,
            confirmed_slot: entity.confirmed_slot.map(Into::into),
        }
    }
}

/// Database row mapping for the match_guests table.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct MatchGuestEntity {
    pub match_id: Uuid,
    pub member_id: Uuid,
}

impl From<MatchGuestEntity> for MatchGuest {
    fn from(entity: MatchGuestEntity) -> Self {
        Self {
            match_id: entity.match_id,
            member_id: entity.member_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{SlotChoice, TimeSlot};

    #[test]
    fn test_confirmed_match_entity_to_domain() {
        let entity = MatchEntity {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            venue_id: Some(Uuid::new_v4()),
            status: MatchStatusDb::Confirmed,
            confirmed_date: NaiveDate::from_ymd_opt(2025, 6, 2),
            confirmed_slot: Some(TimeSlotDb::Dinner),
        };

        let m: Match = entity.clone().into();
        assert_eq!(m.status, ConfirmationState::Confirmed);
        assert_eq!(m.venue_id, entity.venue_id);
        assert_eq!(
            m.confirmation(),
            Some(SlotChoice::new(
                NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                TimeSlot::Dinner
            ))
        );
    }

    #[test]
    fn test_pending_match_has_no_confirmation() {
        let entity = MatchEntity {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            venue_id: None,
            status: MatchStatusDb::Pending,
            confirmed_date: None,
            confirmed_slot: None,
        };

        let m: Match = entity.into();
        assert_eq!(m.confirmation(), None);
    }
}
