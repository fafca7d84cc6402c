//! Availability entity (database row mapping).

use chrono::NaiveDate;
use domain::models::{AvailabilitySlot, TimeSlot};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for time_slot that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "time_slot", rename_all = "snake_case")]
pub enum TimeSlotDb {
    Breakfast,
    Lunch,
    Dinner,
    LateNight,
}

impl From<TimeSlotDb> for TimeSlot {
    fn from(db: TimeSlotDb) -> Self {
        match db {
            TimeSlotDb::Breakfast => TimeSlot::Breakfast,
            TimeSlotDb::Lunch => TimeSlot::Lunch,
            TimeSlotDb::Dinner => TimeSlot::Dinner,
            TimeSlotDb::LateNight => TimeSlot::LateNight,
        }
    }
}

impl From<TimeSlot> for TimeSlotDb {
    fn from(slot: TimeSlot) -> Self {
        match slot {
            TimeSlot::Breakfast => TimeSlotDb::Breakfast,
            TimeSlot::Lunch => TimeSlotDb::Lunch,
            TimeSlot::Dinner => TimeSlotDb::Dinner,
            TimeSlot::LateNight => TimeSlotDb::LateNight,
        }
    }
}

/// Database row mapping for the availability_slots table.
#[derive(Debug, Clone, FromRow)]
pub struct AvailabilitySlotEntity {
    pub member_id: Uuid,
    pub event_id: Option<Uuid>,
    pub slot_date: NaiveDate,
    pub time_slot: TimeSlotDb,
}

impl From<AvailabilitySlotEntity> for AvailabilitySlot {
    fn from(entity: AvailabilitySlotEntity) -> Self {
        Self {
            member_id: entity.member_id,
            event_id: entity.event_id,
            date: entity.slot_date,
            time_slot: entity.time_slot.into(),
        }
    }
}
