//! Availability domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Maximum number of (date, slot) entries accepted in one save.
pub const MAX_AVAILABILITY_ENTRIES: usize = 120;

/// Part of the day a dinner can happen in.
///
/// Variants are declared in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Breakfast,
    Lunch,
    Dinner,
    LateNight,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Breakfast,
        TimeSlot::Lunch,
        TimeSlot::Dinner,
        TimeSlot::LateNight,
    ];

    /// Fixed ordering used to pick the earliest overlap within a day.
    pub fn rank(&self) -> u8 {
        match self {
            TimeSlot::Breakfast => 0,
            TimeSlot::Lunch => 1,
            TimeSlot::Dinner => 2,
            TimeSlot::LateNight => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Breakfast => "breakfast",
            TimeSlot::Lunch => "lunch",
            TimeSlot::Dinner => "dinner",
            TimeSlot::LateNight => "late_night",
        }
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(TimeSlot::Breakfast),
            "lunch" => Ok(TimeSlot::Lunch),
            "dinner" => Ok(TimeSlot::Dinner),
            "late_night" => Ok(TimeSlot::LateNight),
            _ => Err(format!("Invalid time slot: {}", s)),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single (date, time slot) token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SlotChoice {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
}

impl SlotChoice {
    pub fn new(date: NaiveDate, time_slot: TimeSlot) -> Self {
        Self { date, time_slot }
    }

    /// Sort key: date ascending, then slot rank ascending.
    pub fn sort_key(&self) -> (NaiveDate, u8) {
        (self.date, self.time_slot.rank())
    }
}

impl fmt::Display for SlotChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.time_slot)
    }
}

/// A stored availability row.
///
/// `event_id = None` marks standing availability that is not tied to a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AvailabilitySlot {
    pub member_id: Uuid,
    pub event_id: Option<Uuid>,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
}

impl AvailabilitySlot {
    pub fn choice(&self) -> SlotChoice {
        SlotChoice::new(self.date, self.time_slot)
    }
}

/// Request payload for replacing a member's availability set.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SaveAvailabilityRequest {
    pub event_id: Option<Uuid>,

    #[validate(length(max = 120, message = "entries must contain at most 120 items"))]
    #[validate(nested)]
    pub entries: Vec<AvailabilityEntry>,
}

/// One entry of a [`SaveAvailabilityRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AvailabilityEntry {
    #[validate(custom(function = "shared::validation::validate_date_token"))]
    pub date: String,
    pub time_slot: TimeSlot,
}

impl AvailabilityEntry {
    /// Converts the entry into a slot token. Call after `validate()`.
    pub fn to_choice(&self) -> Result<SlotChoice, validator::ValidationError> {
        let date = shared::validation::parse_date_token(&self.date)?;
        Ok(SlotChoice::new(date, self.time_slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, time_slot: TimeSlot) -> AvailabilityEntry {
        AvailabilityEntry {
            date: date.to_string(),
            time_slot,
        }
    }

    #[test]
    fn test_time_slot_rank_order() {
        let ranks: Vec<u8> = TimeSlot::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert!(TimeSlot::Breakfast < TimeSlot::LateNight);
    }

    #[test]
    fn test_time_slot_parse_and_display() {
        assert_eq!("late_night".parse::<TimeSlot>().unwrap(), TimeSlot::LateNight);
        assert_eq!(TimeSlot::LateNight.to_string(), "late_night");
        assert!("brunch".parse::<TimeSlot>().is_err());
    }

    #[test]
    fn test_time_slot_serde_uses_snake_case() {
        let json = serde_json::to_string(&TimeSlot::LateNight).unwrap();
        assert_eq!(json, "\"late_night\"");
    }

    #[test]
    fn test_slot_choice_sort_key_orders_by_date_then_rank() {
        let d1 = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let mut choices = vec![
            SlotChoice::new(d2, TimeSlot::Breakfast),
            SlotChoice::new(d1, TimeSlot::LateNight),
            SlotChoice::new(d1, TimeSlot::Lunch),
        ];
        choices.sort_by_key(|c| c.sort_key());
        assert_eq!(
            choices,
            vec![
                SlotChoice::new(d1, TimeSlot::Lunch),
                SlotChoice::new(d1, TimeSlot::LateNight),
                SlotChoice::new(d2, TimeSlot::Breakfast),
            ]
        );
    }

    #[test]
    fn test_save_request_validation() {
        let valid = SaveAvailabilityRequest {
            event_id: None,
            entries: vec![entry("2025-07-04", TimeSlot::Dinner)],
        };
        assert!(valid.validate().is_ok());

        let bad_date = SaveAvailabilityRequest {
            event_id: None,
            entries: vec![entry("07/04/2025", TimeSlot::Dinner)],
        };
        assert!(bad_date.validate().is_err());

        let too_many = SaveAvailabilityRequest {
            event_id: None,
            entries: (0..=MAX_AVAILABILITY_ENTRIES)
                .map(|_| entry("2025-07-04", TimeSlot::Dinner))
                .collect(),
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_entry_to_choice() {
        let choice = entry("2025-07-04", TimeSlot::Dinner).to_choice().unwrap();
        assert_eq!(choice.date, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
        assert_eq!(choice.to_string(), "2025-07-04 dinner");
    }
}
