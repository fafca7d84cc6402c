//! Pairing round models: events, matches and their guests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::availability::{SlotChoice, TimeSlot};

/// One scheduling round for a group. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PairingEvent {
    pub id: Uuid,
    pub group_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Stored status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationState {
    Pending,
    Confirmed,
}

impl ConfirmationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationState::Pending => "pending",
            ConfirmationState::Confirmed => "confirmed",
        }
    }
}

impl FromStr for ConfirmationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ConfirmationState::Pending),
            "confirmed" => Ok(ConfirmationState::Confirmed),
            _ => Err(format!("Invalid match status: {}", s)),
        }
    }
}

impl fmt::Display for ConfirmationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One dinner within an event, shared by two or three guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Match {
    pub id: Uuid,
    pub event_id: Uuid,
    pub venue_id: Option<Uuid>,
    pub status: ConfirmationState,
    pub confirmed_date: Option<NaiveDate>,
    pub confirmed_slot: Option<TimeSlot>,
}

impl Match {
    /// The persisted confirmation, if both halves are present.
    pub fn confirmation(&self) -> Option<SlotChoice> {
        match (self.confirmed_date, self.confirmed_slot) {
            (Some(date), Some(slot)) => Some(SlotChoice::new(date, slot)),
            _ => None,
        }
    }
}

/// Join row between a match and one of its guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchGuest {
    pub match_id: Uuid,
    pub member_id: Uuid,
}
