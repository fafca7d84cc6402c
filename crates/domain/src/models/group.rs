//! Group domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How often a group runs a pairing round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingCadence {
    Biweekly,
    Monthly,
    Quarterly,
}

impl PairingCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingCadence::Biweekly => "biweekly",
            PairingCadence::Monthly => "monthly",
            PairingCadence::Quarterly => "quarterly",
        }
    }

    /// Minimum number of days between two pairing rounds.
    pub fn threshold_days(&self) -> i64 {
        match self {
            PairingCadence::Biweekly => 14,
            PairingCadence::Monthly => 30,
            PairingCadence::Quarterly => 90,
        }
    }
}

impl FromStr for PairingCadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "biweekly" => Ok(PairingCadence::Biweekly),
            "monthly" => Ok(PairingCadence::Monthly),
            "quarterly" => Ok(PairingCadence::Quarterly),
            _ => Err(format!("Invalid pairing cadence: {}", s)),
        }
    }
}

impl fmt::Display for PairingCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dinner group. Venues are drawn from the group's city.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub cadence: PairingCadence,
    pub created_at: DateTime<Utc>,
}
