//! Venue domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A restaurant from the external venue catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub city: String,
}
