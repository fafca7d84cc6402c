//! Member domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member of a dinner group.
///
/// Only `id` matters to the pairing algorithms; the display name may change freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Member {
    pub id: Uuid,
    pub group_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}
