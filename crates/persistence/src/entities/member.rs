//! Member entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Member;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the members table.
#[derive(Debug, Clone, FromRow)]
pub struct MemberEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<MemberEntity> for Member {
    fn from(entity: MemberEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            display_name: entity.display_name,
            joined_at: entity.joined_at,
        }
    }
}
