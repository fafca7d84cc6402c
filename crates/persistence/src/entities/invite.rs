//! Invite entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Invite, InviteStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invite_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
pub enum InviteStatusDb {
    Pending,
    Accepted,
    Declined,
}

impl From<InviteStatusDb> for InviteStatus {
    fn from(db: InviteStatusDb) -> Self {
        match db {
            InviteStatusDb::Pending => InviteStatus::Pending,
            InviteStatusDb::Accepted => InviteStatus::Accepted,
            InviteStatusDb::Declined => InviteStatus::Declined,
        }
    }
}

impl From<InviteStatus> for InviteStatusDb {
    fn from(status: InviteStatus) -> Self {
        match status {
            InviteStatus::Pending => InviteStatusDb::Pending,
            InviteStatus::Accepted => InviteStatusDb::Accepted,
            InviteStatus::Declined => InviteStatusDb::Declined,
        }
    }
}

/// Database row mapping for the invites table.
#[derive(Debug, Clone, FromRow)]
pub struct InviteEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub member_id: Uuid,
    pub status: InviteStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<InviteEntity> for Invite {
    fn from(entity: InviteEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            member_id: entity.member_id,
            status: entity.status.into(),
            created_at: entity.created_at,
        }
    }
}
