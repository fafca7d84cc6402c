//! Venue entity (database row mapping).

use domain::models::Venue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the venues table.
#[derive(Debug, Clone, FromRow)]
pub struct VenueEntity {
    pub id: Uuid,
    pub name: String,
    pub city: String,
}

impl From<VenueEntity> for Venue {
    fn from(entity: VenueEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            city: entity.city,
        }
    }
}
