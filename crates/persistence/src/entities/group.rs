//! Group entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Group, PairingCadence};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for pairing_cadence that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "pairing_cadence", rename_all = "lowercase")]
pub enum PairingCadenceDb {
    Biweekly,
    Monthly,
    Quarterly,
}

impl From<PairingCadenceDb> for PairingCadence {
    fn from(db: PairingCadenceDb) -> Self {
        match db {
            PairingCadenceDb::Biweekly => PairingCadence::Biweekly,
            PairingCadenceDb::Monthly => PairingCadence::Monthly,
            PairingCadenceDb::Quarterly => PairingCadence::Quarterly,
        }
    }
}

impl From<PairingCadence> for PairingCadenceDb {
    fn from(cadence: PairingCadence) -> Self {
        match cadence {
            PairingCadence::Biweekly => PairingCadenceDb::Biweekly,
            PairingCadence::Monthly => PairingCadenceDb::Monthly,
            PairingCadence::Quarterly => PairingCadenceDb::Quarterly,
        }
    }
}

/// Database row mapping for the groups table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupEntity {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub cadence: PairingCadenceDb,
    pub created_at: DateTime<Utc>,
}

impl From<GroupEntity> for Group {
    fn from(entity: GroupEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            city: entity.city,
            cadence: entity.cadence.into(),
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_entity_to_domain() {
        let entity = GroupEntity {
            id: Uuid::new_v4(),
            name: "Thursday Ramen".to_string(),
            city: "Osaka".to_string(),
            cadence: PairingCadenceDb::Quarterly,
            created_at: Utc::now(),
        };

        let group: Group = entity.clone().into();
        assert_eq!(group.id, entity.id);
        assert_eq!(group.city, "Osaka");
        assert_eq!(group.cadence, PairingCadence::Quarterly);
    }

    #[test]
    fn test_cadence_conversion() {
        assert_eq!(
            PairingCadenceDb::from(PairingCadence::Biweekly),
            PairingCadenceDb::Biweekly
        );
        assert_eq!(
            PairingCadence::from(PairingCadenceDb::Monthly),
            PairingCadence::Monthly
        );
    }
}
