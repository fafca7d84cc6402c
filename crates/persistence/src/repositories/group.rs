//! Group repository: groups, members and the venue catalog.

use chrono::NaiveDate;
use domain::models::{Group, Member, PairingCadence, Venue};
use domain::services::GroupDirectory;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GroupEntity, MemberEntity, PairingCadenceDb, VenueEntity};
use crate::errors::store_error;
use crate::metrics::QueryTimer;

/// Repository for group-related database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Creates a new GroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new group.
    pub async fn create_group(
        &self,
        name: &str,
        city: &str,
        cadence: PairingCadence,
    ) -> Result<GroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_group");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name, city, cadence)
            VALUES ($1, $2, $3)
            RETURNING id, name, city, cadence, created_at
            "#,
        )
        .bind(name)
        .bind(city)
        .bind(PairingCadenceDb::from(cadence))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, city, cadence, created_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List every group, oldest first.
    pub async fn list_all(&self) -> Result<Vec<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_groups");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, city, cadence, created_at
            FROM groups
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add a member to a group.
    pub async fn add_member(
        &self,
        group_id: Uuid,
        display_name: &str,
    ) -> Result<MemberEntity, sqlx::Error> {
        let timer = QueryTimer::new("add_member");
        let result = sqlx::query_as::<_, MemberEntity>(
            r#"
            INSERT INTO members (group_id, display_name)
            VALUES ($1, $2)
            RETURNING id, group_id, display_name, joined_at
            "#,
        )
        .bind(group_id)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List members of a group in join order.
    pub async fn list_members(&self, group_id: Uuid) -> Result<Vec<MemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_members");
        let result = sqlx::query_as::<_, MemberEntity>(
            r#"
            SELECT id, group_id, display_name, joined_at
            FROM members
            WHERE group_id = $1
            ORDER BY joined_at ASC, id ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add a venue to the catalog.
    pub async fn add_venue(&self, name: &str, city: &str) -> Result<VenueEntity, sqlx::Error> {
        let timer = QueryTimer::new("add_venue");
        let result = sqlx::query_as::<_, VenueEntity>(
            r#"
            INSERT INTO venues (name, city)
            VALUES ($1, $2)
            RETURNING id, name, city
            "#,
        )
        .bind(name)
        .bind(city)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List venues in a city.
    pub async fn list_venues(&self, city: &str) -> Result<Vec<VenueEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_venues_by_city");
        let result = sqlx::query_as::<_, VenueEntity>(
            r#"
            SELECT id, name, city
            FROM venues
            WHERE city = $1
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(city)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Scheduled date of the most recent event of a group.
    pub async fn last_event_date(&self, group_id: Uuid) -> Result<Option<NaiveDate>, sqlx::Error> {
        let timer = QueryTimer::new("last_event_date");
        let result = sqlx::query_scalar::<_, Option<NaiveDate>>(
            r#"
            SELECT MAX(scheduled_date)
            FROM pairing_events
            WHERE group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait::async_trait]
impl GroupDirectory for GroupRepository {
    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, StoreError> {
        let entity = self.find_by_id(group_id).await.map_err(store_error)?;
        Ok(entity.map(Into::into))
    }

    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        let entities = self.list_all().await.map_err(store_error)?;
        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn list_members(&self, group_id: Uuid) -> Result<Vec<Member>, StoreError> {
        let entities = GroupRepository::list_members(self, group_id)
            .await
            .map_err(store_error)?;
        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn list_venues(&self, city: &str) -> Result<Vec<Venue>, StoreError> {
        let entities = GroupRepository::list_venues(self, city)
            .await
            .map_err(store_error)?;
        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn last_event_date(&self, group_id: Uuid) -> Result<Option<NaiveDate>, StoreError> {
        GroupRepository::last_event_date(self, group_id)
            .await
            .map_err(store_error)
    }
}
