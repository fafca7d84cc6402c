//! Pairing repository: events, matches, guests, invites and venue bookings.
//!
//! Each write is its own statement. A pairing run issues many of them and does not wrap
//! them in a transaction; the guests or invites for one match are inserted together.

use chrono::NaiveDate;
use domain::models::{Invite, Match, MatchGuest, PairingEvent};
use domain::services::{PairingHistory, PairingSink};
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InviteEntity, MatchEntity, MatchGuestEntity, PairingEventEntity};
use crate::errors::store_error;
use crate::metrics::QueryTimer;

/// Repository for pairing-round database operations.
#[derive(Clone)]
pub struct PairingRepository {
    pool: PgPool,
}

impl PairingRepository {
    /// Creates a new PairingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Guest rows of every match of every event of a group.
    pub async fn list_group_match_guests(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<MatchGuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_group_match_guests");
        let result = sqlx::query_as::<_, MatchGuestEntity>(
            r#"
            SELECT mg.match_id, mg.member_id
            FROM match_guests mg
            JOIN matches m ON m.id = mg.match_id
            JOIN pairing_events e ON e.id = m.event_id
            WHERE e.group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a pairing event.
    pub async fn insert_event(
        &self,
        group_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<PairingEventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pairing_event");
        let result = sqlx::query_as::<_, PairingEventEntity>(
            r#"
            INSERT INTO pairing_events (group_id, scheduled_date)
            VALUES ($1, $2)
            RETURNING id, group_id, scheduled_date, created_at
            "#,
        )
        .bind(group_id)
        .bind(scheduled_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a pending match with no venue.
    pub async fn insert_match(&self, event_id: Uuid) -> Result<MatchEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_match");
        let result = sqlx::query_as::<_, MatchEntity>(
            r#"
            INSERT INTO matches (event_id)
            VALUES ($1)
            RETURNING id, event_id, venue_id, status, confirmed_date, confirmed_slot
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert the guest rows of one match.
    pub async fn insert_match_guests(
        &self,
        match_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("create_match_guests");
        let result = sqlx::query(
            r#"
            INSERT INTO match_guests (match_id, member_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(match_id)
        .bind(member_ids)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Insert pending invites for members of one match.
    pub async fn insert_invites(
        &self,
        event_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Vec<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("create_invites");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            INSERT INTO invites (event_id, member_id)
            SELECT $1, UNNEST($2::uuid[])
            RETURNING id, event_id, member_id, status, created_at
            "#,
        )
        .bind(event_id)
        .bind(member_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether another match scheduled on the same date holds the venue.
    ///
    /// Bookings are global across groups: a venue is one physical place.
    pub async fn venue_booked_on(
        &self,
        venue_id: Uuid,
        scheduled_date: NaiveDate,
        excluding_match: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_venue_booked");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM matches m
                JOIN pairing_events e ON e.id = m.event_id
                WHERE m.venue_id = $1
                  AND e.scheduled_date = $2
                  AND m.id <> $3
            )
            "#,
        )
        .bind(venue_id)
        .bind(scheduled_date)
        .bind(excluding_match)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the venue of a match.
    pub async fn set_match_venue(&self, match_id: Uuid, venue_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_match_venue");
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET venue_id = $2
            WHERE id = $1
            "#,
        )
        .bind(match_id)
        .bind(venue_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}

#[async_trait::async_trait]
impl PairingHistory for PairingRepository {
    async fn list_past_match_guests(&self, group_id: Uuid) -> Result<Vec<MatchGuest>, StoreError> {
        let rows = self
            .list_group_match_guests(group_id)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait::async_trait]
impl PairingSink for PairingRepository {
    async fn create_event(
        &self,
        group_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<PairingEvent, StoreError> {
        let entity = self
            .insert_event(group_id, scheduled_date)
            .await
            .map_err(store_error)?;
        Ok(entity.into())
    }

    async fn create_match(&self, event_id: Uuid) -> Result<Match, StoreError> {
        let entity = self.insert_match(event_id).await.map_err(store_error)?;
        Ok(entity.into())
    }

    async fn add_match_guests(&self, match_id: Uuid, member_ids: &[Uuid]) -> Result<(), StoreError> {
        self.insert_match_guests(match_id, member_ids)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn create_invites(
        &self,
        event_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Vec<Invite>, StoreError> {
        let entities = self
            .insert_invites(event_id, member_ids)
            .await
            .map_err(store_error)?;
        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn is_venue_booked(
        &self,
        venue_id: Uuid,
        scheduled_date: NaiveDate,
        excluding_match: Uuid,
    ) -> Result<bool, StoreError> {
        self.venue_booked_on(venue_id, scheduled_date, excluding_match)
            .await
            .map_err(store_error)
    }

    async fn update_match_venue(&self, match_id: Uuid, venue_id: Uuid) -> Result<(), StoreError> {
        let updated = self
            .set_match_venue(match_id, venue_id)
            .await
            .map_err(store_error)?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("match {}", match_id)));
        }
        Ok(())
    }
}
