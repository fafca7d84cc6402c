//! Availability repository: availability sets, invite responses and match confirmation.

use chrono::NaiveDate;
use domain::models::{AvailabilitySlot, InviteStatus, Match, SlotChoice};
use domain::services::AvailabilityStore;
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AvailabilitySlotEntity, InviteStatusDb, MatchEntity, TimeSlotDb};
use crate::errors::store_error;
use crate::metrics::QueryTimer;

/// Repository for availability and confirmation database operations.
#[derive(Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    /// Creates a new AvailabilityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a match by ID.
    pub async fn find_match(&self, match_id: Uuid) -> Result<Option<MatchEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_match_by_id");
        let result = sqlx::query_as::<_, MatchEntity>(
            r#"
            SELECT id, event_id, venue_id, status, confirmed_date, confirmed_slot
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the match a member belongs to within an event.
    pub async fn find_member_match(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<MatchEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_match_for_member");
        let result = sqlx::query_as::<_, MatchEntity>(
            r#"
            SELECT m.id, m.event_id, m.venue_id, m.status, m.confirmed_date, m.confirmed_slot
            FROM matches m
            JOIN match_guests mg ON mg.match_id = m.id
            WHERE m.event_id = $1 AND mg.member_id = $2
            LIMIT 1
            "#,
        )
        .bind(event_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Member IDs of a match's guests.
    pub async fn guest_ids(&self, match_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_match_guests");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT member_id
            FROM match_guests
            WHERE match_id = $1
            ORDER BY member_id
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Invite status of a member for an event.
    pub async fn invite_status(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<InviteStatusDb>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_status");
        let result = sqlx::query_scalar::<_, InviteStatusDb>(
            r#"
            SELECT status
            FROM invites
            WHERE event_id = $1 AND member_id = $2
            "#,
        )
        .bind(event_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a member's invite status. Returns the number of rows changed.
    pub async fn set_invite_status(
        &self,
        event_id: Uuid,
        member_id: Uuid,
        status: InviteStatusDb,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_invite_status");
        let result = sqlx::query(
            r#"
            UPDATE invites
            SET status = $3
            WHERE event_id = $1 AND member_id = $2
            "#,
        )
        .bind(event_id)
        .bind(member_id)
        .bind(status)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Availability rows of a member, scoped to one event or to standing availability.
    pub async fn slots_for(
        &self,
        member_id: Uuid,
        event_id: Option<Uuid>,
    ) -> Result<Vec<AvailabilitySlotEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_availability");
        let result = sqlx::query_as::<_, AvailabilitySlotEntity>(
            r#"
            SELECT member_id, event_id, slot_date, time_slot
            FROM availability_slots
            WHERE member_id = $1 AND event_id IS NOT DISTINCT FROM $2
            ORDER BY slot_date ASC, time_slot ASC
            "#,
        )
        .bind(member_id)
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace a member's availability set in one transaction.
    pub async fn replace_slots(
        &self,
        member_id: Uuid,
        event_id: Option<Uuid>,
        slots: &[SlotChoice],
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("replace_availability");

        let dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
        let time_slots: Vec<String> = slots.iter().map(|s| s.time_slot.to_string()).collect();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM availability_slots
            WHERE member_id = $1 AND event_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(member_id)
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO availability_slots (member_id, event_id, slot_date, time_slot)
            SELECT $1, $2, d, s::time_slot
            FROM UNNEST($3::date[], $4::text[]) AS t(d, s)
            "#,
        )
        .bind(member_id)
        .bind(event_id)
        .bind(dates)
        .bind(time_slots)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(inserted.rows_affected())
    }

    /// Confirm a match if it has no confirmation yet. Returns the number of rows changed.
    pub async fn confirm_match(
        &self,
        match_id: Uuid,
        date: NaiveDate,
        slot: TimeSlotDb,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("confirm_match");
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET status = 'confirmed', confirmed_date = $2, confirmed_slot = $3
            WHERE id = $1 AND confirmed_date IS NULL
            "#,
        )
        .bind(match_id)
        .bind(date)
        .bind(slot)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}

#[async_trait::async_trait]
impl AvailabilityStore for AvailabilityRepository {
    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, StoreError> {
        let entity = self.find_match(match_id).await.map_err(store_error)?;
        Ok(entity.map(Into::into))
    }

    async fn find_match_for_member(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<Match>, StoreError> {
        let entity = self
            .find_member_match(event_id, member_id)
            .await
            .map_err(store_error)?;
        Ok(entity.map(Into::into))
    }

    async fn list_match_guests(&self, match_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        self.guest_ids(match_id).await.map_err(store_error)
    }

    async fn get_invite_status(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<InviteStatus>, StoreError> {
        let status = self
            .invite_status(event_id, member_id)
            .await
            .map_err(store_error)?;
        Ok(status.map(Into::into))
    }

    async fn update_invite_status(
        &self,
        event_id: Uuid,
        member_id: Uuid,
        status: InviteStatus,
    ) -> Result<bool, StoreError> {
        let updated = self
            .set_invite_status(event_id, member_id, status.into())
            .await
            .map_err(store_error)?;
        Ok(updated > 0)
    }

    async fn list_availability(
        &self,
        member_id: Uuid,
        event_id: Option<Uuid>,
    ) -> Result<Vec<AvailabilitySlot>, StoreError> {
        let rows = self
            .slots_for(member_id, event_id)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn replace_availability_slots(
        &self,
        member_id: Uuid,
        event_id: Option<Uuid>,
        slots: &[SlotChoice],
    ) -> Result<(), StoreError> {
        self.replace_slots(member_id, event_id, slots)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_match_confirmation(
        &self,
        match_id: Uuid,
        choice: SlotChoice,
    ) -> Result<bool, StoreError> {
        let updated = self
            .confirm_match(match_id, choice.date, choice.time_slot.into())
            .await
            .map_err(store_error)?;
        if updated > 0 {
            return Ok(true);
        }

        match self.find_match(match_id).await.map_err(store_error)? {
            Some(_) => Ok(false),
            None => Err(StoreError::NotFound(format!("match {}", match_id))),
        }
    }
}
