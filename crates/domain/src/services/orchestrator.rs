//! Runs one pairing round for a group, end to end.
//!
//! Writes happen in a fixed order: the event, then for each pair group its match, guest
//! rows and invites, then venues for every match that was created. Writes are not
//! transactional. A failed write is recorded in [`PairingRunOutcome::failures`] and the
//! rest of the batch continues; nothing already written is rolled back.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::history_index::HistoryIndex;
use super::pairing_generator::generate;
use super::store::{GroupDirectory, PairingHistory, PairingSink};
use super::venue_assigner::{assign_venues, VenueAssignment};
use crate::errors::{PairingError, PersistenceFailure, RecordKind};
use crate::models::{Group, PairingEvent};

/// A match whose row and guest rows were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMatch {
    /// Position of the pair group in the generated plan.
    pub pair_index: usize,
    pub match_id: Uuid,
    pub members: Vec<Uuid>,
    /// False when invite creation failed for this match.
    pub invited: bool,
}

/// What a pairing run committed.
#[derive(Debug, Clone)]
pub struct PairingRunOutcome {
    pub event: PairingEvent,
    pub matches: Vec<PersistedMatch>,
    /// Members the generator could not place this round.
    pub unplaced: Vec<Uuid>,
    /// `None` when venue assignment did not run.
    pub venues: Option<VenueAssignment>,
    /// Why venue assignment did not run, if it was attempted.
    pub venue_error: Option<String>,
    pub failures: Vec<PersistenceFailure>,
}

impl PairingRunOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts recorded write failures into [`PairingError::PartialPersistenceFailure`].
    pub fn ensure_complete(self) -> Result<Self, PairingError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(PairingError::PartialPersistenceFailure {
                failures: self.failures,
            })
        }
    }
}

/// Coordinates history, generation, persistence and venue assignment.
#[derive(Clone)]
pub struct PairingOrchestrator {
    directory: Arc<dyn GroupDirectory>,
    history: Arc<dyn PairingHistory>,
    sink: Arc<dyn PairingSink>,
}

impl PairingOrchestrator {
    pub fn new(
        directory: Arc<dyn GroupDirectory>,
        history: Arc<dyn PairingHistory>,
        sink: Arc<dyn PairingSink>,
    ) -> Self {
        Self {
            directory,
            history,
            sink,
        }
    }

    /// Looks up the group and runs a round for it.
    pub async fn run_for_group<R>(
        &self,
        group_id: Uuid,
        scheduled_date: NaiveDate,
        rng: &mut R,
    ) -> Result<PairingRunOutcome, PairingError>
    where
        R: Rng + ?Sized,
    {
        let group = self
            .directory
            .get_group(group_id)
            .await
            .map_err(PairingError::upstream("load group"))?
            .ok_or(PairingError::GroupNotFound(group_id))?;

        self.run(&group, scheduled_date, rng).await
    }

    /// Runs a pairing round for `group` on `scheduled_date`.
    ///
    /// Nothing is written when the group has fewer than two members. A round where nobody
    /// could be paired still records its event, which restarts the group's cadence. A missing venue
    /// catalog is reported in [`PairingRunOutcome::venue_error`] and does not fail the run.
    #[instrument(skip(self, group, rng), fields(group_id = %group.id))]
    pub async fn run<R>(
        &self,
        group: &Group,
        scheduled_date: NaiveDate,
        rng: &mut R,
    ) -> Result<PairingRunOutcome, PairingError>
    where
        R: Rng + ?Sized,
    {
        let members = self
            .directory
            .list_members(group.id)
            .await
            .map_err(PairingError::upstream("list members"))?;

        let past = self
            .history
            .list_past_match_guests(group.id)
            .await
            .map_err(PairingError::upstream("load pairing history"))?;

        let index = HistoryIndex::from_guests(&past);
        let member_ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
        let plan = generate(&member_ids, &index)?;

        let event = self
            .sink
            .create_event(group.id, scheduled_date)
            .await
            .map_err(|e| PairingError::PartialPersistenceFailure {
                failures: vec![PersistenceFailure {
                    record: RecordKind::Event,
                    pair_index: None,
                    message: e.to_string(),
                }],
            })?;

        let mut failures = Vec::new();
        let mut matches = Vec::with_capacity(plan.groups.len());

        for (index, pair) in plan.groups.iter().enumerate() {
            let mut fail = |record: RecordKind, message: String| {
                warn!(event_id = %event.id, pair_index = index, record = %record, error = %message, "Pairing write failed");
                failures.push(PersistenceFailure {
                    record,
                    pair_index: Some(index),
                    message,
                });
            };

            let created = match self.sink.create_match(event.id).await {
                Ok(created) => created,
                Err(e) => {
                    fail(RecordKind::Match, e.to_string());
                    continue;
                }
            };

            if let Err(e) = self.sink.add_match_guests(created.id, pair.members()).await {
                fail(RecordKind::MatchGuests, e.to_string());
                continue;
            }

            let invited = match self.sink.create_invites(event.id, pair.members()).await {
                Ok(_) => true,
                Err(e) => {
                    fail(RecordKind::Invites, e.to_string());
                    false
                }
            };

            matches.push(PersistedMatch {
                pair_index: index,
                match_id: created.id,
                members: pair.members().to_vec(),
                invited,
            });
        }

        let mut venues = None;
        let mut venue_error = None;

        if !matches.is_empty() {
            let match_ids: Vec<Uuid> = matches.iter().map(|m| m.match_id).collect();
            let assigned = match self.directory.list_venues(&group.city).await {
                Ok(pool) => {
                    assign_venues(
                        self.sink.as_ref(),
                        &match_ids,
                        scheduled_date,
                        &group.city,
                        pool,
                        rng,
                    )
                    .await
                }
                Err(e) => Err(PairingError::upstream("list venues")(e)),
            };

            match assigned {
                Ok(assignment) => {
                    failures.extend(assignment.errors.iter().map(|err| PersistenceFailure {
                        record: RecordKind::Venue,
                        pair_index: matches
                            .iter()
                            .find(|m| m.match_id == err.match_id)
                            .map(|m| m.pair_index),
                        message: err.message.clone(),
                    }));
                    venues = Some(assignment);
                }
                Err(e) => {
                    warn!(event_id = %event.id, city = %group.city, error = %e, "Venue assignment skipped");
                    venue_error = Some(e.to_string());
                }
            }
        }

        info!(
            event_id = %event.id,
            scheduled_date = %scheduled_date,
            matches = matches.len(),
            unplaced = plan.unplaced.len(),
            failures = failures.len(),
            reused_any_venue = venues.as_ref().map(|v| v.reused_any_venue).unwrap_or(false),
            "Pairing round created"
        );

        Ok(PairingRunOutcome {
            event,
            matches,
            unplaced: plan.unplaced,
            venues,
            venue_error,
            failures,
        })
    }
}
