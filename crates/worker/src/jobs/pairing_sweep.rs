//! Periodic sweep that starts a pairing round for every group that is due.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use domain::services::{should_generate_pairings, GroupDirectory, PairingOrchestrator};
use domain::PairingError;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::scheduler::{Job, JobFrequency};

/// Counts from one sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub groups: usize,
    pub created: usize,
    /// Groups that were not due, or that the owner must fix (too few members).
    pub skipped: usize,
    pub failed: Vec<(Uuid, String)>,
}

/// Job that runs [`PairingOrchestrator`] for each group whose cadence has elapsed.
pub struct PairingSweepJob {
    directory: Arc<dyn GroupDirectory>,
    orchestrator: PairingOrchestrator,
    rng: Mutex<StdRng>,
    interval_minutes: u64,
    lead_days: i64,
}

impl PairingSweepJob {
    pub fn new(
        directory: Arc<dyn GroupDirectory>,
        orchestrator: PairingOrchestrator,
        rng: StdRng,
        interval_minutes: u64,
        lead_days: i64,
    ) -> Self {
        Self {
            directory,
            orchestrator,
            rng: Mutex::new(rng),
            interval_minutes,
            lead_days,
        }
    }

    /// Runs one sweep as of `today`. One group's failure does not stop the others.
    pub async fn sweep(&self, today: NaiveDate) -> Result<SweepReport, PairingError> {
        let groups = self
            .directory
            .list_groups()
            .await
            .map_err(PairingError::upstream("list groups"))?;

        let scheduled_date = today + Duration::days(self.lead_days);
        let mut report = SweepReport {
            groups: groups.len(),
            ..SweepReport::default()
        };

        for group in groups {
            let last = match self.directory.last_event_date(group.id).await {
                Ok(last) => last,
                Err(e) => {
                    error!(group_id = %group.id, error = %e, "Failed to load last event date");
                    report.failed.push((group.id, e.to_string()));
                    continue;
                }
            };

            if !should_generate_pairings(last, group.cadence, today) {
                report.skipped += 1;
                continue;
            }

            let mut rng = self.rng.lock().await;
            match self.orchestrator.run(&group, scheduled_date, &mut *rng).await {
                Ok(outcome) => {
                    if !outcome.is_complete() {
                        warn!(
                            group_id = %group.id,
                            event_id = %outcome.event.id,
                            failures = outcome.failures.len(),
                            "Pairing round persisted partially"
                        );
                    }
                    report.created += 1;
                }
                Err(e) if e.is_user_correctable() => {
                    warn!(group_id = %group.id, reason = %e, "Group skipped");
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(group_id = %group.id, error = %e, "Pairing round failed");
                    report.failed.push((group.id, e.to_string()));
                }
            }
        }

        info!(
            groups = report.groups,
            created = report.created,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Pairing sweep finished"
        );

        Ok(report)
    }
}

#[async_trait::async_trait]
impl Job for PairingSweepJob {
    fn name(&self) -> &'static str {
        "pairing_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let report = self
            .sweep(Utc::now().date_naive())
            .await
            .map_err(|e| e.to_string())?;

        if report.failed.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "{} of {} groups failed",
                report.failed.len(),
                report.groups
            ))
        }
    }
}
