//! Wires repositories, the orchestrator and jobs into a scheduler.

use std::sync::Arc;

use domain::services::PairingOrchestrator;
use persistence::{GroupRepository, PairingRepository};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::PgPool;

use crate::config::Config;
use crate::jobs::{JobScheduler, PairingSweepJob, PoolMetricsJob};

/// Builds the orchestrator against PostgreSQL repositories.
pub fn create_orchestrator(pool: &PgPool) -> PairingOrchestrator {
    let groups = Arc::new(GroupRepository::new(pool.clone()));
    let pairings = Arc::new(PairingRepository::new(pool.clone()));
    PairingOrchestrator::new(groups, pairings.clone(), pairings)
}

/// RNG for the venue shuffle: seeded when configured, OS entropy otherwise.
pub fn pairing_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Builds a scheduler with every job the configuration enables.
pub fn create_scheduler(config: &Config, pool: PgPool) -> JobScheduler {
    let mut scheduler = JobScheduler::new();

    scheduler.register(PairingSweepJob::new(
        Arc::new(GroupRepository::new(pool.clone())),
        create_orchestrator(&pool),
        pairing_rng(config.pairing.rng_seed),
        config.scheduler.sweep_interval_minutes,
        config.pairing.schedule_lead_days,
    ));

    if config.metrics.enabled {
        scheduler.register(PoolMetricsJob::new(pool));
    }

    scheduler
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_pairing_rng_is_repeatable() {
        let mut first = pairing_rng(Some(42));
        let mut second = pairing_rng(Some(42));
        for _ in 0..8 {
            assert_eq!(first.gen::<u64>(), second.gen::<u64>());
        }
    }
}
