//! Background job scheduler and job implementations.

mod pairing_sweep;
mod pool_metrics;
mod scheduler;

pub use pairing_sweep::{PairingSweepJob, SweepReport};
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
