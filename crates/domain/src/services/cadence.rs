//! Cadence gate for starting a new pairing round.

use chrono::NaiveDate;

use crate::models::PairingCadence;

/// Returns true when a group is due for a new round on `today`.
///
/// A group that has never been paired is always due. Otherwise the number of whole days
/// since the last event must reach the cadence threshold.
pub fn should_generate_pairings(
    last_event_date: Option<NaiveDate>,
    cadence: PairingCadence,
    today: NaiveDate,
) -> bool {
    match last_event_date {
        None => true,
        Some(last) => (today - last).num_days() >= cadence.threshold_days(),
    }
}
