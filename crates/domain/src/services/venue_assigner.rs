//! Venue assignment for a batch of matches sharing one scheduled date.
//!
//! The venue pool is shuffled once per batch. Each match then takes the first venue in
//! shuffled order that no other match already holds on the same date. When every venue
//! is taken the match falls back to the first shuffled venue and the batch is flagged as
//! reusing a venue. Venue collisions are tolerated rather than solved optimally.

use chrono::NaiveDate;
use serde::Serialize;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

use super::store::PairingSink;
use crate::errors::PairingError;
use crate::models::Venue;

/// A venue chosen for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignedVenue {
    pub match_id: Uuid,
    pub venue_id: Uuid,
    /// True when the venue was already booked on this date.
    pub reused: bool,
}

/// Outcome of assigning venues to a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VenueAssignment {
    /// Committed assignments in match order.
    pub assignments: Vec<AssignedVenue>,
    pub reused_any_venue: bool,
    /// One entry per match whose assignment failed.
    pub errors: Vec<VenueError>,
}

/// A match whose venue could not be looked up or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueError {
    pub match_id: Uuid,
    pub message: String,
}

impl VenueAssignment {
    pub fn venue_for(&self, match_id: Uuid) -> Option<Uuid> {
        self.assignments
            .iter()
            .find(|a| a.match_id == match_id)
            .map(|a| a.venue_id)
    }
}

/// Assigns venues to `match_ids` in order, checking conflicts against persisted state.
///
/// Fails with [`PairingError::NoVenuesInCity`] when `venues` is empty. Store failures for a
/// single match are collected in [`VenueAssignment::errors`] and do not stop the batch.
pub async fn assign_venues<R>(
    sink: &dyn PairingSink,
    match_ids: &[Uuid],
    scheduled_date: NaiveDate,
    city: &str,
    mut venues: Vec<Venue>,
    rng: &mut R,
) -> Result<VenueAssignment, PairingError>
where
    R: Rng + ?Sized,
{
    if venues.is_empty() {
        return Err(PairingError::NoVenuesInCity {
            city: city.to_string(),
        });
    }

    venues.shuffle(rng);

    let mut outcome = VenueAssignment::default();

    for &match_id in match_ids {
        let mut chosen = None;
        let mut lookup_error = None;

        for (index, venue) in venues.iter().enumerate() {
            match sink
                .is_venue_booked(venue.id, scheduled_date, match_id)
                .await
            {
                Ok(false) => {
                    chosen = Some((index, false));
                    break;
                }
                Ok(true) => continue,
                Err(e) => {
                    lookup_error = Some(e);
                    break;
                }
            }
        }

        if let Some(e) = lookup_error {
            warn!(match_id = %match_id, error = %e, "Venue conflict check failed");
            outcome.errors.push(VenueError {
                match_id,
                message: format!("venue lookup failed: {}", e),
            });
            continue;
        }

        let (index, reused) = chosen.unwrap_or((0, true));
        let venue = &venues[index];

        match sink.update_match_venue(match_id, venue.id).await {
            Ok(()) => {
                debug!(
                    match_id = %match_id,
                    venue_id = %venue.id,
                    reused,
                    "Venue assigned"
                );
                outcome.reused_any_venue |= reused;
                outcome.assignments.push(AssignedVenue {
                    match_id,
                    venue_id: venue.id,
                    reused,
                });
            }
            Err(e) => {
                warn!(match_id = %match_id, venue_id = %venue.id, error = %e, "Venue update failed");
                outcome.errors.push(VenueError {
                    match_id,
                    message: format!("venue update failed: {}", e),
                });
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_store::{InMemoryStore, StoreOp};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn venue(name: &str) -> Venue {
        Venue {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city: "Porto".to_string(),
        }
    }

    async fn matches_on(store: &InMemoryStore, day: u32, count: usize) -> Vec<Uuid> {
        let group = store.add_group("Supper Club", "Porto", crate::models::PairingCadence::Monthly);
        let event = store.create_event(group, date(day)).await.unwrap();
        let mut ids = Vec::new();
        for _ in 0..count {
            ids.push(store.create_match(event.id).await.unwrap().id);
        }
        ids
    }

    #[tokio::test]
    async fn test_empty_pool_fails() {
        let store = InMemoryStore::new();
        let ids = matches_on(&store, 4, 1).await;
        let err = assign_venues(&store, &ids, date(4), "Porto", vec![], &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PairingError::NoVenuesInCity { ref city } if city == "Porto"));
    }

    #[tokio::test]
    async fn test_distinct_venues_when_pool_is_large_enough() {
        let store = InMemoryStore::new();
        let ids = matches_on(&store, 4, 3).await;
        let venues = vec![venue("A"), venue("B"), venue("C"), venue("D")];

        let outcome = assign_venues(&store, &ids, date(4), "Porto", venues, &mut StdRng::seed_from_u64(9))
            .await
            .unwrap();

        assert!(!outcome.reused_any_venue);
        assert!(outcome.errors.is_empty());
        let distinct: HashSet<Uuid> = outcome.assignments.iter().map(|a| a.venue_id).collect();
        assert_eq!(distinct.len(), 3);
        for id in &ids {
            assert_eq!(store.match_by_id(*id).unwrap().venue_id, outcome.venue_for(*id));
        }
    }

    #[tokio::test]
    async fn test_more_pairs_than_venues_reuses() {
        let store = InMemoryStore::new();
        let ids = matches_on(&store, 4, 5).await;
        let venues = vec![venue("A"), venue("B"), venue("C")];

        let outcome = assign_venues(&store, &ids, date(4), "Porto", venues, &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();

        assert!(outcome.reused_any_venue);
        assert_eq!(outcome.assignments.len(), 5);
        let distinct: HashSet<Uuid> = outcome.assignments.iter().map(|a| a.venue_id).collect();
        assert_eq!(distinct.len(), 3);
        assert_eq!(outcome.assignments.iter().filter(|a| a.reused).count(), 2);
        // Both fallbacks land on the first venue in shuffled order.
        assert_eq!(outcome.assignments[3].venue_id, outcome.assignments[4].venue_id);
    }

    #[tokio::test]
    async fn test_booking_on_another_date_does_not_conflict() {
        let store = InMemoryStore::new();
        let only = venue("Solo");
        let earlier = matches_on(&store, 1, 1).await;
        store.update_match_venue(earlier[0], only.id).await.unwrap();

        let ids = matches_on(&store, 4, 1).await;
        let outcome = assign_venues(&store, &ids, date(4), "Porto", vec![only.clone()], &mut StdRng::seed_from_u64(5))
            .await
            .unwrap();

        assert!(!outcome.reused_any_venue);
        assert_eq!(outcome.venue_for(ids[0]), Some(only.id));
    }

    #[tokio::test]
    async fn test_booking_on_same_date_in_another_event_conflicts() {
        let store = InMemoryStore::new();
        let a = venue("A");
        let b = venue("B");
        let other_group = matches_on(&store, 4, 1).await;
        store.update_match_venue(other_group[0], a.id).await.unwrap();

        let ids = matches_on(&store, 4, 1).await;
        let outcome = assign_venues(&store, &ids, date(4), "Porto", vec![a, b.clone()], &mut StdRng::seed_from_u64(11))
            .await
            .unwrap();

        assert!(!outcome.reused_any_venue);
        assert_eq!(outcome.venue_for(ids[0]), Some(b.id));
    }

    #[tokio::test]
    async fn test_same_seed_gives_same_assignment() {
        let venues = vec![venue("A"), venue("B"), venue("C"), venue("D"), venue("E")];

        let first_store = InMemoryStore::new();
        let first_ids = matches_on(&first_store, 4, 2).await;
        let first = assign_venues(&first_store, &first_ids, date(4), "Porto", venues.clone(), &mut StdRng::seed_from_u64(77))
            .await
            .unwrap();

        let second_store = InMemoryStore::new();
        let second_ids = matches_on(&second_store, 4, 2).await;
        let second = assign_venues(&second_store, &second_ids, date(4), "Porto", venues, &mut StdRng::seed_from_u64(77))
            .await
            .unwrap();

        let first_venues: Vec<Uuid> = first.assignments.iter().map(|a| a.venue_id).collect();
        let second_venues: Vec<Uuid> = second.assignments.iter().map(|a| a.venue_id).collect();
        assert_eq!(first_venues, second_venues);
    }

    #[tokio::test]
    async fn test_update_failure_is_reported_per_match() {
        let store = InMemoryStore::new();
        let ids = matches_on(&store, 4, 2).await;
        store.fail_on(StoreOp::UpdateMatchVenue);

        let outcome = assign_venues(&store, &ids, date(4), "Porto", vec![venue("A"), venue("B")], &mut StdRng::seed_from_u64(2))
            .await
            .unwrap();

        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].match_id, ids[0]);
        assert!(outcome.errors[0].message.contains("venue update failed"));
    }
}
