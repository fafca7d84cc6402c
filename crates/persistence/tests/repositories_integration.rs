//! Repository round-trips against PostgreSQL.

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use domain::models::{InviteStatus, SlotChoice, TimeSlot};
use domain::services::{
    try_confirm, AvailabilityStore, GroupDirectory, MatchStatus, PairingHistory,
    PairingOrchestrator, PairingSink,
};
use domain::StoreError;
use persistence::{AvailabilityRepository, GroupRepository, PairingRepository};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2031, 3, day).unwrap()
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_members_listed_in_join_order() {
    let pool = common::create_test_pool().await;
    let group = common::create_group(&pool, 3, 0).await;
    let repo = GroupRepository::new(pool);

    let members = GroupDirectory::list_members(&repo, group.id).await.unwrap();
    let ids: Vec<_> = members.iter().map(|m| m.id).collect();
    assert_eq!(ids, group.members);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_orchestrator_round_against_postgres() {
    let pool = common::create_test_pool().await;
    let group = common::create_group(&pool, 5, 2).await;
    let groups = Arc::new(GroupRepository::new(pool.clone()));
    let pairings = Arc::new(PairingRepository::new(pool.clone()));
    let orchestrator = PairingOrchestrator::new(groups.clone(), pairings.clone(), pairings.clone());

    let outcome = orchestrator
        .run_for_group(group.id, date(14), &mut StdRng::seed_from_u64(1))
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(groups.last_event_date(group.id).await.unwrap(), Some(date(14)));

    let history = pairings.list_past_match_guests(group.id).await.unwrap();
    assert_eq!(history.len(), 5);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_duplicate_guest_maps_to_conflict() {
    let pool = common::create_test_pool().await;
    let group = common::create_group(&pool, 2, 0).await;
    let repo = PairingRepository::new(pool);

    let event = repo.create_event(group.id, date(1)).await.unwrap();
    let m = repo.create_match(event.id).await.unwrap();
    repo.add_match_guests(m.id, &group.members).await.unwrap();

    let err = repo
        .add_match_guests(m.id, &group.members[..1])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_confirmation_written_once_and_slots_replaced() {
    let pool = common::create_test_pool().await;
    let group = common::create_group(&pool, 2, 0).await;
    let pairings = PairingRepository::new(pool.clone());
    let availability = AvailabilityRepository::new(pool);
    let (me, partner) = (group.members[0], group.members[1]);

    let event = pairings.create_event(group.id, date(2)).await.unwrap();
    let m = pairings.create_match(event.id).await.unwrap();
    pairings.add_match_guests(m.id, &group.members).await.unwrap();
    pairings.create_invites(event.id, &group.members).await.unwrap();

    availability
        .replace_availability_slots(me, Some(event.id), &[SlotChoice::new(date(9), TimeSlot::Breakfast)])
        .await
        .unwrap();
    availability
        .replace_availability_slots(
            me,
            Some(event.id),
            &[
                SlotChoice::new(date(10), TimeSlot::LateNight),
                SlotChoice::new(date(10), TimeSlot::Lunch),
            ],
        )
        .await
        .unwrap();
    let mine = availability.list_availability(me, Some(event.id)).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].time_slot, TimeSlot::Lunch);

    availability
        .replace_availability_slots(partner, Some(event.id), &[SlotChoice::new(date(10), TimeSlot::LateNight)])
        .await
        .unwrap();

    let status = try_confirm(&availability, m.id, me).await.unwrap();
    assert_eq!(
        status,
        MatchStatus::Matched {
            date: date(10),
            time_slot: TimeSlot::LateNight
        }
    );

    let again = availability
        .update_match_confirmation(m.id, SlotChoice::new(date(11), TimeSlot::Dinner))
        .await
        .unwrap();
    assert!(!again);

    assert!(availability
        .update_invite_status(event.id, partner, InviteStatus::Declined)
        .await
        .unwrap());
    assert_eq!(
        availability.get_invite_status(event.id, partner).await.unwrap(),
        Some(InviteStatus::Declined)
    );
}
