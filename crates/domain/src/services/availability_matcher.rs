//! Reconciles guests' availability into one confirmed date and slot.
//!
//! The state of a match moves from `waiting_for_partner` to `no_match`, `matched` or
//! `partner_skipped`. Only `matched` is terminal: once a confirmation is persisted it is
//! returned as-is and never recomputed. Every other state is recomputed whenever a guest
//! saves availability or asks for the status.
//!
//! [`evaluate`] is the pure transition function. [`try_confirm`] loads a snapshot from the
//! store, evaluates it and persists the confirmation when one is found. The confirmation
//! write only succeeds on an unconfirmed match, so two guests saving at the same time may
//! both attempt it without harm.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::store::AvailabilityStore;
use crate::errors::PairingError;
use crate::models::{InviteStatus, Match, SaveAvailabilityRequest, SlotChoice, TimeSlot};

/// Status of a match as seen by one of its guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchStatus {
    WaitingForPartner,
    NoMatch,
    Matched { date: NaiveDate, time_slot: TimeSlot },
    PartnerSkipped,
    Error { reason: String },
}

impl MatchStatus {
    fn matched(choice: SlotChoice) -> Self {
        MatchStatus::Matched {
            date: choice.date,
            time_slot: choice.time_slot,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Matched { .. })
    }
}

/// Earliest (date, slot) present in both sets.
pub fn earliest_overlap(mine: &[SlotChoice], partner: &[SlotChoice]) -> Option<SlotChoice> {
    earliest_common(mine, std::iter::once(partner))
}

/// Earliest (date, slot) from `mine` that every other set also contains.
pub fn earliest_common<'a, P>(mine: &[SlotChoice], others: P) -> Option<SlotChoice>
where
    P: IntoIterator<Item = &'a [SlotChoice]>,
{
    let mut survivors: Vec<SlotChoice> = mine.to_vec();
    for other in others {
        let tokens: HashSet<SlotChoice> = other.iter().copied().collect();
        survivors.retain(|choice| tokens.contains(choice));
    }
    survivors.sort_by_key(SlotChoice::sort_key);
    survivors.into_iter().next()
}

/// Another guest of the match, as loaded for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerState {
    pub member_id: Uuid,
    pub invite: Option<InviteStatus>,
    pub slots: Vec<SlotChoice>,
}

/// Everything [`evaluate`] needs to decide a match's status.
#[derive(Debug, Clone)]
pub struct MatchSnapshot {
    pub current: Match,
    pub member_id: Uuid,
    pub guests: Vec<Uuid>,
    pub my_slots: Vec<SlotChoice>,
    pub partners: Vec<PartnerState>,
}

/// Result of evaluating a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub status: MatchStatus,
    /// Confirmation that still has to be written.
    pub confirm: Option<SlotChoice>,
}

impl Evaluation {
    fn settled(status: MatchStatus) -> Self {
        Self {
            status,
            confirm: None,
        }
    }
}

/// Decides the status of a match for one of its guests.
///
/// Partners who declined their invite are left out of the overlap; when every partner
/// declined the status is `partner_skipped`.
pub fn evaluate(snapshot: &MatchSnapshot) -> Result<Evaluation, PairingError> {
    if !snapshot.guests.contains(&snapshot.member_id) {
        return Err(PairingError::MatchResolutionError(format!(
            "member {} is not a guest of match {}",
            snapshot.member_id, snapshot.current.id
        )));
    }
    if snapshot.partners.is_empty() {
        return Err(PairingError::MatchResolutionError(format!(
            "match {} has no partner for member {}",
            snapshot.current.id, snapshot.member_id
        )));
    }

    if let Some(choice) = snapshot.current.confirmation() {
        return Ok(Evaluation::settled(MatchStatus::matched(choice)));
    }

    let active: Vec<&PartnerState> = snapshot
        .partners
        .iter()
        .filter(|p| p.invite != Some(InviteStatus::Declined))
        .collect();

    if active.is_empty() {
        return Ok(Evaluation::settled(MatchStatus::PartnerSkipped));
    }

    if active.iter().any(|p| p.slots.is_empty()) {
        return Ok(Evaluation::settled(MatchStatus::WaitingForPartner));
    }

    match earliest_common(&snapshot.my_slots, active.iter().map(|p| p.slots.as_slice())) {
        Some(choice) => Ok(Evaluation {
            status: MatchStatus::matched(choice),
            confirm: Some(choice),
        }),
        None => Ok(Evaluation::settled(MatchStatus::NoMatch)),
    }
}

/// Computes a guest's match status and persists a confirmation if one is found.
///
/// Safe to call any number of times: a confirmed match short-circuits before any other
/// read and is never written again. Resolution problems come back as
/// [`MatchStatus::Error`]; store failures are returned as errors.
pub async fn try_confirm(
    store: &dyn AvailabilityStore,
    match_id: Uuid,
    member_id: Uuid,
) -> Result<MatchStatus, PairingError> {
    let Some(current) = store
        .get_match(match_id)
        .await
        .map_err(PairingError::upstream("load match"))?
    else {
        warn!(match_id = %match_id, member_id = %member_id, "Match not found");
        return Ok(MatchStatus::Error {
            reason: format!("match {} not found", match_id),
        });
    };

    if let Some(choice) = current.confirmation() {
        return Ok(MatchStatus::matched(choice));
    }

    let snapshot = load_snapshot(store, current, member_id).await?;

    let evaluation = match evaluate(&snapshot) {
        Ok(evaluation) => evaluation,
        Err(PairingError::MatchResolutionError(reason)) => {
            warn!(match_id = %match_id, member_id = %member_id, reason = %reason, "Match resolution failed");
            return Ok(MatchStatus::Error { reason });
        }
        Err(e) => return Err(e),
    };

    let Some(choice) = evaluation.confirm else {
        return Ok(evaluation.status);
    };

    let written = store
        .update_match_confirmation(match_id, choice)
        .await
        .map_err(PairingError::upstream("write match confirmation"))?;

    if written {
        info!(
            match_id = %match_id,
            member_id = %member_id,
            date = %choice.date,
            time_slot = %choice.time_slot,
            "Match confirmed"
        );
        return Ok(evaluation.status);
    }

    // Another guest confirmed first; report what was stored.
    let stored = store
        .get_match(match_id)
        .await
        .map_err(PairingError::upstream("reload match"))?
        .and_then(|m| m.confirmation())
        .unwrap_or(choice);
    Ok(MatchStatus::matched(stored))
}

async fn load_snapshot(
    store: &dyn AvailabilityStore,
    current: Match,
    member_id: Uuid,
) -> Result<MatchSnapshot, PairingError> {
    let event_id = current.event_id;
    let guests = store
        .list_match_guests(current.id)
        .await
        .map_err(PairingError::upstream("list match guests"))?;

    let my_slots = choices(store, member_id, event_id).await?;

    let mut partners = Vec::new();
    for &guest in guests.iter().filter(|&&g| g != member_id) {
        let invite = store
            .get_invite_status(event_id, guest)
            .await
            .map_err(PairingError::upstream("load partner invite"))?;
        let slots = choices(store, guest, event_id).await?;
        partners.push(PartnerState {
            member_id: guest,
            invite,
            slots,
        });
    }

    Ok(MatchSnapshot {
        current,
        member_id,
        guests,
        my_slots,
        partners,
    })
}

async fn choices(
    store: &dyn AvailabilityStore,
    member_id: Uuid,
    event_id: Uuid,
) -> Result<Vec<SlotChoice>, PairingError> {
    let slots = store
        .list_availability(member_id, Some(event_id))
        .await
        .map_err(PairingError::upstream("list availability"))?;
    Ok(slots.iter().map(|s| s.choice()).collect())
}

/// Result of saving a member's availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    /// Number of distinct slots stored.
    pub saved: usize,
    /// Match status after the save; `None` for standing availability.
    pub status: Option<MatchStatus>,
}

/// Replaces a member's availability set and re-evaluates their match.
///
/// Dates earlier than `today` are rejected. Duplicate entries are stored once.
pub async fn save_availability(
    store: &dyn AvailabilityStore,
    member_id: Uuid,
    request: SaveAvailabilityRequest,
    today: NaiveDate,
) -> Result<SaveOutcome, PairingError> {
    request.validate()?;

    let mut seen = HashSet::new();
    let mut slots = Vec::with_capacity(request.entries.len());
    for entry in &request.entries {
        let choice = entry
            .to_choice()
            .map_err(|e| PairingError::Validation(e.to_string()))?;
        shared::validation::validate_not_past(choice.date, today).map_err(|e| {
            PairingError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            )
        })?;
        if seen.insert(choice) {
            slots.push(choice);
        }
    }

    store
        .replace_availability_slots(member_id, request.event_id, &slots)
        .await
        .map_err(PairingError::upstream("replace availability"))?;

    let Some(event_id) = request.event_id else {
        return Ok(SaveOutcome {
            saved: slots.len(),
            status: None,
        });
    };

    let status = match store
        .find_match_for_member(event_id, member_id)
        .await
        .map_err(PairingError::upstream("find member match"))?
    {
        Some(found) => try_confirm(store, found.id, member_id).await?,
        None => {
            warn!(event_id = %event_id, member_id = %member_id, "No match for member in event");
            MatchStatus::Error {
                reason: format!("member {} has no match in event {}", member_id, event_id),
            }
        }
    };

    Ok(SaveOutcome {
        saved: slots.len(),
        status: Some(status),
    })
}

/// Records a member's accept or decline for an event.
pub async fn respond_to_invite(
    store: &dyn AvailabilityStore,
    event_id: Uuid,
    member_id: Uuid,
    status: InviteStatus,
) -> Result<(), PairingError> {
    let updated = store
        .update_invite_status(event_id, member_id, status)
        .await
        .map_err(PairingError::upstream("update invite"))?;

    if !updated {
        return Err(PairingError::MatchResolutionError(format!(
            "member {} has no invite for event {}",
            member_id, event_id
        )));
    }

    info!(event_id = %event_id, member_id = %member_id, status = %status, "Invite answered");
    Ok(())
}
