//! Greedy first-fit pairing of group members.
//!
//! Members are visited in the order given. Each unplaced member is paired with the
//! first later unplaced member they have not dined with before. There is no look-ahead
//! and no backtracking, so the output is fully determined by the input order and history.

use std::hash::Hash;

use serde::Serialize;

use super::history_index::HistoryIndex;
use crate::errors::PairingError;

/// Two or three members sharing one dinner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairGroup<I> {
    members: Vec<I>,
}

impl<I: PartialEq> PairGroup<I> {
    fn pair(a: I, b: I) -> Self {
        Self {
            members: vec![a, b],
        }
    }

    pub fn members(&self) -> &[I] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_triple(&self) -> bool {
        self.members.len() == 3
    }

    pub fn contains(&self, member: &I) -> bool {
        self.members.contains(member)
    }
}

/// Result of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairingPlan<I> {
    /// Groups in creation order.
    pub groups: Vec<PairGroup<I>>,
    /// Members left out of this round.
    pub unplaced: Vec<I>,
}

/// Generates pair groups for one round.
///
/// Fails with [`PairingError::EmptyGroup`] for no members and
/// [`PairingError::InsufficientMembers`] for a single member.
pub fn generate<I>(members: &[I], history: &HistoryIndex<I>) -> Result<PairingPlan<I>, PairingError>
where
    I: Ord + Hash + Clone,
{
    match members.len() {
        0 => return Err(PairingError::EmptyGroup),
        1 => return Err(PairingError::InsufficientMembers { count: 1 }),
        _ => {}
    }

    let (groups, unpaired) = first_fit_pass(members, history);
    Ok(absorb_leftovers(groups, unpaired))
}

fn first_fit_pass<I>(members: &[I], history: &HistoryIndex<I>) -> (Vec<PairGroup<I>>, Vec<I>)
where
    I: Ord + Hash + Clone,
{
    let n = members.len();
    let mut placed = vec![false; n];
    let mut groups = Vec::new();
    let mut unpaired = Vec::new();

    for i in 0..n {
        if placed[i] {
            continue;
        }

        let partner = (i + 1..n)
            .find(|&j| !placed[j] && !history.contains(&members[i], &members[j]));

        match partner {
            Some(j) => {
                placed[i] = true;
                placed[j] = true;
                groups.push(PairGroup::pair(members[i].clone(), members[j].clone()));
            }
            None => unpaired.push(members[i].clone()),
        }
    }

    (groups, unpaired)
}

/// Appends the first member the main pass could not place to the last group.
///
/// Only one leftover is absorbed so no group grows past three. Any further leftovers,
/// or the single leftover when there are no groups at all, are dropped for this round.
fn absorb_leftovers<I>(mut groups: Vec<PairGroup<I>>, unpaired: Vec<I>) -> PairingPlan<I> {
    let mut leftovers = unpaired.into_iter();
    let mut unplaced = Vec::new();

    if let Some(first) = leftovers.next() {
        match groups.last_mut() {
            Some(last) => last.members.push(first),
            None => unplaced.push(first),
        }
    }
    unplaced.extend(leftovers);

    PairingPlan { groups, unplaced }
}
