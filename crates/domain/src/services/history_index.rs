//! "Who has dined with whom", derived from past match guests.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::models::MatchGuest;

/// An unordered pair of distinct ids, stored smallest first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnorderedPair<I> {
    low: I,
    high: I,
}

impl<I: Ord> UnorderedPair<I> {
    /// Returns `None` when both ids are equal.
    pub fn new(a: I, b: I) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn members(&self) -> (&I, &I) {
        (&self.low, &self.high)
    }
}

/// Symmetric, irreflexive set of member pairs that have shared a match.
#[derive(Debug, Clone)]
pub struct HistoryIndex<I> {
    pairs: HashSet<UnorderedPair<I>>,
}

impl<I> Default for HistoryIndex<I> {
    fn default() -> Self {
        Self {
            pairs: HashSet::new(),
        }
    }
}

impl<I: Ord + Hash + Clone> HistoryIndex<I> {
    /// Builds the index from `(match id, member id)` rows.
    ///
    /// Every match contributes all C(n, 2) pairs of its guests.
    pub fn build<M, R>(rows: R) -> Self
    where
        M: Eq + Hash,
        R: IntoIterator<Item = (M, I)>,
    {
        let mut guests_by_match: HashMap<M, Vec<I>> = HashMap::new();
        for (match_id, member_id) in rows {
            guests_by_match.entry(match_id).or_default().push(member_id);
        }

        let mut pairs = HashSet::new();
        for guests in guests_by_match.values() {
            for (i, a) in guests.iter().enumerate() {
                for b in &guests[i + 1..] {
                    if let Some(pair) = UnorderedPair::new(a.clone(), b.clone()) {
                        pairs.insert(pair);
                    }
                }
            }
        }

        Self { pairs }
    }

    pub fn contains(&self, a: &I, b: &I) -> bool {
        match UnorderedPair::new(a.clone(), b.clone()) {
            Some(pair) => self.pairs.contains(&pair),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnorderedPair<I>> {
        self.pairs.iter()
    }
}

impl HistoryIndex<uuid::Uuid> {
    pub fn from_guests(guests: &[MatchGuest]) -> Self {
        Self::build(guests.iter().map(|g| (g.match_id, g.member_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_input_gives_empty_index() {
        let index: HistoryIndex<&str> = HistoryIndex::build(Vec::<(u32, &str)>::new());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_pair_match_is_symmetric() {
        let index = HistoryIndex::build(vec![(1, "ada"), (1, "bob")]);
        assert!(index.contains(&"ada", &"bob"));
        assert!(index.contains(&"bob", &"ada"));
        assert!(!index.contains(&"ada", &"cy"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_triple_emits_all_three_pairs() {
        let index = HistoryIndex::build(vec![(7, "ada"), (7, "bob"), (7, "cy")]);
        assert_eq!(index.len(), 3);
        assert!(index.contains(&"ada", &"cy"));
        assert!(index.contains(&"bob", &"cy"));
    }

    #[test]
    fn test_irreflexive() {
        let index = HistoryIndex::build(vec![(1, "ada"), (1, "ada"), (1, "bob")]);
        assert!(!index.contains(&"ada", &"ada"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_rows_from_different_matches_do_not_mix() {
        let index = HistoryIndex::build(vec![(1, "ada"), (2, "bob"), (1, "cy"), (2, "dee")]);
        assert!(index.contains(&"ada", &"cy"));
        assert!(index.contains(&"bob", &"dee"));
        assert!(!index.contains(&"ada", &"bob"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_repeat_pairings_collapse() {
        let index = HistoryIndex::build(vec![(1, "ada"), (1, "bob"), (2, "bob"), (2, "ada")]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_from_guests() {
        let (m, a, b) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let index = HistoryIndex::from_guests(&[
            MatchGuest {
                match_id: m,
                member_id: a,
            },
            MatchGuest {
                match_id: m,
                member_id: b,
            },
        ]);
        assert!(index.contains(&b, &a));
    }

    #[test]
    fn test_unordered_pair_normalizes() {
        let pair = UnorderedPair::new("zed", "amy").unwrap();
        assert_eq!(pair.members(), (&"amy", &"zed"));
        assert_eq!(pair, UnorderedPair::new("amy", "zed").unwrap());
        assert!(UnorderedPair::new("amy", "amy").is_none());
    }
}
