//! First-occurrence deduplication by identity key

use std::collections::HashSet;

use crate::normalize::canonical::CanonicalMatchEntry;

/// Outcome of a deduplication pass
#[derive(Debug, Clone, Default)]
pub struct Dedup {
    pub retained: Vec<CanonicalMatchEntry>,
    pub dropped: Vec<CanonicalMatchEntry>,
}

impl Dedup {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Keep the first entry per identity key, in input order.
///
/// Later entries with an already-seen key are dropped whole, never merged.
pub fn dedup(entries: impl IntoIterator<Item = CanonicalMatchEntry>) -> Dedup {
    let mut seen = HashSet::new();
    let mut result = Dedup::default();

    for entry in entries {
        if seen.insert(entry.identity_key()) {
            result.retained.push(entry);
        } else {
            tracing::debug!(
                "Dropping duplicate of {} from row {}",
                entry.identity_key(),
                entry.source.row
            );
            result.dropped.push(entry);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::canonical::canonicalize;
    use crate::record::{Outcome, RawMatchEntry, SourceRef, TurnOrder};
    use chrono::NaiveDate;

    fn make_entry(day: u32, player: &str, opponent: &str, row: usize) -> CanonicalMatchEntry {
        let raw = RawMatchEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            player,
            "Red",
            opponent,
            "Blue",
            TurnOrder::First,
            Outcome::Win,
            "Standard",
        )
        .with_source(SourceRef { row, edit_url: None });
        canonicalize(&raw).0
    }

    #[test]
    fn test_first_occurrence_wins() {
        let first = make_entry(1, "Alice", "Bob", 2);
        let mut resubmitted = make_entry(1, "Alice", "Bob", 3);
        resubmitted.outcome = Outcome::Loss;

        let result = dedup(vec![first.clone(), resubmitted.clone()]);
        assert_eq!(result.retained, vec![first]);
        assert_eq!(result.dropped, vec![resubmitted]);
        assert!(!result.is_clean());
    }

    #[test]
    fn test_both_perspectives_collapse() {
        let raw = RawMatchEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Bob", "Red", "Alice", "Blue", TurnOrder::First, Outcome::Win, "Standard",
        );
        let from_bob = canonicalize(&raw).0;
        let from_alice = canonicalize(&raw.mirrored()).0;

        let result = dedup(vec![from_alice, from_bob]);
        assert_eq!(result.retained.len(), 1);
        assert_eq!(result.dropped.len(), 1);
        assert_eq!(
            result.retained[0].identity_key().to_string(),
            "2024-01-01||Alice|Bob|Blue|Red"
        );
    }

    #[test]
    fn test_preserves_first_occurrence_order() {
        let a = make_entry(3, "Alice", "Bob", 2);
        let b = make_entry(1, "Carol", "Dave", 3);
        let c = make_entry(2, "Alice", "Bob", 4);

        let result = dedup(vec![a.clone(), b.clone(), a.clone(), c.clone(), b]);
        let rows: Vec<usize> = result.retained.iter().map(|e| e.source.row).collect();
        assert_eq!(rows, vec![2, 3, 4]);
        assert_eq!(result.dropped.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let entries = vec![
            make_entry(1, "Alice", "Bob", 2),
            make_entry(1, "Bob", "Alice", 3),
            make_entry(2, "Alice", "Bob", 4),
            make_entry(1, "Alice", "Bob", 5),
        ];

        let once = dedup(entries).retained;
        let twice = dedup(once.clone());
        assert_eq!(twice.retained, once);
        assert!(twice.is_clean());
    }

    #[test]
    fn test_empty_input() {
        let result = dedup(Vec::new());
        assert!(result.retained.is_empty());
        assert!(result.is_clean());
    }
}
