//! Win-rate statistics over a filtered record set

use serde::Serialize;
use std::collections::BTreeMap;

use crate::normalize::{CanonicalMatchEntry, Slot};
use crate::record::{Outcome, TurnOrder};
use crate::stats::filter::FilterState;

/// Grouping dimension of a statistics table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Environment,
    OpponentDeck,
}

/// Side from which outcomes are read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Perspective {
    /// The canonical primary slot
    #[default]
    Primary,
    /// A named player; records without them are ignored
    Player(String),
}

impl Perspective {
    pub fn slot(&self, entry: &CanonicalMatchEntry) -> Option<Slot> {
        match self {
            Self::Primary => Some(Slot::Primary),
            Self::Player(player) => entry.slot_of(player),
        }
    }

    /// An explicit player wins; otherwise a selected player filter sets the
    /// side, and with no player selected the primary slot is used
    pub fn for_filters(state: &FilterState, explicit: Option<String>) -> Self {
        match explicit.or_else(|| state.player.value().cloned()) {
            Some(player) => Self::Player(player),
            None => Self::Primary,
        }
    }
}

/// One group of a statistics table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    pub key: String,
    pub wins: usize,
    pub games: usize,
    pub win_rate: f64,
}

/// Win rates split by turn order
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TurnOrderSplit {
    pub first_win_rate: f64,
    pub second_win_rate: f64,
    pub first_games: usize,
    pub second_games: usize,
}

/// Overall win/loss breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub wins: usize,
    pub losses: usize,
}

impl OutcomeCounts {
    pub fn games(&self) -> usize {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        rate(self.wins, self.games())
    }
}

fn rate(wins: usize, games: usize) -> f64 {
    if games == 0 {
        0.0
    } else {
        wins as f64 / games as f64
    }
}

/// Group key of a record seen from `slot`
fn group_key(entry: &CanonicalMatchEntry, slot: Slot, dimension: Dimension) -> String {
    match dimension {
        Dimension::Environment => entry.environment.clone(),
        Dimension::OpponentDeck => entry.other_side(slot).deck.clone(),
    }
}

/// Win rate per group, sorted by key, from the primary side
pub fn aggregate_by(records: &[CanonicalMatchEntry], dimension: Dimension) -> Vec<StatRow> {
    aggregate_for(records, dimension, &Perspective::Primary)
}

/// Win rate per group from the given perspective.
///
/// Only groups with at least one record appear.
pub fn aggregate_for(
    records: &[CanonicalMatchEntry],
    dimension: Dimension,
    perspective: &Perspective,
) -> Vec<StatRow> {
    let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for entry in records {
        let Some(slot) = perspective.slot(entry) else {
            continue;
        };
        let (wins, games) = groups.entry(group_key(entry, slot, dimension)).or_default();
        *games += 1;
        if entry.outcome_for(slot).is_win() {
            *wins += 1;
        }
    }

    groups
        .into_iter()
        .map(|(key, (wins, games))| StatRow {
            key,
            wins,
            games,
            win_rate: rate(wins, games),
        })
        .collect()
}

/// First vs second win rates from the primary side
pub fn turn_order_split(records: &[CanonicalMatchEntry]) -> TurnOrderSplit {
    turn_order_split_for(records, &Perspective::Primary)
}

pub fn turn_order_split_for(records: &[CanonicalMatchEntry], perspective: &Perspective) -> TurnOrderSplit {
    let (mut first_wins, mut first_games) = (0, 0);
    let (mut second_wins, mut second_games) = (0, 0);

    for entry in records {
        let Some(slot) = perspective.slot(entry) else {
            continue;
        };
        let won = entry.outcome_for(slot).is_win() as usize;
        match entry.turn_order_for(slot) {
            TurnOrder::First => {
                first_games += 1;
                first_wins += won;
            }
            TurnOrder::Second => {
                second_games += 1;
                second_wins += won;
            }
        }
    }

    TurnOrderSplit {
        first_win_rate: rate(first_wins, first_games),
        second_win_rate: rate(second_wins, second_games),
        first_games,
        second_games,
    }
}

pub fn outcome_counts(records: &[CanonicalMatchEntry], perspective: &Perspective) -> OutcomeCounts {
    let mut counts = OutcomeCounts::default();
    for entry in records {
        match perspective.slot(entry).map(|slot| entry.outcome_for(slot)) {
            Some(Outcome::Win) => counts.wins += 1,
            Some(Outcome::Loss) => counts.losses += 1,
            None => {}
        }
    }
    counts
}

/// Every statistic the dashboard shows for one filtered set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsReport {
    pub overall: OutcomeCounts,
    pub by_environment: Vec<StatRow>,
    pub by_opponent_deck: Vec<StatRow>,
    pub turn_order: TurnOrderSplit,
}

impl StatsReport {
    pub fn compute(records: &[CanonicalMatchEntry], perspective: &Perspective) -> Self {
        Self {
            overall: outcome_counts(records, perspective),
            by_environment: aggregate_for(records, Dimension::Environment, perspective),
            by_opponent_deck: aggregate_for(records, Dimension::OpponentDeck, perspective),
            turn_order: turn_order_split_for(records, perspective),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overall.games() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::canonicalize;
    use crate::record::RawMatchEntry;
    use chrono::NaiveDate;

    fn make_record(
        player: &str,
        own: &str,
        opponent: &str,
        opp_deck: &str,
        turn: TurnOrder,
        outcome: Outcome,
        env: &str,
    ) -> CanonicalMatchEntry {
        let raw = RawMatchEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            player, own, opponent, opp_deck, turn, outcome, env,
        );
        canonicalize(&raw).0
    }

    fn sample() -> Vec<CanonicalMatchEntry> {
        vec![
            // primary Alice
            make_record("Alice", "Red", "Bob", "Blue", TurnOrder::First, Outcome::Win, "Standard"),
            make_record("Alice", "Red", "Carol", "Green", TurnOrder::Second, Outcome::Loss, "Standard"),
            make_record("Alice", "Red", "Dave", "Blue", TurnOrder::First, Outcome::Win, "Legacy"),
            // Bob reports, Alice becomes primary: Alice Green, Second, Win
            make_record("Bob", "Blue", "Alice", "Green", TurnOrder::First, Outcome::Loss, "Legacy"),
        ]
    }

    #[test]
    fn test_aggregate_by_environment() {
        let rows = aggregate_by(&sample(), Dimension::Environment);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "Legacy");
        assert_eq!((rows[0].wins, rows[0].games), (2, 2));
        assert_eq!(rows[0].win_rate, 1.0);
        assert_eq!(rows[1].key, "Standard");
        assert_eq!((rows[1].wins, rows[1].games), (1, 2));
        assert_eq!(rows[1].win_rate, 0.5);
    }

    #[test]
    fn test_aggregate_by_opponent_deck() {
        let rows = aggregate_by(&sample(), Dimension::OpponentDeck);
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();

        assert_eq!(keys, vec!["Blue", "Green"]);
        assert_eq!((rows[0].wins, rows[0].games), (3, 3));
        assert_eq!((rows[1].wins, rows[1].games), (0, 1));
    }

    #[test]
    fn test_empty_groups_are_absent() {
        assert!(aggregate_by(&[], Dimension::Environment).is_empty());
        assert!(aggregate_by(&[], Dimension::OpponentDeck).is_empty());

        let rows = aggregate_by(&sample(), Dimension::Environment);
        assert!(rows.iter().all(|r| r.games > 0 && !r.win_rate.is_nan()));
    }

    #[test]
    fn test_turn_order_split() {
        let split = turn_order_split(&sample());

        assert_eq!(split.first_games, 2);
        assert_eq!(split.first_win_rate, 1.0);
        assert_eq!(split.second_games, 2);
        assert_eq!(split.second_win_rate, 0.5);
    }

    #[test]
    fn test_turn_order_split_empty() {
        let split = turn_order_split(&[]);
        assert_eq!(split.first_win_rate, 0.0);
        assert_eq!(split.second_win_rate, 0.0);
        assert_eq!(split, TurnOrderSplit::default());
    }

    #[test]
    fn test_player_perspective() {
        let perspective = Perspective::Player("Bob".to_string());
        let rows = aggregate_for(&sample(), Dimension::OpponentDeck, &perspective);

        // Bob lost with Blue against Red and against Green
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Green", "Red"]);
        assert!(rows.iter().all(|r| r.wins == 0 && r.games == 1));

        let split = turn_order_split_for(&sample(), &perspective);
        assert_eq!(split.first_games, 1);
        assert_eq!(split.second_games, 1);
        assert_eq!(split.first_win_rate, 0.0);
    }

    #[test]
    fn test_outcome_counts() {
        let counts = outcome_counts(&sample(), &Perspective::Primary);
        assert_eq!(counts, OutcomeCounts { wins: 3, losses: 1 });
        assert_eq!(counts.win_rate(), 0.75);

        let counts = outcome_counts(&sample(), &Perspective::Player("Carol".to_string()));
        assert_eq!(counts, OutcomeCounts { wins: 1, losses: 0 });

        assert_eq!(OutcomeCounts::default().win_rate(), 0.0);
    }

    #[test]
    fn test_stats_report() {
        let report = StatsReport::compute(&sample(), &Perspective::Primary);
        assert!(!report.is_empty());
        assert_eq!(report.by_environment.len(), 2);

        let empty = StatsReport::compute(&[], &Perspective::Primary);
        assert!(empty.is_empty());
        assert!(empty.by_opponent_deck.is_empty());
    }

    #[test]
    fn test_player_filter_sets_perspective() {
        let state = FilterState::default().with_player("Bob");
        let perspective = Perspective::for_filters(&state, None);
        assert_eq!(perspective, Perspective::Player("Bob".to_string()));

        let filtered = crate::stats::filter(&sample(), &state);
        let report = StatsReport::compute(&filtered, &perspective);
        assert_eq!(report.overall, OutcomeCounts { wins: 0, losses: 2 });
        assert_eq!(report.overall.win_rate(), 0.0);

        let explicit = Perspective::for_filters(&state, Some("Alice".to_string()));
        assert_eq!(explicit, Perspective::Player("Alice".to_string()));
        assert_eq!(
            Perspective::for_filters(&FilterState::default(), None),
            Perspective::Primary
        );
    }
}
