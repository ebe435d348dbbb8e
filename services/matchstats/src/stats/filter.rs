//! Filter state and the independent predicates it is evaluated with

use chrono::NaiveDate;

use crate::normalize::{name_key, CanonicalMatchEntry};
use crate::record::{Outcome, TurnOrder};

/// Label of the "no constraint" choice
pub const ALL: &str = "All";

/// One filter dimension: everything, or exactly one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == value,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(selected) => Some(selected),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl Selection<String> {
    /// `"All"` or an empty string select everything
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text == ALL {
            Self::All
        } else {
            Self::Only(text.to_string())
        }
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Active selections of every filter dimension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub date_range: Option<DateRange>,
    pub event: Selection<String>,
    pub player: Selection<String>,
    pub own_deck: Selection<String>,
    pub opponent_deck: Selection<String>,
    pub turn_order: Selection<TurnOrder>,
    pub outcome: Selection<Outcome>,
    pub environment: Selection<String>,
    pub note_query: String,
}

impl FilterState {
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn with_event(mut self, event: &str) -> Self {
        self.event = Selection::parse(event);
        self
    }

    pub fn with_player(mut self, player: &str) -> Self {
        self.player = Selection::parse(player);
        self
    }

    pub fn with_own_deck(mut self, deck: &str) -> Self {
        self.own_deck = Selection::parse(deck);
        self
    }

    pub fn with_opponent_deck(mut self, deck: &str) -> Self {
        self.opponent_deck = Selection::parse(deck);
        self
    }

    pub fn with_turn_order(mut self, turn_order: TurnOrder) -> Self {
        self.turn_order = Selection::Only(turn_order);
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Selection::Only(outcome);
        self
    }

    pub fn with_environment(mut self, environment: &str) -> Self {
        self.environment = Selection::parse(environment);
        self
    }

    pub fn with_note_query(mut self, query: &str) -> Self {
        self.note_query = query.to_string();
        self
    }
}

pub type Predicate = fn(&CanonicalMatchEntry, &FilterState) -> bool;

/// Evaluated in order, combined with AND
pub const PREDICATES: [Predicate; 9] = [
    by_date_range,
    by_event,
    by_player,
    by_turn_order,
    by_outcome,
    by_environment,
    by_note,
    by_player_deck,
    by_decks,
];

/// Records satisfying every predicate, in input order
pub fn filter(records: &[CanonicalMatchEntry], state: &FilterState) -> Vec<CanonicalMatchEntry> {
    records
        .iter()
        .filter(|entry| matches_all(entry, state))
        .cloned()
        .collect()
}

pub fn matches_all(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    PREDICATES.iter().all(|predicate| predicate(entry, state))
}

pub fn by_date_range(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    state.date_range.map_or(true, |range| range.contains(entry.date))
}

pub fn by_event(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    match state.event.value() {
        None => true,
        Some(event) => entry.event.as_deref() == Some(event.as_str()),
    }
}

/// The player may sit in either slot
pub fn by_player(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    match state.player.value() {
        None => true,
        Some(player) => entry.involves(player),
    }
}

pub fn by_turn_order(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    state.turn_order.matches(&entry.turn_order)
}

pub fn by_outcome(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    state.outcome.matches(&entry.outcome)
}

pub fn by_environment(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    state.environment.matches(&entry.environment)
}

/// Case-insensitive containment; an empty query matches everything
pub fn by_note(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    let query = state.note_query.trim();
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    entry
        .note
        .as_deref()
        .map_or(false, |note| note.to_lowercase().contains(&query))
}

/// Player plus own deck: the player's own slot must carry the deck.
///
/// Takes precedence over `by_decks`, which then imposes nothing.
pub fn by_player_deck(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    match (state.player.value(), state.own_deck.value()) {
        (Some(player), Some(deck)) => {
            let player = name_key(player);
            (name_key(&entry.primary.player) == player && entry.primary.deck == *deck)
                || (name_key(&entry.secondary.player) == player && entry.secondary.deck == *deck)
        }
        _ => true,
    }
}

/// Deck-only selections, first matching rule applies:
/// equal own/opponent decks select mirror matches, otherwise the own deck
/// (or, when unset, the opponent deck) may sit in either slot.
pub fn by_decks(entry: &CanonicalMatchEntry, state: &FilterState) -> bool {
    if !state.player.is_all() && !state.own_deck.is_all() {
        return true;
    }

    match (state.own_deck.value(), state.opponent_deck.value()) {
        (Some(own), Some(opponent)) if own == opponent => {
            entry.primary.deck == *own && entry.secondary.deck == *own
        }
        (Some(own), _) => entry.has_deck(own),
        (None, Some(opponent)) => entry.has_deck(opponent),
        (None, None) => true,
    }
}
