//! Core match entry types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::columns::{LABEL_FIRST, LABEL_LOSS, LABEL_SECOND, LABEL_WIN};

/// Whether a side acted first or second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrder {
    First,
    Second,
}

impl TurnOrder {
    /// Parse a localized (`先攻`/`後攻`) or English label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label == LABEL_FIRST || label.eq_ignore_ascii_case("first") {
            Some(Self::First)
        } else if label == LABEL_SECOND || label.eq_ignore_ascii_case("second") {
            Some(Self::Second)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::First => LABEL_FIRST,
            Self::Second => LABEL_SECOND,
        }
    }

    /// The same match seen from the other side of the table
    pub fn inverted(&self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Result of a match for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Parse a localized (`勝ち`/`負け`) or English label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label == LABEL_WIN || label.eq_ignore_ascii_case("win") {
            Some(Self::Win)
        } else if label == LABEL_LOSS || label.eq_ignore_ascii_case("loss") {
            Some(Self::Loss)
        } else {
            None
        }
    }

    /// Parse a boolean-like `win_flag` cell
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim().to_ascii_lowercase().as_str() {
            "1" | "1.0" | "true" => Some(Self::Win),
            "0" | "0.0" | "false" => Some(Self::Loss),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Win => LABEL_WIN,
            Self::Loss => LABEL_LOSS,
        }
    }

    pub fn inverted(&self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Loss => Self::Win,
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, Self::Win)
    }
}

/// Where an entry came from in the feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub row: usize,              // 1-based sheet row
    pub edit_url: Option<String>,
}

/// One match as entered by one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatchEntry {
    pub date: NaiveDate,
    pub event: Option<String>,
    pub player: String,
    pub own_deck: String,
    pub opponent: String,
    pub opponent_deck: String,
    pub turn_order: TurnOrder,
    pub outcome: Outcome,
    pub environment: String,
    pub note: Option<String>,
    pub source: SourceRef,
}

impl RawMatchEntry {
    pub fn new(
        date: NaiveDate,
        player: &str,
        own_deck: &str,
        opponent: &str,
        opponent_deck: &str,
        turn_order: TurnOrder,
        outcome: Outcome,
        environment: &str,
    ) -> Self {
        Self {
            date,
            event: None,
            player: player.to_string(),
            own_deck: own_deck.to_string(),
            opponent: opponent.to_string(),
            opponent_deck: opponent_deck.to_string(),
            turn_order,
            outcome,
            environment: environment.to_string(),
            note: None,
            source: SourceRef::default(),
        }
    }

    pub fn with_event(mut self, event: &str) -> Self {
        self.event = Some(event.to_string());
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.source = source;
        self
    }
}

#[cfg(test)]
impl RawMatchEntry {
    /// The same match as the opponent would have reported it
    pub(crate) fn mirrored(&self) -> Self {
        Self {
            player: self.opponent.clone(),
            own_deck: self.opponent_deck.clone(),
            opponent: self.player.clone(),
            opponent_deck: self.own_deck.clone(),
            turn_order: self.turn_order.inverted(),
            outcome: self.outcome.inverted(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_order_labels() {
        assert_eq!(TurnOrder::from_label("先攻"), Some(TurnOrder::First));
        assert_eq!(TurnOrder::from_label(" 後攻 "), Some(TurnOrder::Second));
        assert_eq!(TurnOrder::from_label("First"), Some(TurnOrder::First));
        assert_eq!(TurnOrder::from_label("先手"), None);
        assert_eq!(TurnOrder::First.inverted(), TurnOrder::Second);
        assert_eq!(TurnOrder::Second.label(), "後攻");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::from_label("勝ち"), Some(Outcome::Win));
        assert_eq!(Outcome::from_label("負け"), Some(Outcome::Loss));
        assert_eq!(Outcome::from_label("LOSS"), Some(Outcome::Loss));
        assert_eq!(Outcome::from_label("引き分け"), None);
        assert_eq!(Outcome::Win.inverted(), Outcome::Loss);
        assert_eq!(Outcome::Loss.label(), "負け");
    }

    #[test]
    fn test_outcome_flags() {
        assert_eq!(Outcome::from_flag("1"), Some(Outcome::Win));
        assert_eq!(Outcome::from_flag("TRUE"), Some(Outcome::Win));
        assert_eq!(Outcome::from_flag("0.0"), Some(Outcome::Loss));
        assert_eq!(Outcome::from_flag("2"), None);
    }

    #[test]
    fn test_mirrored() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let entry = RawMatchEntry::new(
            date, "Bob", "Red", "Alice", "Blue", TurnOrder::First, Outcome::Win, "Standard",
        )
        .with_note("close game");

        let mirror = entry.mirrored();
        assert_eq!(mirror.player, "Alice");
        assert_eq!(mirror.own_deck, "Blue");
        assert_eq!(mirror.opponent_deck, "Red");
        assert_eq!(mirror.turn_order, TurnOrder::Second);
        assert_eq!(mirror.outcome, Outcome::Loss);
        assert_eq!(mirror.note.as_deref(), Some("close game"));
        assert_eq!(mirror.mirrored(), entry);
    }
}
