//! Canonical (name-ordered) match entries and their identity keys

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;

use crate::error::DataQualityWarning;
use crate::record::{Outcome, RawMatchEntry, SourceRef, TurnOrder};

/// Separator between identity key components (ASCII unit separator)
pub const KEY_SEPARATOR: char = '\u{1f}';

/// Name as used for slot ordering and identity keys
pub fn name_key(name: &str) -> &str {
    name.trim()
}

/// One participant and the deck they played
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Side {
    pub player: String,
    pub deck: String,
}

impl Side {
    pub fn new(player: &str, deck: &str) -> Self {
        Self {
            player: name_key(player).to_string(),
            deck: deck.trim().to_string(),
        }
    }
}

/// Which canonical slot a participant occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Primary,
    Secondary,
}

/// A match with participants in fixed name order.
///
/// `turn_order` and `outcome` are the primary side's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMatchEntry {
    pub date: NaiveDate,
    pub event: Option<String>,
    pub primary: Side,
    pub secondary: Side,
    pub turn_order: TurnOrder,
    pub outcome: Outcome,
    pub environment: String,
    pub note: Option<String>,
    pub source: SourceRef,
}

/// Groups reports of the same real-world match
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.replace(KEY_SEPARATOR, "|"))
    }
}

impl CanonicalMatchEntry {
    pub fn identity_key(&self) -> IdentityKey {
        let date = self.date.format("%Y-%m-%d").to_string();
        let parts = [
            date.as_str(),
            self.event.as_deref().unwrap_or(""),
            name_key(&self.primary.player),
            name_key(&self.secondary.player),
            self.primary.deck.as_str(),
            self.secondary.deck.as_str(),
        ];

        let mut key = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(part);
        }
        IdentityKey(key)
    }

    /// Short stable id of the match for exported rows
    pub fn match_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.identity_key().as_str().as_bytes());
        format!("{:x}", hasher.finalize())[..16].to_string()
    }

    pub fn involves(&self, player: &str) -> bool {
        self.slot_of(player).is_some()
    }

    /// Slot held by `player`; the primary slot wins for self-matches
    pub fn slot_of(&self, player: &str) -> Option<Slot> {
        let player = name_key(player);
        if name_key(&self.primary.player) == player {
            Some(Slot::Primary)
        } else if name_key(&self.secondary.player) == player {
            Some(Slot::Secondary)
        } else {
            None
        }
    }

    pub fn side(&self, slot: Slot) -> &Side {
        match slot {
            Slot::Primary => &self.primary,
            Slot::Secondary => &self.secondary,
        }
    }

    pub fn other_side(&self, slot: Slot) -> &Side {
        match slot {
            Slot::Primary => &self.secondary,
            Slot::Secondary => &self.primary,
        }
    }

    pub fn turn_order_for(&self, slot: Slot) -> TurnOrder {
        match slot {
            Slot::Primary => self.turn_order,
            Slot::Secondary => self.turn_order.inverted(),
        }
    }

    pub fn outcome_for(&self, slot: Slot) -> Outcome {
        match slot {
            Slot::Primary => self.outcome,
            Slot::Secondary => self.outcome.inverted(),
        }
    }

    pub fn has_deck(&self, deck: &str) -> bool {
        self.primary.deck == deck || self.secondary.deck == deck
    }

    pub fn is_self_match(&self) -> bool {
        name_key(&self.primary.player) == name_key(&self.secondary.player)
    }
}

/// Rewrite a raw entry into canonical slot order
pub fn canonicalize(raw: &RawMatchEntry) -> (CanonicalMatchEntry, Option<DataQualityWarning>) {
    let reporter = Side::new(&raw.player, &raw.own_deck);
    let opponent = Side::new(&raw.opponent, &raw.opponent_deck);

    let ordering = name_key(&reporter.player).cmp(name_key(&opponent.player));
    let warning = match ordering {
        Ordering::Equal => Some(DataQualityWarning::SelfMatch {
            row: raw.source.row,
            player: reporter.player.clone(),
        }),
        _ => None,
    };

    let (primary, secondary, turn_order, outcome) = match ordering {
        Ordering::Greater => (
            opponent,
            reporter,
            raw.turn_order.inverted(),
            raw.outcome.inverted(),
        ),
        Ordering::Less | Ordering::Equal => (reporter, opponent, raw.turn_order, raw.outcome),
    };

    let entry = CanonicalMatchEntry {
        date: raw.date,
        event: raw.event.clone(),
        primary,
        secondary,
        turn_order,
        outcome,
        environment: raw.environment.clone(),
        note: raw.note.clone(),
        source: raw.source.clone(),
    };

    (entry, warning)
}
