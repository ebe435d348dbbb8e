//! Selectable values for each filter dimension

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::normalize::CanonicalMatchEntry;
use crate::record::TurnOrder;
use crate::stats::filter::{DateRange, ALL};

/// Choices offered per dimension, each list starting with `"All"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub events: Vec<String>,
    pub players: Vec<String>,
    pub decks: Vec<String>,
    pub turn_orders: Vec<String>,
    pub environments: Vec<String>,
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

fn with_all<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = values.into_iter().filter(|v| !v.is_empty()).collect();
    std::iter::once(ALL)
        .chain(unique)
        .map(str::to_string)
        .collect()
}

impl FilterOptions {
    pub fn from_records(records: &[CanonicalMatchEntry]) -> Self {
        let turn_orders: BTreeSet<TurnOrder> = records.iter().map(|e| e.turn_order).collect();

        let date_bounds = records
            .iter()
            .map(|e| e.date)
            .min()
            .zip(records.iter().map(|e| e.date).max());

        Self {
            events: with_all(records.iter().filter_map(|e| e.event.as_deref())),
            players: with_all(
                records
                    .iter()
                    .flat_map(|e| [e.primary.player.as_str(), e.secondary.player.as_str()]),
            ),
            decks: with_all(
                records
                    .iter()
                    .flat_map(|e| [e.primary.deck.as_str(), e.secondary.deck.as_str()]),
            ),
            turn_orders: with_all(turn_orders.iter().map(|t| t.label())),
            environments: with_all(records.iter().map(|e| e.environment.as_str())),
            date_bounds,
        }
    }

    /// Full date span of the records, the default date filter
    pub fn default_date_range(&self) -> Option<DateRange> {
        self.date_bounds.map(|(start, end)| DateRange::new(start, end))
    }
}
