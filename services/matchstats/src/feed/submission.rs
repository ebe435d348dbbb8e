//! New-match submissions and the candidate lists offered when entering them

use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::error::SubmissionError;
use crate::feed::traits::{FeedRow, MatchFeed};
use crate::record::{columns, sheet_row, Outcome, RawMatchEntry, SourceRef, TurnOrder};

/// A form field that can be typed in or picked from the candidate list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldInput {
    pub typed: String,
    pub selected: String,
}

impl FieldInput {
    pub fn typed(value: &str) -> Self {
        Self {
            typed: value.to_string(),
            selected: String::new(),
        }
    }

    pub fn selected(value: &str) -> Self {
        Self {
            typed: String::new(),
            selected: value.to_string(),
        }
    }

    /// A picked candidate wins over typed text
    pub fn resolve(&self) -> String {
        let selected = self.selected.trim();
        if selected.is_empty() {
            self.typed.trim().to_string()
        } else {
            strip_display_suffix(selected).to_string()
        }
    }
}

/// One match as entered in the submission form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSubmission {
    pub date: NaiveDate,
    pub event: FieldInput,
    pub player: FieldInput,
    pub own_deck: FieldInput,
    pub turn_order: TurnOrder,
    pub opponent_deck: FieldInput,
    pub opponent: FieldInput,
    pub outcome: Outcome,
    pub environment: FieldInput,
    pub note: String,
}

impl MatchSubmission {
    /// Check required fields and build the entry to append
    pub fn validate(&self) -> Result<RawMatchEntry, SubmissionError> {
        let player = self.player.resolve();
        let own_deck = self.own_deck.resolve();
        let opponent_deck = self.opponent_deck.resolve();
        let opponent = self.opponent.resolve();
        let environment = self.environment.resolve();

        let missing: Vec<&'static str> = [
            (columns::PLAYER, &player),
            (columns::OWN_DECK, &own_deck),
            (columns::OPPONENT_DECK, &opponent_deck),
            (columns::OPPONENT, &opponent),
            (columns::ENVIRONMENT, &environment),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(column, _)| column)
        .collect();

        if !missing.is_empty() {
            return Err(SubmissionError::MissingFields(missing));
        }

        let mut entry = RawMatchEntry::new(
            self.date,
            &player,
            &own_deck,
            &opponent,
            &opponent_deck,
            self.turn_order,
            self.outcome,
            &environment,
        );
        let event = self.event.resolve();
        if !event.is_empty() {
            entry = entry.with_event(&event);
        }
        let note = self.note.trim();
        if !note.is_empty() {
            entry = entry.with_note(note);
        }
        Ok(entry)
    }
}

/// Spreadsheet link pointing at `row`
pub fn edit_link(sheet_id: &str, row: usize) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/edit#gid=0&range=A{}",
        sheet_id, row
    )
}

/// The feed row written for an entry; the entry is not canonicalized
pub fn entry_to_row(entry: &RawMatchEntry) -> FeedRow {
    [
        (columns::EDIT_URL, entry.source.edit_url.clone().unwrap_or_default()),
        (columns::DATE, entry.date.format("%Y/%m/%d").to_string()),
        (columns::EVENT, entry.event.clone().unwrap_or_default()),
        (columns::PLAYER, entry.player.clone()),
        (columns::OWN_DECK, entry.own_deck.clone()),
        (columns::TURN_ORDER, entry.turn_order.label().to_string()),
        (columns::OPPONENT_DECK, entry.opponent_deck.clone()),
        (columns::OPPONENT, entry.opponent.clone()),
        (columns::OUTCOME, entry.outcome.label().to_string()),
        (columns::ENVIRONMENT, entry.environment.clone()),
        (columns::NOTE, entry.note.clone().unwrap_or_default()),
    ]
    .into_iter()
    .map(|(column, value)| (column.to_string(), value))
    .collect()
}

/// Appends validated submissions to a feed
pub struct Submitter<F: MatchFeed> {
    feed: F,
    sheet_id: Option<String>,
}

impl<F: MatchFeed> Submitter<F> {
    pub fn new(feed: F, sheet_id: Option<String>) -> Self {
        Self { feed, sheet_id }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn into_feed(self) -> F {
        self.feed
    }

    /// Validate and append one submission, returning the written entry
    pub fn submit(&mut self, submission: &MatchSubmission) -> Result<RawMatchEntry> {
        let entry = submission.validate()?;

        let row = sheet_row(self.feed.fetch_rows()?.len());
        let edit_url = self.sheet_id.as_deref().map(|id| edit_link(id, row));
        let entry = entry.with_source(SourceRef { row, edit_url });

        self.feed.append_row(&entry_to_row(&entry))?;
        tracing::info!(
            "Appended match {} vs {} on {} to {} feed at row {}",
            entry.player,
            entry.opponent,
            entry.date,
            self.feed.name(),
            row
        );
        Ok(entry)
    }
}

/// Sorted distinct non-empty values of one column
pub fn candidates(rows: &[FeedRow], column: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(column))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn katakana_to_hiragana(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{30A1}'..='\u{30F6}' => char::from_u32(ch as u32 - 0x60).unwrap_or(ch),
            _ => ch,
        })
        .collect()
}

/// `"orig (reading)"` when the hiragana reading differs from the text
pub fn display_option(candidate: &str) -> String {
    let reading = katakana_to_hiragana(candidate);
    if !reading.is_empty() && reading != candidate {
        format!("{} ({})", candidate, reading)
    } else {
        candidate.to_string()
    }
}

pub fn display_options(candidates: &[String]) -> Vec<String> {
    candidates.iter().map(|c| display_option(c)).collect()
}

pub fn strip_display_suffix(option: &str) -> &str {
    option.split(" (").next().unwrap_or(option)
}
