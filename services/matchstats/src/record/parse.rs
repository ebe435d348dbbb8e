//! Feed row -> RawMatchEntry

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::RecordError;
use crate::feed::FeedRow;
use crate::record::columns;
use crate::record::model::*;

/// Sheet row number of the data row at `index` (the header occupies row 1)
pub fn sheet_row(index: usize) -> usize {
    index + 2
}

/// Parse one feed row. `row` is the sheet row number used in errors.
pub fn parse_row(cells: &FeedRow, row: usize) -> Result<RawMatchEntry, RecordError> {
    let date_text = cells
        .get(columns::DATE)
        .ok_or_else(|| RecordError::malformed(row, "date column is missing"))?;
    let date = parse_date(date_text)
        .ok_or_else(|| RecordError::malformed(row, format!("unparseable date {:?}", date_text)))?;

    let player = required(cells, columns::PLAYER, row)?;
    let own_deck = required(cells, columns::OWN_DECK, row)?;
    let opponent = required(cells, columns::OPPONENT, row)?;
    let opponent_deck = required(cells, columns::OPPONENT_DECK, row)?;

    let turn_text = required(cells, columns::TURN_ORDER, row)?;
    let turn_order = TurnOrder::from_label(&turn_text).ok_or_else(|| {
        RecordError::malformed(row, format!("unknown turn order {:?}", turn_text))
    })?;

    let outcome = parse_outcome(cells, row)?;

    let edit_url = optional(cells, columns::EDIT_URL);

    Ok(RawMatchEntry {
        date,
        event: optional(cells, columns::EVENT),
        player,
        own_deck,
        opponent,
        opponent_deck,
        turn_order,
        outcome,
        environment: optional(cells, columns::ENVIRONMENT).unwrap_or_default(),
        note: optional(cells, columns::NOTE),
        source: SourceRef { row, edit_url },
    })
}

/// Parse the leading calendar date of a cell, ignoring any time part.
///
/// Accepts `2024/01/05`, `2024-1-5`, `2024.01.05` and the same followed by a time.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    static DATE_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let re = DATE_PREFIX
        .get_or_init(|| Regex::new(r"^\s*(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})(?:$|[\sT])").ok())
        .as_ref()?;

    let caps = re.captures(text)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Outcome from `win_flag` when it carries a value, else from the `勝敗` label
fn parse_outcome(cells: &FeedRow, row: usize) -> Result<Outcome, RecordError> {
    if let Some(flag) = optional(cells, columns::WIN_FLAG) {
        return Outcome::from_flag(&flag)
            .ok_or(RecordError::UnknownOutcomeLabel { row, label: flag });
    }

    match cells.get(columns::OUTCOME) {
        Some(label) => Outcome::from_label(label).ok_or_else(|| RecordError::UnknownOutcomeLabel {
            row,
            label: label.trim().to_string(),
        }),
        None => Err(RecordError::malformed(row, "no outcome or win_flag column")),
    }
}

/// Column must exist; an empty value is kept as an empty string
fn required(cells: &FeedRow, column: &str, row: usize) -> Result<String, RecordError> {
    cells
        .get(column)
        .map(|value| value.trim().to_string())
        .ok_or_else(|| RecordError::malformed(row, format!("column {} is missing", column)))
}

fn optional(cells: &FeedRow, column: &str) -> Option<String> {
    cells
        .get(column)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(pairs: &[(&str, &str)]) -> FeedRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_row() -> FeedRow {
        make_row(&[
            (columns::EDIT_URL, "https://example.test/edit#A2"),
            (columns::DATE, "2024/01/05"),
            (columns::EVENT, "Weekly Cup"),
            (columns::PLAYER, " Bob "),
            (columns::OWN_DECK, "Red"),
            (columns::TURN_ORDER, "先攻"),
            (columns::OPPONENT_DECK, "Blue"),
            (columns::OPPONENT, "Alice"),
            (columns::OUTCOME, "勝ち"),
            (columns::ENVIRONMENT, "Standard"),
            (columns::NOTE, ""),
        ])
    }

    #[test]
    fn test_parse_full_row() {
        let entry = parse_row(&full_row(), 2).unwrap();

        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(entry.event.as_deref(), Some("Weekly Cup"));
        assert_eq!(entry.player, "Bob");
        assert_eq!(entry.opponent, "Alice");
        assert_eq!(entry.turn_order, TurnOrder::First);
        assert_eq!(entry.outcome, Outcome::Win);
        assert_eq!(entry.environment, "Standard");
        assert_eq!(entry.note, None);
        assert_eq!(entry.source.row, 2);
        assert_eq!(entry.source.edit_url.as_deref(), Some("https://example.test/edit#A2"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024/03/09"), expected);
        assert_eq!(parse_date("2024-3-9"), expected);
        assert_eq!(parse_date("2024.03.09"), expected);
        assert_eq!(parse_date("2024/03/09 21:15:00"), expected);
        assert_eq!(parse_date("2024-03-09T21:15:00"), expected);
        assert_eq!(parse_date("2024/13/01"), None);
        assert_eq!(parse_date("20240309"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let mut row = full_row();
        row.insert(columns::DATE.to_string(), "yesterday".to_string());

        let err = parse_row(&row, 4).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRecord { row: 4, .. }));
    }

    #[test]
    fn test_missing_structural_column_is_malformed() {
        for column in [columns::PLAYER, columns::OWN_DECK, columns::OPPONENT, columns::OPPONENT_DECK] {
            let mut row = full_row();
            row.remove(column);
            let err = parse_row(&row, 3).unwrap_err();
            assert!(matches!(err, RecordError::MalformedRecord { row: 3, .. }), "{}", column);
        }
    }

    #[test]
    fn test_empty_structural_value_is_tolerated() {
        let mut row = full_row();
        row.insert(columns::OPPONENT_DECK.to_string(), "".to_string());

        let entry = parse_row(&row, 2).unwrap();
        assert_eq!(entry.opponent_deck, "");
    }

    #[test]
    fn test_unknown_outcome_label() {
        let mut row = full_row();
        row.insert(columns::OUTCOME.to_string(), "引き分け".to_string());

        let err = parse_row(&row, 5).unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownOutcomeLabel { row: 5, label: "引き分け".to_string() }
        );
    }

    #[test]
    fn test_win_flag_takes_precedence() {
        let mut row = full_row();
        row.insert(columns::WIN_FLAG.to_string(), "0".to_string());
        assert_eq!(parse_row(&row, 2).unwrap().outcome, Outcome::Loss);

        // An empty flag falls back to the label
        row.insert(columns::WIN_FLAG.to_string(), "".to_string());
        assert_eq!(parse_row(&row, 2).unwrap().outcome, Outcome::Win);

        row.insert(columns::WIN_FLAG.to_string(), "maybe".to_string());
        assert!(matches!(
            parse_row(&row, 2),
            Err(RecordError::UnknownOutcomeLabel { .. })
        ));
    }

    #[test]
    fn test_missing_outcome_columns() {
        let mut row = full_row();
        row.remove(columns::OUTCOME);
        assert!(matches!(parse_row(&row, 2), Err(RecordError::MalformedRecord { .. })));
    }

    #[test]
    fn test_optional_columns_degrade() {
        let mut row = full_row();
        for column in [columns::EVENT, columns::ENVIRONMENT, columns::NOTE, columns::EDIT_URL] {
            row.remove(column);
        }

        let entry = parse_row(&row, 2).unwrap();
        assert_eq!(entry.event, None);
        assert_eq!(entry.environment, "");
        assert_eq!(entry.source.edit_url, None);
    }

    #[test]
    fn test_unknown_turn_order() {
        let mut row = full_row();
        row.insert(columns::TURN_ORDER.to_string(), "?".to_string());
        assert!(matches!(parse_row(&row, 2), Err(RecordError::MalformedRecord { .. })));
    }

    #[test]
    fn test_sheet_row() {
        assert_eq!(sheet_row(0), 2);
        assert_eq!(sheet_row(9), 11);
    }
}
