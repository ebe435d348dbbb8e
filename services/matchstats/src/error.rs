//! Error and warning types shared by the normalization pipeline

use serde::Serialize;
use thiserror::Error;

/// A feed row that could not be turned into a match entry.
///
/// `row` is the 1-based sheet row the problem came from (the header is row 1).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("row {row}: malformed record: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("row {row}: unknown outcome label {label:?}")]
    UnknownOutcomeLabel { row: usize, label: String },
}

impl RecordError {
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            row,
            reason: reason.into(),
        }
    }

    pub fn row(&self) -> usize {
        match self {
            Self::MalformedRecord { row, .. } | Self::UnknownOutcomeLabel { row, .. } => *row,
        }
    }
}

/// Suspicious input that is kept in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Reporter and opponent carry the same name.
    SelfMatch { row: usize, player: String },
}

impl DataQualityWarning {
    pub fn row(&self) -> usize {
        match self {
            Self::SelfMatch { row, .. } => *row,
        }
    }
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfMatch { row, player } => {
                write!(f, "row {}: {:?} is recorded as playing against themselves", row, player)
            }
        }
    }
}

/// Rejected new-match submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("required fields are empty: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}
