//! Full normalization pass: parse, canonicalize, deduplicate

use serde::Serialize;

use crate::error::{DataQualityWarning, RecordError};
use crate::feed::FeedRow;
use crate::normalize::canonical::{canonicalize, CanonicalMatchEntry};
use crate::normalize::dedup::dedup;
use crate::record::{parse_row, sheet_row, RawMatchEntry};

/// Result of normalizing one feed snapshot
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<CanonicalMatchEntry>,
    pub skipped: Vec<RecordError>,
    pub warnings: Vec<DataQualityWarning>,
    pub duplicates_dropped: usize,
}

/// Counters of a normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeSummary {
    pub rows: usize,
    pub records: usize,
    pub skipped: usize,
    pub warnings: usize,
    pub duplicates_dropped: usize,
}

impl Normalized {
    pub fn summary(&self) -> NormalizeSummary {
        NormalizeSummary {
            rows: self.records.len() + self.skipped.len() + self.duplicates_dropped,
            records: self.records.len(),
            skipped: self.skipped.len(),
            warnings: self.warnings.len(),
            duplicates_dropped: self.duplicates_dropped,
        }
    }
}

/// Parse every row, skipping the ones that fail
pub fn parse_rows(rows: &[FeedRow]) -> (Vec<RawMatchEntry>, Vec<RecordError>) {
    let mut entries = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match parse_row(row, sheet_row(index)) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Skipping feed row: {}", e);
                skipped.push(e);
            }
        }
    }

    (entries, skipped)
}

/// Canonicalize and deduplicate already-parsed entries
pub fn normalize_entries(entries: &[RawMatchEntry]) -> Normalized {
    let mut warnings = Vec::new();
    let canonical: Vec<CanonicalMatchEntry> = entries
        .iter()
        .map(|raw| {
            let (entry, warning) = canonicalize(raw);
            if let Some(w) = warning {
                tracing::warn!("{}", w);
                warnings.push(w);
            }
            entry
        })
        .collect();

    let deduped = dedup(canonical);

    Normalized {
        records: deduped.retained,
        skipped: Vec::new(),
        warnings,
        duplicates_dropped: deduped.dropped.len(),
    }
}

/// Normalize one feed snapshot into canonical, duplicate-free records
pub fn normalize(rows: &[FeedRow]) -> Normalized {
    let (entries, skipped) = parse_rows(rows);
    let mut normalized = normalize_entries(&entries);
    normalized.skipped = skipped;

    tracing::info!(
        "Normalized {} rows into {} records ({} skipped, {} duplicates, {} warnings)",
        rows.len(),
        normalized.records.len(),
        normalized.skipped.len(),
        normalized.duplicates_dropped,
        normalized.warnings.len()
    );

    normalized
}
