//! JSONL / JSON output of normalized records and statistics

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::normalize::{CanonicalMatchEntry, Normalized};
use crate::stats::StatsReport;

/// Exported form of a canonical record
#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    match_id: String,
    date: NaiveDate,
    event: Option<&'a str>,
    primary_player: &'a str,
    primary_deck: &'a str,
    secondary_player: &'a str,
    secondary_deck: &'a str,
    turn_order: &'static str,
    outcome: &'static str,
    environment: &'a str,
    note: Option<&'a str>,
    source_row: usize,
    edit_url: Option<&'a str>,
}

impl<'a> From<&'a CanonicalMatchEntry> for RecordLine<'a> {
    fn from(entry: &'a CanonicalMatchEntry) -> Self {
        Self {
            match_id: entry.match_id(),
            date: entry.date,
            event: entry.event.as_deref(),
            primary_player: &entry.primary.player,
            primary_deck: &entry.primary.deck,
            secondary_player: &entry.secondary.player,
            secondary_deck: &entry.secondary.deck,
            turn_order: entry.turn_order.label(),
            outcome: entry.outcome.label(),
            environment: &entry.environment,
            note: entry.note.as_deref(),
            source_row: entry.source.row,
            edit_url: entry.source.edit_url.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum IssueLine {
    Skipped { row: usize, error: String },
    Warning { row: usize, message: String },
}

fn ensure_dir(dir: &str) -> Result<PathBuf> {
    let dir = Path::new(dir).to_path_buf();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    Ok(dir)
}

/// Write canonical records, one JSON object per line
pub fn write_normalized_jsonl(dir: &str, records: &[CanonicalMatchEntry]) -> Result<PathBuf> {
    let path = ensure_dir(dir)?.join("normalized.jsonl");
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    for entry in records {
        let json = serde_json::to_string(&RecordLine::from(entry))?;
        writeln!(file, "{}", json)?;
    }

    tracing::info!("Wrote {} normalized records to {:?}", records.len(), path);
    Ok(path)
}

/// Write skipped rows and data-quality warnings of a pass
pub fn write_issues_jsonl(dir: &str, normalized: &Normalized) -> Result<PathBuf> {
    let path = ensure_dir(dir)?.join("issues.jsonl");
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    let skipped = normalized.skipped.iter().map(|e| IssueLine::Skipped {
        row: e.row(),
        error: e.to_string(),
    });
    let warnings = normalized.warnings.iter().map(|w| IssueLine::Warning {
        row: w.row(),
        message: w.to_string(),
    });

    let mut count = 0;
    for issue in skipped.chain(warnings) {
        writeln!(file, "{}", serde_json::to_string(&issue)?)?;
        count += 1;
    }

    tracing::info!("Wrote {} issues to {:?}", count, path);
    Ok(path)
}

pub fn write_stats_json(dir: &str, report: &StatsReport) -> Result<PathBuf> {
    let path = ensure_dir(dir)?.join("stats.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;

    tracing::info!("Wrote stats to {:?}", path);
    Ok(path)
}
