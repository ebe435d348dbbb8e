//! Feed backed by a CSV export of the match sheet

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::FeedConfig;
use crate::feed::traits::{FeedRow, MatchFeed};
use crate::record::columns::APPEND_HEADER;

/// CSV file whose first line is the header row
pub struct CsvFeed {
    path: PathBuf,
}

impl CsvFeed {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(&config.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header of the existing file, or `None` when there is nothing to read
    fn read_header(&self) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open feed {:?}", self.path))?;
        let header: Vec<String> = reader
            .byte_headers()
            .with_context(|| format!("Failed to read header of {:?}", self.path))?
            .iter()
            .map(|h| clean_header(&String::from_utf8_lossy(h)))
            .collect();

        if header.iter().all(|h| h.is_empty()) {
            Ok(None)
        } else {
            Ok(Some(header))
        }
    }

    /// True when the file has content whose last line is unterminated
    fn lacks_trailing_newline(&self) -> Result<bool> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e).with_context(|| format!("Failed to open feed {:?}", self.path)),
        };
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n' && last[0] != b'\r')
    }
}

/// Trim a header cell, dropping a UTF-8 byte order mark
fn clean_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_string()
}

impl MatchFeed for CsvFeed {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_rows(&self) -> Result<Vec<FeedRow>> {
        if !self.path.exists() {
            tracing::warn!("Feed file {:?} does not exist, treating it as empty", self.path);
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open feed {:?}", self.path))?;
        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| clean_header(&String::from_utf8_lossy(h)))
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.byte_records().enumerate() {
            let record = record
                .with_context(|| format!("Failed to read data row {} of {:?}", index + 1, self.path))?;

            // Cells that are not UTF-8 are left out of the row, so the row is
            // reported by the parser instead of carrying mojibake into the stats
            let mut row = FeedRow::new();
            for (i, header) in headers.iter().enumerate().filter(|(_, h)| !h.is_empty()) {
                match std::str::from_utf8(record.get(i).unwrap_or(b"")) {
                    Ok(cell) => {
                        row.insert(header.clone(), cell.to_string());
                    }
                    Err(_) => tracing::warn!(
                        "Dropping non UTF-8 cell {} in sheet row {} of {:?}",
                        header,
                        index + 2,
                        self.path
                    ),
                }
            }
            rows.push(row);
        }

        tracing::info!("Read {} rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }

    fn append_row(&mut self, row: &FeedRow) -> Result<()> {
        let existing_header = self.read_header()?;
        let needs_newline = self.lacks_trailing_newline()?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open feed {:?} for append", self.path))?;
        if needs_newline {
            file.write_all(b"\n")?;
        }
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        let header = match existing_header {
            Some(header) => header,
            None => {
                let header: Vec<String> = APPEND_HEADER.iter().map(|h| h.to_string()).collect();
                writer.write_record(&header)?;
                header
            }
        };

        let cells: Vec<&str> = header
            .iter()
            .map(|column| row.get(column).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&cells)?;
        writer.flush()?;

        tracing::info!("Appended 1 row to {:?}", self.path);
        Ok(())
    }
}
