//! Output formatting and persistence for predictions and reports.
//!
//! Supports JSON logging, JSON files, and CSV append / rewrite.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::{EnrichedRow, ScoredRecord};
use crate::prediction::PredictionRecord;
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON, replacing the file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path = %path.display(), "JSON written");
    Ok(())
}

/// Appends a [`PredictionRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, record: &PredictionRecord) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    create_parent(path)?;
    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Writes scored history rows to a new CSV: the input columns followed by
/// year, month and AQI columns. The header comes from the first row.
pub fn write_enriched(path: &Path, records: &[ScoredRecord]) -> Result<()> {
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;

    for (i, record) in records.iter().enumerate() {
        let row = EnrichedRow::from(record);
        if i == 0 {
            writer.write_record(row.headers())?;
        }
        writer.write_record(row.values())?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = records.len(), "Enriched CSV written");
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(std::fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}
