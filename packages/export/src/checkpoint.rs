//! JSON checkpoint of merged records.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use inmate_roster_models::InmateRecord;
use serde::{Deserialize, Serialize};

use crate::ExportError;

/// Every merged record from one crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Id of the site definition that was crawled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// When the checkpoint was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// Records in roster order.
    pub records: Vec<InmateRecord>,
}

impl Checkpoint {
    /// Creates a checkpoint stamped with the current time.
    #[must_use]
    pub fn new(site_id: &str, records: Vec<InmateRecord>) -> Self {
        Self {
            site_id: Some(site_id.to_owned()),
            generated_at: Some(Utc::now()),
            records,
        }
    }
}

/// Accepts both the checkpoint object and a bare array of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum CheckpointFile {
    Checkpoint(Checkpoint),
    Records(Vec<InmateRecord>),
}

impl From<CheckpointFile> for Checkpoint {
    fn from(file: CheckpointFile) -> Self {
        match file {
            CheckpointFile::Checkpoint(checkpoint) => checkpoint,
            CheckpointFile::Records(records) => Self {
                site_id: None,
                generated_at: None,
                records,
            },
        }
    }
}

/// Writes `checkpoint` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or writing fails.
pub fn write_checkpoint<W: Write>(writer: W, checkpoint: &Checkpoint) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, checkpoint)?;
    Ok(())
}

/// Reads a checkpoint written by [`write_checkpoint`], or a bare JSON array
/// of records.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if the input is neither.
pub fn read_checkpoint<R: Read>(reader: R) -> Result<Checkpoint, ExportError> {
    let file: CheckpointFile = serde_json::from_reader(reader)?;
    Ok(file.into())
}

/// Saves a checkpoint to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be written.
pub fn save_checkpoint(path: &Path, checkpoint: &Checkpoint) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_checkpoint(&mut writer, checkpoint)?;
    writer.flush()?;
    log::info!(
        "Saved {} records to checkpoint {}",
        checkpoint.records.len(),
        path.display()
    );
    Ok(())
}

/// Loads a checkpoint from `path`.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be read or parsed.
pub fn load_checkpoint(path: &Path) -> Result<Checkpoint, ExportError> {
    let checkpoint = read_checkpoint(BufReader::new(File::open(path)?))?;
    log::info!(
        "Loaded {} records from checkpoint {}",
        checkpoint.records.len(),
        path.display()
    );
    Ok(checkpoint)
}
