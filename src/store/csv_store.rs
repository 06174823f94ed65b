//! CSV-backed record store
//!
//! `append` is a read-modify-write of the whole table: load the existing
//! rows, add one, write everything to a uniquely named sibling temp file and
//! persist it over the existing file. Appends through the same store are
//! serialized by an async mutex whose guard is owned by the blocking write,
//! so a caller that stops waiting (timeout, dropped request) still holds
//! the lock until its write lands. Separate processes sharing the file are
//! not coordinated.

use super::RecordStore;
use crate::error::Result;
use crate::types::FeedbackRecord;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Record store persisted as a single CSV file
pub struct CsvRecordStore {
    path: PathBuf,
    append_lock: Arc<Mutex<()>>,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn load(&self) -> Result<Option<Vec<FeedbackRecord>>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_table(&path)).await?
    }

    async fn append(&self, record: &FeedbackRecord) -> Result<()> {
        let guard = Arc::clone(&self.append_lock).lock_owned().await;

        let path = self.path.clone();
        let record = record.clone();
        let rows = tokio::task::spawn_blocking(move || -> Result<usize> {
            let _guard = guard;
            let mut records = read_table(&path)?.unwrap_or_default();
            records.push(record);
            write_table(&path, &records)?;
            Ok(records.len())
        })
        .await??;

        info!("Appended record to {:?} ({} rows)", self.path, rows);
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Read the whole table; `None` when the file does not exist yet
pub fn read_table(path: &Path) -> Result<Option<Vec<FeedbackRecord>>> {
    if !path.exists() {
        debug!("Record store {:?} not found", path);
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<FeedbackRecord>, csv::Error>>()?;

    debug!("Loaded {} records from {:?}", records.len(), path);
    Ok(Some(records))
}

/// Replace the table with `records`, header first
pub fn write_table(path: &Path, records: &[FeedbackRecord]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(NamedTempFile::new_in(parent)?);
    writer.write_record(FeedbackRecord::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    let tmp = writer.into_inner().map_err(|e| e.into_error())?;

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
