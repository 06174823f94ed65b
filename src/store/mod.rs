//! Record store for submitted feedback
//!
//! The store is an injected interface so that scoring and rendering never
//! touch the file system directly. Two backends:
//!
//! - [`CsvRecordStore`]: the durable CSV table (`Name,Gender,Age,Email,Feedback,Sentiment`)
//! - [`MemoryRecordStore`]: process-local, used by tests and ephemeral runs

pub mod csv_store;
pub mod memory;

pub use csv_store::CsvRecordStore;
pub use memory::MemoryRecordStore;

use crate::error::Result;
use crate::types::FeedbackRecord;
use async_trait::async_trait;

/// Append-only table of feedback records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Full table in insertion order, or `None` when nothing was ever stored
    async fn load(&self) -> Result<Option<Vec<FeedbackRecord>>>;

    /// Add one record after the existing rows
    async fn append(&self, record: &FeedbackRecord) -> Result<()>;

    /// Human-readable location, for logs and health output
    fn describe(&self) -> String;
}
