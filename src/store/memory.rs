//! In-memory record store

use super::RecordStore;
use crate::error::Result;
use crate::types::FeedbackRecord;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local store; starts empty ("no data yet") until the first append
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Option<Vec<FeedbackRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `records`
    pub fn with_records(records: Vec<FeedbackRecord>) -> Self {
        Self {
            records: RwLock::new(Some(records)),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn load(&self) -> Result<Option<Vec<FeedbackRecord>>> {
        Ok(self.records.read().await.clone())
    }

    async fn append(&self, record: &FeedbackRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.get_or_insert_with(Vec::new).push(record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
