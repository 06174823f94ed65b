//! Common test utilities and helpers

#![allow(dead_code)]

use mallfeedback_core::{
    CsvRecordStore, FeedbackService, FeedbackSubmission, LexiconScorer, MemoryRecordStore,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Store file name used by the form by default
pub const STORE_FILE: &str = "EB mall_feedback.csv";

/// Temp dir plus the CSV path inside it; the dir is removed on drop
pub fn temp_store_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(STORE_FILE);
    (dir, path)
}

/// Lexicon-scored service over a CSV store at `path`
pub fn csv_service(path: &Path) -> FeedbackService {
    FeedbackService::new(
        Arc::new(LexiconScorer::new()),
        Arc::new(CsvRecordStore::new(path)),
    )
}

/// Lexicon-scored service over an empty in-memory store
pub fn memory_service() -> FeedbackService {
    FeedbackService::new(
        Arc::new(LexiconScorer::new()),
        Arc::new(MemoryRecordStore::new()),
    )
}

pub fn sample_submission(name: &str, feedback: &str) -> FeedbackSubmission {
    FeedbackSubmission {
        name: name.to_string(),
        gender: "Female".to_string(),
        age: "29".to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        feedback: feedback.to_string(),
    }
}

/// Write a small binary classifier into `dir`
///
/// Vocabulary: great(0) clean(1) dirty(2) rude(3). Class 1 is Positive.
pub fn write_binary_classifier(dir: &Path, with_encoder: bool) {
    let vectorizer = json!({
        "vocabulary": {"great": 0, "clean": 1, "dirty": 2, "rude": 3},
        "lowercase": true,
        "binary": false,
        "ngram_range": [1, 1]
    });
    let classifier = json!({
        "coef": [[2.0, 1.5, -2.0, -1.5]],
        "intercept": [0.1],
        "classes": [0, 1]
    });

    std::fs::write(
        dir.join("vectorizer.json"),
        serde_json::to_string_pretty(&vectorizer).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("classifier.json"),
        serde_json::to_string_pretty(&classifier).unwrap(),
    )
    .unwrap();

    if with_encoder {
        let encoder = json!({"classes": ["Negative", "Positive"]});
        std::fs::write(
            dir.join("label_encoder.json"),
            serde_json::to_string_pretty(&encoder).unwrap(),
        )
        .unwrap();
    }
}
