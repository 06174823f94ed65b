//! mallfeedback - Feedback collection with sentiment scoring
//!
//! Collects visitor feedback through a form, labels the free text as
//! Positive / Negative / Neutral, appends the result to a CSV record store,
//! and redisplays the cumulative table with bar and pie charts.
//!
//! # Architecture
//!
//! - **Types**: the stored record and the raw form submission
//! - **Scoring**: lexicon polarity or pre-fitted bag-of-words classifier
//! - **Store**: append-only record table behind an injected trait
//! - **Report**: value counts, SVG charts, HTML / text views
//! - **Service**: score → append → render, shared by HTTP and CLI
//! - **API**: axum form surface
//!
//! # Example
//!
//! ```ignore
//! use mallfeedback_core::{CsvRecordStore, FeedbackService, FeedbackSubmission, LexiconScorer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = FeedbackService::new(
//!         Arc::new(LexiconScorer::new()),
//!         Arc::new(CsvRecordStore::new("EB mall_feedback.csv")),
//!     );
//!
//!     service.submit(FeedbackSubmission {
//!         name: "Asha".to_string(),
//!         gender: "Female".to_string(),
//!         age: "34".to_string(),
//!         email: "asha@example.com".to_string(),
//!         feedback: "This mall is amazing and wonderful".to_string(),
//!     }).await?;
//!
//!     if let Some(report) = service.report().await? {
//!         println!("{}", mallfeedback_core::report::render_text(&report));
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod report;
pub mod scoring;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{ChartStyle, FeedbackConfig, ScorerMode};
pub use error::{FeedbackError, Result};
pub use report::{FeedbackReport, SentimentCounts};
pub use scoring::{
    build_scorer, ClassifierScorer, LabelSpace, LexiconScorer, SentimentScore, SentimentScorer,
};
pub use service::{FeedbackService, SubmissionOutcome};
pub use store::{CsvRecordStore, MemoryRecordStore, RecordStore};
pub use types::{FeedbackRecord, FeedbackSubmission, Gender, Sentiment};
