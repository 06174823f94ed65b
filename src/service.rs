//! Request/response handling over the three feedback operations
//!
//! [`FeedbackService`] is what the HTTP layer and the CLI both call:
//! score a submission, append the resulting record, and build the report
//! from stored state. It owns no state of its own beyond the injected scorer
//! and store.

use crate::error::Result;
use crate::report::FeedbackReport;
use crate::scoring::{SentimentScore, SentimentScorer};
use crate::store::RecordStore;
use crate::types::{FeedbackRecord, FeedbackSubmission};
use std::sync::Arc;
use tracing::{debug, info};

/// What happened to one submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Feedback text was empty; nothing was scored or stored
    Skipped,
    /// Record scored and appended
    Saved {
        record: FeedbackRecord,
        score: SentimentScore,
    },
}

impl SubmissionOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmissionOutcome::Saved { .. })
    }
}

/// Score → append → render
#[derive(Clone)]
pub struct FeedbackService {
    scorer: Arc<dyn SentimentScorer>,
    store: Arc<dyn RecordStore>,
}

impl FeedbackService {
    pub fn new(scorer: Arc<dyn SentimentScorer>, store: Arc<dyn RecordStore>) -> Self {
        Self { scorer, store }
    }

    pub fn scorer(&self) -> &Arc<dyn SentimentScorer> {
        &self.scorer
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Score `text` without storing anything
    pub fn score(&self, text: &str) -> Result<Option<SentimentScore>> {
        self.scorer.score(text)
    }

    /// Handle one form submission
    ///
    /// Empty feedback short-circuits before validation.
    pub async fn submit(&self, submission: FeedbackSubmission) -> Result<SubmissionOutcome> {
        if !submission.has_feedback() {
            debug!("Empty feedback submitted, skipping");
            return Ok(SubmissionOutcome::Skipped);
        }

        let respondent = submission.respondent()?;
        debug!("Scoring feedback: {:?}", submission.feedback);

        let score = match self.scorer.score(&submission.feedback)? {
            Some(score) => score,
            None => return Ok(SubmissionOutcome::Skipped),
        };

        let record = FeedbackRecord::new(respondent, submission.feedback, score.label);
        self.store.append(&record).await?;

        info!(
            "Feedback saved: {} (confidence {})",
            score.label,
            score
                .confidence
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "n/a".to_string())
        );

        Ok(SubmissionOutcome::Saved { record, score })
    }

    /// Build the report from everything stored; `None` when there is no data yet
    pub async fn report(&self) -> Result<Option<FeedbackReport>> {
        let records = self.store.load().await?;
        Ok(records.map(FeedbackReport::build))
    }
}
