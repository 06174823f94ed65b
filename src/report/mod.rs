//! Feedback report: the full table plus label counts and charts.
//!
//! A report is a pure function of the stored records and is rebuilt on every
//! view; nothing is cached.

pub mod chart;
pub mod render;

pub use chart::{bar_chart_svg, pie_chart_svg};
pub use render::{render_text, FeedbackPage, FlashMessage, ReportPage};

use crate::types::{FeedbackRecord, Sentiment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Count of one sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: Sentiment,
    pub count: usize,
}

/// Value counts of the sentiment column
///
/// Ordered by count descending, ties broken Positive, Negative, Neutral.
/// Labels that never occur are left out, so a single-label table has a
/// single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub entries: Vec<LabelCount>,
    pub total: usize,
}

impl SentimentCounts {
    pub fn from_records(records: &[FeedbackRecord]) -> Self {
        let mut tally: HashMap<Sentiment, usize> = HashMap::new();
        for record in records {
            *tally.entry(record.sentiment).or_insert(0) += 1;
        }

        let mut entries: Vec<LabelCount> = tally
            .into_iter()
            .map(|(label, count)| LabelCount { label, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.label.cmp(&b.label)));

        Self {
            entries,
            total: records.len(),
        }
    }

    /// Count for `label` (zero when absent)
    pub fn get(&self, label: Sentiment) -> usize {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Share of the total for `label`, in [0, 1]
    pub fn share(&self, label: Sentiment) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.get(label) as f64 / self.total as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the report views need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<FeedbackRecord>,
    pub counts: SentimentCounts,
}

impl FeedbackReport {
    pub fn build(records: Vec<FeedbackRecord>) -> Self {
        let counts = SentimentCounts::from_records(&records);
        Self {
            generated_at: Utc::now(),
            records,
            counts,
        }
    }
}
