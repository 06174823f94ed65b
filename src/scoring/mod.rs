//! Sentiment scoring for submitted feedback.
//!
//! Two interchangeable scorers sit behind [`SentimentScorer`]:
//!
//! - **LexiconScorer**: averages word polarities from a built-in lexicon into
//!   a document polarity in [-1, 1] and labels it Positive / Negative / Neutral
//! - **ClassifierScorer**: runs a pre-fitted bag-of-words vectorizer and
//!   linear model loaded from JSON artifacts, labelling Positive / Negative
//!
//! The two label spaces are deliberately kept apart ([`LabelSpace`]); a
//! classifier never emits Neutral.
//!
//! Both scorers return `Ok(None)` for empty or whitespace-only text: no
//! score, and therefore no record.

pub mod classifier;
pub mod lexicon;
pub mod patterns;

pub use classifier::{BagOfWordsVectorizer, ClassifierScorer, LabelEncoder, LinearModel};
pub use lexicon::LexiconScorer;

use crate::config::{ScorerMode, ScoringSettings};
use crate::error::Result;
use crate::types::Sentiment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Closed set of labels a scorer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSpace {
    /// Positive / Negative
    Binary,
    /// Positive / Negative / Neutral
    Ternary,
}

impl LabelSpace {
    pub fn labels(&self) -> &'static [Sentiment] {
        match self {
            LabelSpace::Binary => &[Sentiment::Positive, Sentiment::Negative],
            LabelSpace::Ternary => &Sentiment::ALL,
        }
    }

    pub fn contains(&self, label: Sentiment) -> bool {
        self.labels().contains(&label)
    }
}

/// Result of scoring one piece of feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: Sentiment,
    /// Lexicon mode: the raw polarity (not a probability).
    /// Classifier mode: the highest class probability.
    pub confidence: Option<f64>,
}

impl SentimentScore {
    /// Confidence line shown under the label, worded for the scorer that
    /// produced it
    pub fn confidence_caption(&self, mode: ScorerMode) -> Option<String> {
        self.confidence.map(|confidence| match mode {
            ScorerMode::Lexicon => format!("Confidence (polarity score): {:.2}", confidence),
            ScorerMode::Classifier => format!("Confidence: {:.2}", confidence),
        })
    }
}

/// A sentiment scorer with a fixed label space
pub trait SentimentScorer: Send + Sync {
    /// Which backend this is
    fn mode(&self) -> ScorerMode;

    /// Labels this scorer can return
    fn label_space(&self) -> LabelSpace;

    /// Score `text`; `Ok(None)` when the text is empty after trimming
    fn score(&self, text: &str) -> Result<Option<SentimentScore>>;
}

/// Build the scorer selected in configuration
///
/// Classifier artifacts are loaded here, once. A missing or malformed
/// artifact is returned as an error and must be treated as fatal.
pub fn build_scorer(settings: &ScoringSettings) -> Result<Arc<dyn SentimentScorer>> {
    match settings.mode {
        ScorerMode::Lexicon => {
            info!("Using lexicon polarity scorer");
            Ok(Arc::new(LexiconScorer::new()))
        }
        ScorerMode::Classifier => {
            let scorer = ClassifierScorer::load(&settings.model_dir)?;
            info!(
                "Loaded classifier from {:?} ({} features)",
                settings.model_dir,
                scorer.feature_count()
            );
            Ok(Arc::new(scorer))
        }
    }
}
