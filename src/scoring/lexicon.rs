//! Lexicon polarity scoring
//!
//! Each word found in the polarity lexicon contributes its polarity to the
//! document. A preceding intensifier ("very", "really") scales the hit, a
//! preceding negator ("not", "never", "isn't") flips and halves it. The
//! document polarity is the mean of all hits, or exactly 0.0 when nothing in
//! the text is in the lexicon.
//!
//! Labelling compares against zero exactly: > 0 Positive, < 0 Negative,
//! == 0 Neutral.

use super::patterns::lexicon_words;
use super::{LabelSpace, SentimentScore, SentimentScorer};
use crate::config::ScorerMode;
use crate::error::Result;
use crate::types::Sentiment;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Multiplier applied to a hit preceded by a negator
const NEGATION_FACTOR: f64 = -0.5;

/// Adjective and verb polarities, one JSON object of word → score
const POLARITY_LEXICON: &str = include_str!("../../data/en-polarity.json");

/// Word polarity tables
pub struct PolarityDictionaries;

impl PolarityDictionaries {
    /// Word → polarity in [-1, 1], loaded from the embedded `en-polarity.json`
    pub fn polarity() -> &'static HashMap<String, f64> {
        static MAP: Lazy<HashMap<String, f64>> = Lazy::new(|| {
            serde_json::from_str(POLARITY_LEXICON).expect("Valid embedded polarity lexicon")
        });
        &MAP
    }

    /// Intensifier → multiplier applied to the next hit
    pub fn intensifiers() -> &'static HashMap<&'static str, f64> {
        static MAP: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
            [
                ("very", 1.3),
                ("really", 1.3),
                ("extremely", 1.5),
                ("incredibly", 1.5),
                ("so", 1.2),
                ("super", 1.3),
                ("too", 1.2),
                ("quite", 1.1),
                ("absolutely", 1.5),
                ("totally", 1.3),
                ("pretty", 1.1),
                ("somewhat", 0.7),
                ("slightly", 0.5),
            ]
            .into_iter()
            .collect()
        });
        &MAP
    }

    /// Negation markers
    pub fn negators() -> &'static HashSet<&'static str> {
        static SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
            ["not", "no", "never", "nothing", "hardly", "barely", "cannot"]
                .iter()
                .copied()
                .collect()
        });
        &SET
    }

    fn is_negator(word: &str) -> bool {
        Self::negators().contains(word) || word.ends_with("n't")
    }
}

/// Lexicon polarity scorer (ternary label space)
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    /// Document polarity in [-1, 1]
    pub fn polarity(&self, text: &str) -> f64 {
        let lexicon = PolarityDictionaries::polarity();
        let intensifiers = PolarityDictionaries::intensifiers();

        let mut hits: Vec<f64> = Vec::new();
        let mut negated = false;
        let mut intensity = 1.0;

        for word in lexicon_words(text) {
            if PolarityDictionaries::is_negator(&word) {
                negated = true;
                continue;
            }
            if let Some(factor) = intensifiers.get(word.as_str()) {
                intensity *= factor;
                continue;
            }
            if let Some(&polarity) = lexicon.get(word.as_str()) {
                let mut value = polarity * intensity;
                if negated {
                    value *= NEGATION_FACTOR;
                }
                hits.push(value.clamp(-1.0, 1.0));
            }
            // Modifiers only reach the word directly after them
            negated = false;
            intensity = 1.0;
        }

        if hits.is_empty() {
            return 0.0;
        }
        let mean = hits.iter().sum::<f64>() / hits.len() as f64;
        mean.clamp(-1.0, 1.0)
    }

    /// Map a polarity onto a label
    pub fn label_for(polarity: f64) -> Sentiment {
        if polarity > 0.0 {
            Sentiment::Positive
        } else if polarity < 0.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl SentimentScorer for LexiconScorer {
    fn mode(&self) -> ScorerMode {
        ScorerMode::Lexicon
    }

    fn label_space(&self) -> LabelSpace {
        LabelSpace::Ternary
    }

    fn score(&self, text: &str) -> Result<Option<SentimentScore>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let polarity = self.polarity(text);
        let label = Self::label_for(polarity);
        debug!("Lexicon polarity {:.3} -> {}", polarity, label);

        Ok(Some(SentimentScore {
            label,
            confidence: Some(polarity),
        }))
    }
}
