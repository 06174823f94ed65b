//! Pre-fitted bag-of-words classifier
//!
//! Artifacts live in one directory and are loaded once at startup:
//!
//! - `vectorizer.json`: `{"vocabulary": {"great": 0, ...}, "lowercase": true,
//!   "binary": false, "ngram_range": [1, 1]}`
//! - `classifier.json`: `{"coef": [[...]], "intercept": [...], "classes": [0, 1]}`
//! - `label_encoder.json` (optional): `{"classes": ["Negative", "Positive"]}`
//!
//! A single coefficient row is the binary logistic case: `sigmoid(w·x + b)`
//! is the probability of `classes[1]`. More rows are scored with softmax and
//! argmax. Every class must decode to Positive or Negative; anything else is
//! rejected at load time.

use super::patterns::TokenPatterns;
use super::{LabelSpace, SentimentScore, SentimentScorer};
use crate::config::ScorerMode;
use crate::error::{FeedbackError, Result};
use crate::types::Sentiment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Sparse feature vector: feature index → value
pub type FeatureVector = HashMap<usize, f64>;

/// Fitted text → feature-vector transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagOfWordsVectorizer {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// Presence (1.0) instead of counts
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl BagOfWordsVectorizer {
    /// Length of the feature vector
    pub fn feature_count(&self) -> usize {
        self.vocabulary.values().max().map(|max| max + 1).unwrap_or(0)
    }

    fn tokens(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        TokenPatterns::bag_of_words_token()
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Map text onto the fitted vocabulary; unknown terms are dropped
    pub fn transform(&self, text: &str) -> FeatureVector {
        let tokens = self.tokens(text);
        let (min_n, max_n) = self.ngram_range;
        let mut features = FeatureVector::new();

        for n in min_n.max(1)..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&term) {
                    let entry = features.entry(index).or_insert(0.0);
                    if self.binary {
                        *entry = 1.0;
                    } else {
                        *entry += 1.0;
                    }
                }
            }
        }

        features
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.vocabulary.is_empty() {
            return Err(FeedbackError::artifact(path, "vocabulary is empty"));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(FeedbackError::artifact(
                path,
                format!("invalid ngram_range ({}, {})", min_n, max_n),
            ));
        }
        Ok(())
    }
}

/// Class value as stored by the model: an encoded index or a label string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Index(usize),
    Name(String),
}

/// Fitted linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    pub classes: Vec<ClassLabel>,
}

impl LinearModel {
    fn validate(&self, path: &Path, feature_count: usize) -> Result<()> {
        if self.coef.is_empty() {
            return Err(FeedbackError::artifact(path, "coef has no rows"));
        }
        if self.coef.len() != self.intercept.len() {
            return Err(FeedbackError::artifact(
                path,
                format!(
                    "{} coef rows but {} intercepts",
                    self.coef.len(),
                    self.intercept.len()
                ),
            ));
        }
        let expected_classes = if self.coef.len() == 1 { 2 } else { self.coef.len() };
        if self.classes.len() != expected_classes {
            return Err(FeedbackError::artifact(
                path,
                format!(
                    "expected {} classes, found {}",
                    expected_classes,
                    self.classes.len()
                ),
            ));
        }
        if let Some(row) = self.coef.iter().find(|row| row.len() != feature_count) {
            return Err(FeedbackError::artifact(
                path,
                format!(
                    "coef row has {} weights but the vectorizer produces {} features",
                    row.len(),
                    feature_count
                ),
            ));
        }
        Ok(())
    }

    fn decision(&self, row: usize, features: &FeatureVector) -> f64 {
        let weights = &self.coef[row];
        let dot: f64 = features
            .iter()
            .map(|(&index, &value)| weights[index] * value)
            .sum();
        dot + self.intercept[row]
    }

    /// Class probabilities, aligned with `classes`
    pub fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        if self.coef.len() == 1 {
            let p = sigmoid(self.decision(0, features));
            return vec![1.0 - p, p];
        }

        let scores: Vec<f64> = (0..self.coef.len())
            .map(|row| self.decision(row, features))
            .collect();
        softmax(&scores)
    }

    /// Predicted class index and its probability
    ///
    /// The binary case picks `classes[1]` when p >= 0.5; otherwise the first
    /// class with the highest probability wins.
    pub fn predict(&self, features: &FeatureVector) -> (usize, f64) {
        let probabilities = self.predict_proba(features);
        if self.coef.len() == 1 {
            return if probabilities[1] >= 0.5 {
                (1, probabilities[1])
            } else {
                (0, probabilities[0])
            };
        }

        probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, p)| if p > acc.1 { (i, p) } else { acc })
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Maps encoded class indices back to label strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

/// Bag-of-words classifier scorer (binary label space)
#[derive(Debug, Clone)]
pub struct ClassifierScorer {
    vectorizer: BagOfWordsVectorizer,
    model: LinearModel,
    /// Decoded label per model class, same order as `model.classes`
    labels: Vec<Sentiment>,
}

impl ClassifierScorer {
    /// Load and cross-check artifacts from `model_dir`
    pub fn load(model_dir: &Path) -> Result<Self> {
        let vectorizer_path = model_dir.join(VECTORIZER_FILE);
        let model_path = model_dir.join(CLASSIFIER_FILE);
        let encoder_path = model_dir.join(LABEL_ENCODER_FILE);

        let vectorizer: BagOfWordsVectorizer = read_artifact(&vectorizer_path)?;
        let model: LinearModel = read_artifact(&model_path)?;
        let encoder: Option<LabelEncoder> = if encoder_path.exists() {
            Some(read_artifact(&encoder_path)?)
        } else {
            debug!("No label encoder at {:?}, decoding classes directly", encoder_path);
            None
        };

        let scorer = Self::from_parts(vectorizer, model, encoder).map_err(|e| match e {
            FeedbackError::ModelArtifact { reason, .. } => {
                FeedbackError::artifact(model_dir, reason)
            }
            other => other,
        })?;

        info!(
            "Classifier artifacts loaded from {:?}: classes {:?}",
            model_dir, scorer.labels
        );
        Ok(scorer)
    }

    /// Assemble a scorer from already-deserialized artifacts
    pub fn from_parts(
        vectorizer: BagOfWordsVectorizer,
        model: LinearModel,
        encoder: Option<LabelEncoder>,
    ) -> Result<Self> {
        let origin = Path::new("<in-memory>");
        vectorizer.validate(origin)?;
        model.validate(origin, vectorizer.feature_count())?;

        let labels = model
            .classes
            .iter()
            .map(|class| decode_class(class, encoder.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vectorizer,
            model,
            labels,
        })
    }

    pub fn feature_count(&self) -> usize {
        self.vectorizer.feature_count()
    }

    /// Decoded labels in model class order
    pub fn labels(&self) -> &[Sentiment] {
        &self.labels
    }
}

impl SentimentScorer for ClassifierScorer {
    fn mode(&self) -> ScorerMode {
        ScorerMode::Classifier
    }

    fn label_space(&self) -> LabelSpace {
        LabelSpace::Binary
    }

    fn score(&self, text: &str) -> Result<Option<SentimentScore>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let features = self.vectorizer.transform(text);
        let (best, probability) = self.model.predict(&features);

        let label = self.labels[best];
        debug!(
            "Classifier: {} known terms, p={:.3} -> {}",
            features.len(),
            probability,
            label
        );

        Ok(Some(SentimentScore {
            label,
            confidence: Some(probability),
        }))
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        let reason = if e.kind() == std::io::ErrorKind::NotFound {
            "file not found".to_string()
        } else {
            format!("unreadable: {}", e)
        };
        FeedbackError::artifact(path, reason)
    })?;

    serde_json::from_str(&content)
        .map_err(|e| FeedbackError::artifact(path, format!("malformed: {}", e)))
}

/// Decode one model class into a binary sentiment label
///
/// Without an encoder, indices follow the positive-class convention
/// (1 = Positive, 0 = Negative).
fn decode_class(class: &ClassLabel, encoder: Option<&LabelEncoder>) -> Result<Sentiment> {
    let origin = Path::new(CLASSIFIER_FILE);
    let name = match (class, encoder) {
        (ClassLabel::Index(index), Some(encoder)) => encoder
            .inverse_transform(*index)
            .ok_or_else(|| {
                FeedbackError::artifact(
                    LABEL_ENCODER_FILE,
                    format!("class index {} has no label", index),
                )
            })?
            .to_string(),
        (ClassLabel::Index(1), None) => return Ok(Sentiment::Positive),
        (ClassLabel::Index(0), None) => return Ok(Sentiment::Negative),
        (ClassLabel::Index(index), None) => {
            return Err(FeedbackError::artifact(
                origin,
                format!("class index {} needs a label encoder", index),
            ))
        }
        (ClassLabel::Name(name), _) => name.clone(),
    };

    let label: Sentiment = name
        .parse()
        .map_err(|_| FeedbackError::artifact(origin, format!("unknown class label '{}'", name)))?;

    if !LabelSpace::Binary.contains(label) {
        return Err(FeedbackError::artifact(
            origin,
            format!("class label '{}' is outside the Positive/Negative space", name),
        ));
    }
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer() -> BagOfWordsVectorizer {
        let vocabulary = [("great", 0), ("clean", 1), ("dirty", 2), ("rude", 3), ("not clean", 4)]
            .into_iter()
            .map(|(t, i)| (t.to_string(), i))
            .collect();
        BagOfWordsVectorizer {
            vocabulary,
            lowercase: true,
            binary: false,
            ngram_range: (1, 2),
        }
    }

    fn binary_model() -> LinearModel {
        LinearModel {
            coef: vec![vec![2.0, 1.5, -2.0, -1.5, -3.0]],
            intercept: vec![0.0],
            classes: vec![ClassLabel::Index(0), ClassLabel::Index(1)],
        }
    }

    #[test]
    fn test_transform_counts_unigrams_and_bigrams() {
        let features = vectorizer().transform("Great, GREAT mall but not clean");
        assert_eq!(features.get(&0), Some(&2.0));
        assert_eq!(features.get(&1), Some(&1.0));
        assert_eq!(features.get(&4), Some(&1.0));
        assert_eq!(features.len(), 3);
    }

    #[test]
    fn test_binary_presence() {
        let mut v = vectorizer();
        v.binary = true;
        let features = v.transform("great great great");
        assert_eq!(features.get(&0), Some(&1.0));
    }

    #[test]
    fn test_binary_logistic_prediction() {
        let scorer = ClassifierScorer::from_parts(vectorizer(), binary_model(), None).unwrap();

        let positive = scorer.score("great and clean").unwrap().unwrap();
        assert_eq!(positive.label, Sentiment::Positive);
        assert!(positive.confidence.unwrap() > 0.5);

        let negative = scorer.score("dirty and rude").unwrap().unwrap();
        assert_eq!(negative.label, Sentiment::Negative);
        assert!(negative.confidence.unwrap() >= 0.5);
    }

    #[test]
    fn test_unknown_text_falls_back_to_intercept() {
        let mut model = binary_model();
        model.intercept = vec![-0.4];
        let scorer = ClassifierScorer::from_parts(vectorizer(), model, None).unwrap();

        let score = scorer.score("the parking lot").unwrap().unwrap();
        assert_eq!(score.label, Sentiment::Negative);
        assert!((score.confidence.unwrap() - (1.0 - sigmoid(-0.4))).abs() < 1e-12);
    }

    #[test]
    fn test_even_odds_pick_second_class() {
        let scorer = ClassifierScorer::from_parts(vectorizer(), binary_model(), None).unwrap();

        // No known terms and a zero intercept: p = 0.5 exactly
        let score = scorer.score("the parking lot").unwrap().unwrap();
        assert_eq!(score.label, Sentiment::Positive);
        assert_eq!(score.confidence, Some(0.5));
    }

    #[test]
    fn test_softmax_argmax_with_encoder() {
        let model = LinearModel {
            coef: vec![vec![-1.0, -1.0, 1.0, 1.0, 1.0], vec![1.0, 1.0, -1.0, -1.0, -1.0]],
            intercept: vec![0.0, 0.0],
            classes: vec![ClassLabel::Index(0), ClassLabel::Index(1)],
        };
        let encoder = LabelEncoder {
            classes: vec!["negative".to_string(), "positive".to_string()],
        };
        let scorer = ClassifierScorer::from_parts(vectorizer(), model, Some(encoder)).unwrap();

        assert_eq!(scorer.labels(), &[Sentiment::Negative, Sentiment::Positive]);
        let score = scorer.score("clean").unwrap().unwrap();
        assert_eq!(score.label, Sentiment::Positive);
        let probabilities = softmax(&[-1.0, 1.0]);
        assert!((score.confidence.unwrap() - probabilities[1]).abs() < 1e-12);
    }

    #[test]
    fn test_string_classes_decode_directly() {
        let mut model = binary_model();
        model.classes = vec![
            ClassLabel::Name("Negative".to_string()),
            ClassLabel::Name("Positive".to_string()),
        ];
        let scorer = ClassifierScorer::from_parts(vectorizer(), model, None).unwrap();
        assert_eq!(scorer.label_space(), LabelSpace::Binary);
    }

    #[test]
    fn test_neutral_class_is_rejected() {
        let mut model = binary_model();
        model.classes = vec![
            ClassLabel::Name("Negative".to_string()),
            ClassLabel::Name("Neutral".to_string()),
        ];
        let err = ClassifierScorer::from_parts(vectorizer(), model, None).unwrap_err();
        assert!(matches!(err, FeedbackError::ModelArtifact { .. }));
    }

    #[test]
    fn test_feature_count_mismatch_is_rejected() {
        let mut model = binary_model();
        model.coef = vec![vec![1.0, 2.0]];
        let err = ClassifierScorer::from_parts(vectorizer(), model, None).unwrap_err();
        assert!(err.to_string().contains("features"));
    }

    #[test]
    fn test_index_without_encoder_beyond_binary_is_rejected() {
        let mut model = binary_model();
        model.classes = vec![ClassLabel::Index(0), ClassLabel::Index(2)];
        assert!(ClassifierScorer::from_parts(vectorizer(), model, None).is_err());
    }

    #[test]
    fn test_empty_text_is_not_scored() {
        let scorer = ClassifierScorer::from_parts(vectorizer(), binary_model(), None).unwrap();
        assert!(scorer.score("  ").unwrap().is_none());
    }
}
