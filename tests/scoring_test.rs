//! Scoring backends: lexicon polarity and loaded classifier artifacts

mod common;

use mallfeedback_core::config::ScoringSettings;
use mallfeedback_core::{
    build_scorer, ClassifierScorer, FeedbackError, LabelSpace, LexiconScorer, ScorerMode,
    Sentiment, SentimentScorer,
};
use tempfile::TempDir;

fn label(scorer: &dyn SentimentScorer, text: &str) -> Sentiment {
    scorer.score(text).unwrap().unwrap().label
}

#[test]
fn test_lexicon_form_scenarios() {
    let scorer = LexiconScorer::new();

    let positive = scorer
        .score("This mall is amazing and wonderful")
        .unwrap()
        .unwrap();
    assert_eq!(positive.label, Sentiment::Positive);
    assert!((positive.confidence.unwrap() - 0.8).abs() < 1e-9);

    let negative = scorer
        .score("The food court was terrible and awful")
        .unwrap()
        .unwrap();
    assert_eq!(negative.label, Sentiment::Negative);
    assert_eq!(negative.confidence, Some(-1.0));

    let neutral = scorer.score("I visited on Tuesday").unwrap().unwrap();
    assert_eq!(neutral.label, Sentiment::Neutral);
    assert_eq!(neutral.confidence, Some(0.0));
}

#[test]
fn test_lexicon_modifiers() {
    let scorer = LexiconScorer::new();

    // Negation flips a positive word
    assert_eq!(label(&scorer, "The staff were not friendly"), Sentiment::Negative);
    assert_eq!(label(&scorer, "Parking isn't terrible"), Sentiment::Positive);

    // Intensifier scales but stays within range
    let plain = scorer.polarity("good");
    let boosted = scorer.polarity("very good");
    assert!(boosted > plain);
    assert!(scorer.polarity("extremely wonderful") <= 1.0);
}

#[test]
fn test_lexicon_ignores_case_and_punctuation() {
    let scorer = LexiconScorer::new();
    assert_eq!(
        scorer.polarity("AMAZING!!! Wonderful..."),
        scorer.polarity("amazing wonderful")
    );
}

#[test]
fn test_empty_text_is_not_scored() {
    let scorer = LexiconScorer::new();
    assert!(scorer.score("").unwrap().is_none());
    assert!(scorer.score("   \n").unwrap().is_none());
}

#[test]
fn test_classifier_loads_from_directory() {
    let dir = TempDir::new().unwrap();
    common::write_binary_classifier(dir.path(), false);

    let scorer = ClassifierScorer::load(dir.path()).unwrap();
    assert_eq!(scorer.feature_count(), 4);
    assert_eq!(scorer.labels(), &[Sentiment::Negative, Sentiment::Positive]);
    assert_eq!(scorer.label_space(), LabelSpace::Binary);

    let good = scorer.score("Great and clean corridors").unwrap().unwrap();
    assert_eq!(good.label, Sentiment::Positive);
    assert!(good.confidence.unwrap() > 0.5);

    let bad = scorer.score("Dirty toilets, rude guards").unwrap().unwrap();
    assert_eq!(bad.label, Sentiment::Negative);
    assert!(bad.confidence.unwrap() > 0.5);
}

#[test]
fn test_classifier_with_label_encoder() {
    let dir = TempDir::new().unwrap();
    common::write_binary_classifier(dir.path(), true);

    let scorer = ClassifierScorer::load(dir.path()).unwrap();
    assert_eq!(scorer.labels(), &[Sentiment::Negative, Sentiment::Positive]);
    assert_eq!(label(&scorer, "great"), Sentiment::Positive);
}

#[test]
fn test_classifier_unknown_terms_fall_back_to_intercept() {
    let dir = TempDir::new().unwrap();
    common::write_binary_classifier(dir.path(), false);

    let scorer = ClassifierScorer::load(dir.path()).unwrap();
    // Positive intercept, no known terms
    assert_eq!(label(&scorer, "I visited on Tuesday"), Sentiment::Positive);
}

#[test]
fn test_missing_artifacts_are_reported() {
    let dir = TempDir::new().unwrap();

    let err = ClassifierScorer::load(dir.path()).unwrap_err();
    match err {
        FeedbackError::ModelArtifact { path, reason } => {
            assert!(path.ends_with("vectorizer.json"));
            assert_eq!(reason, "file not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_artifact_is_reported() {
    let dir = TempDir::new().unwrap();
    common::write_binary_classifier(dir.path(), false);
    std::fs::write(dir.path().join("classifier.json"), "{not json").unwrap();

    let err = ClassifierScorer::load(dir.path()).unwrap_err();
    assert!(matches!(err, FeedbackError::ModelArtifact { .. }));
    assert!(err.to_string().contains("malformed"));
}

#[test]
fn test_neutral_class_is_rejected() {
    let dir = TempDir::new().unwrap();
    common::write_binary_classifier(dir.path(), false);
    std::fs::write(
        dir.path().join("label_encoder.json"),
        r#"{"classes": ["Negative", "Neutral"]}"#,
    )
    .unwrap();

    assert!(matches!(
        ClassifierScorer::load(dir.path()),
        Err(FeedbackError::ModelArtifact { .. })
    ));
}

#[test]
fn test_build_scorer_selects_backend() {
    let dir = TempDir::new().unwrap();
    common::write_binary_classifier(dir.path(), false);

    let lexicon = build_scorer(&ScoringSettings {
        mode: ScorerMode::Lexicon,
        model_dir: dir.path().join("unused"),
    })
    .unwrap();
    assert_eq!(lexicon.mode(), ScorerMode::Lexicon);
    assert_eq!(lexicon.label_space(), LabelSpace::Ternary);

    let classifier = build_scorer(&ScoringSettings {
        mode: ScorerMode::Classifier,
        model_dir: dir.path().to_path_buf(),
    })
    .unwrap();
    assert_eq!(classifier.mode(), ScorerMode::Classifier);

    let missing = build_scorer(&ScoringSettings {
        mode: ScorerMode::Classifier,
        model_dir: dir.path().join("absent"),
    });
    assert!(missing.is_err());
}
