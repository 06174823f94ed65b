//! Core data types for the feedback service
//!
//! This module defines the record written to the store, the raw form
//! submission it is built from, and the closed sets of values (gender,
//! sentiment label) that both are constrained to.

use crate::error::{FeedbackError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Youngest accepted respondent age
pub const MIN_AGE: u8 = 1;

/// Oldest accepted respondent age
pub const MAX_AGE: u8 = 120;

/// Respondent gender as offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// All options, in form order
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(FeedbackError::InvalidSubmission(format!(
                "Gender must be one of Male, Female, Other (got '{}')",
                s.trim()
            ))),
        }
    }
}

/// Sentiment label attached to every stored record
///
/// Declaration order doubles as the tie-break order in value counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Chart color for this label
    pub fn color(&self) -> &'static str {
        match self {
            Sentiment::Positive => "green",
            Sentiment::Negative => "red",
            Sentiment::Neutral => "gray",
        }
    }

    /// Marker shown next to the label in the UI
    pub fn icon(&self) -> &'static str {
        match self {
            Sentiment::Positive => "✅",
            Sentiment::Negative => "❌",
            Sentiment::Neutral => "⚪",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(FeedbackError::Other(format!(
                "Unknown sentiment label: {}",
                other
            ))),
        }
    }
}

/// One row of the record store
///
/// Field names serialize as the store's column headers
/// (`Name,Gender,Age,Email,Feedback,Sentiment`). Records are never mutated
/// after they are appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedbackRecord {
    pub name: String,
    pub gender: Gender,
    pub age: u8,
    pub email: String,
    pub feedback: String,
    pub sentiment: Sentiment,
}

impl FeedbackRecord {
    /// Column headers in storage order
    pub const COLUMNS: [&'static str; 6] = ["Name", "Gender", "Age", "Email", "Feedback", "Sentiment"];

    pub fn new(respondent: Respondent, feedback: String, sentiment: Sentiment) -> Self {
        Self {
            name: respondent.name,
            gender: respondent.gender,
            age: respondent.age,
            email: respondent.email,
            feedback,
            sentiment,
        }
    }
}

/// Validated respondent details (everything except the feedback text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Respondent {
    pub name: String,
    pub gender: Gender,
    pub age: u8,
    pub email: String,
}

/// Raw form input, exactly as the browser or CLI delivered it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSubmission {
    pub name: String,
    pub gender: String,
    pub age: String,
    pub email: String,
    pub feedback: String,
}

impl FeedbackSubmission {
    /// True when the feedback text has something besides whitespace
    pub fn has_feedback(&self) -> bool {
        !self.feedback.trim().is_empty()
    }

    /// Validate the respondent fields
    pub fn respondent(&self) -> Result<Respondent> {
        let gender: Gender = self.gender.parse()?;
        let age = parse_age(&self.age)?;

        Ok(Respondent {
            name: self.name.trim().to_string(),
            gender,
            age,
            email: self.email.trim().to_string(),
        })
    }
}

/// Parse an age field, enforcing the accepted range
pub fn parse_age(raw: &str) -> Result<u8> {
    let out_of_range = || {
        FeedbackError::InvalidSubmission(format!(
            "Age must be a whole number between {} and {} (got '{}')",
            MIN_AGE,
            MAX_AGE,
            raw.trim()
        ))
    };

    let value: i64 = raw.trim().parse().map_err(|_| out_of_range())?;
    if value < MIN_AGE as i64 || value > MAX_AGE as i64 {
        return Err(out_of_range());
    }
    Ok(value as u8)
}
