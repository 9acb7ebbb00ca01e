use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text fed to every entrypoint when no input is supplied.
pub const DEFAULT_INPUT: &str = "good job";

/// Outcome of classifying a single piece of text.
///
/// Only the top-scoring label is kept when the underlying capability returns
/// several candidates.
///
/// # Examples
///
/// ```
/// use text_classification::api::ClassificationResult;
///
/// let result = ClassificationResult::new("POSITIVE", 0.99);
/// let json = serde_json::to_string(&result).unwrap();
/// assert_eq!(json, r#"{"label":"POSITIVE","score":0.99}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub score: f32,
}

impl ClassificationResult {
    /// Create a result from a label and its confidence.
    #[must_use]
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Pipeline task requested from a provider at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    /// Single-label text classification, such as sentiment analysis.
    #[default]
    #[serde(alias = "sentiment-analysis")]
    TextClassification,
}

impl Task {
    /// Identifier understood by model pipelines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextClassification => "text-classification",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported task \"{0}\"")]
pub struct UnsupportedTask(pub String);

impl FromStr for Task {
    type Err = UnsupportedTask;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "text-classification" | "sentiment-analysis" => Ok(Self::TextClassification),
            other => Err(UnsupportedTask(other.to_owned())),
        }
    }
}

/// Two-step contract shared by every hosting adapter.
///
/// `load` runs once at cold start; `predict` may then be called any number
/// of times.
pub trait Predictor {
    /// Error type returned when loading or prediction fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prepare the underlying classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the classifier cannot be made ready.
    fn load(&mut self) -> Result<(), Self::Error>;

    /// Classify a single input.
    ///
    /// # Errors
    ///
    /// Returns an error if the predictor is not loaded or scoring fails.
    fn predict(&self, text: &str) -> Result<ClassificationResult, Self::Error>;
}
