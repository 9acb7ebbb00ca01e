//! Provider interfaces for the external classification capability.
//!
//! A [`PipelineProvider`] turns a [`Task`] into a ready [`TextClassifier`].
//! Implementations wrap an ONNX runtime session or a remote inference
//! endpoint; the service layer never sees which.

pub mod http;
#[cfg(feature = "onnx")]
pub mod onnx;

use crate::api::{ClassificationResult, Task};

/// Scores text with a loaded model.
///
/// Classifiers are shared across threads once loaded, so implementations
/// must be `Send + Sync` and guard any non-reentrant state internally.
pub trait TextClassifier: Send + Sync {
    /// Error type returned when scoring fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Classify the supplied text.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot score the input.
    fn classify(&self, input: &str) -> Result<ClassificationResult, Self::Error>;
}

/// Acquires a classifier for a pipeline task.
pub trait PipelineProvider: Send + Sync {
    /// Classifier produced on a successful acquisition.
    type Classifier: TextClassifier + 'static;
    /// Error type returned when the capability cannot be produced.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce a classifier for `task`, downloading or connecting as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if weights are missing, a download fails, or the
    /// task is not supported.
    fn acquire(&self, task: Task) -> Result<Self::Classifier, Self::Error>;
}

/// Select the highest-scoring candidate.
///
/// Non-finite scores never win; `None` is returned when no candidate has a
/// finite score.
pub(crate) fn top_candidate<I>(candidates: I) -> Option<ClassificationResult>
where
    I: IntoIterator<Item = ClassificationResult>,
{
    candidates
        .into_iter()
        .filter(|candidate| candidate.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))
}
