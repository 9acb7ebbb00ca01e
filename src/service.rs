//! The load-once inference service shared by every adapter.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ClassificationResult, Predictor, Task};
use crate::providers::{PipelineProvider, TextClassifier};

/// Boxed error produced by a provider or classifier.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`InferenceService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("classifier for task {task} could not be acquired: {source}")]
    ProviderUnavailable {
        task: Task,
        #[source]
        source: BoxError,
    },
    #[error("predict called before a classifier was loaded")]
    NotLoaded,
    #[error("inference failed: {0}")]
    InferenceFailure(#[source] BoxError),
}

impl ServiceError {
    /// Category of the failure, independent of its source.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProviderUnavailable { .. } => ErrorKind::ProviderUnavailable,
            Self::NotLoaded => ErrorKind::NotLoaded,
            Self::InferenceFailure(_) => ErrorKind::InferenceFailure,
        }
    }
}

/// Serialisable category of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ProviderUnavailable,
    NotLoaded,
    InferenceFailure,
}

/// Owns at most one classifier acquired from a [`PipelineProvider`].
///
/// The service starts unloaded. [`load`](Self::load) acquires the classifier
/// for the configured task, after which [`predict`](Self::predict) may be
/// called from any number of threads.
///
/// # Examples
///
/// ```
/// use text_classification::{ClassificationResult, InferenceService, ServiceError, Task};
/// use text_classification::providers::{PipelineProvider, TextClassifier};
///
/// struct Always;
///
/// impl TextClassifier for Always {
///     type Error = std::convert::Infallible;
///     fn classify(&self, _: &str) -> Result<ClassificationResult, Self::Error> {
///         Ok(ClassificationResult::new("POSITIVE", 1.0))
///     }
/// }
///
/// impl PipelineProvider for Always {
///     type Classifier = Always;
///     type Error = std::convert::Infallible;
///     fn acquire(&self, _: Task) -> Result<Always, Self::Error> {
///         Ok(Always)
///     }
/// }
///
/// let mut service = InferenceService::new(Always);
/// assert!(matches!(service.predict("hi"), Err(ServiceError::NotLoaded)));
/// service.load().unwrap();
/// assert_eq!(service.predict("hi").unwrap().label, "POSITIVE");
/// ```
pub struct InferenceService<P: PipelineProvider> {
    provider: P,
    task: Task,
    classifier: Option<P::Classifier>,
}

impl<P: PipelineProvider> fmt::Debug for InferenceService<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceService")
            .field("task", &self.task)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl<P: PipelineProvider> InferenceService<P> {
    /// Create an unloaded service for text classification.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_task(provider, Task::TextClassification)
    }

    /// Create an unloaded service for an explicit task.
    #[must_use]
    pub fn with_task(provider: P, task: Task) -> Self {
        Self {
            provider,
            task,
            classifier: None,
        }
    }

    /// Task requested from the provider on load.
    #[must_use]
    pub fn task(&self) -> Task {
        self.task
    }

    /// Whether a classifier is currently held.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Acquire the classifier from the provider.
    ///
    /// Any previously held classifier is released first, so a failed reload
    /// leaves the service unloaded.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ProviderUnavailable`] when the provider cannot
    /// produce a classifier.
    pub fn load(&mut self) -> Result<(), ServiceError> {
        self.classifier = None;
        info!(task = %self.task, "loading classifier");
        match self.provider.acquire(self.task) {
            Ok(classifier) => {
                self.classifier = Some(classifier);
                info!(task = %self.task, "classifier loaded");
                Ok(())
            }
            Err(source) => {
                warn!(task = %self.task, error = %source, "classifier load failed");
                Err(ServiceError::ProviderUnavailable {
                    task: self.task,
                    source: Box::new(source),
                })
            }
        }
    }

    /// Classify `text` with the loaded classifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotLoaded`] before a successful [`load`](Self::load)
    /// and [`ServiceError::InferenceFailure`] when scoring fails.
    pub fn predict(&self, text: &str) -> Result<ClassificationResult, ServiceError> {
        let classifier = self.classifier.as_ref().ok_or(ServiceError::NotLoaded)?;
        let result = classifier
            .classify(text)
            .map_err(|source| ServiceError::InferenceFailure(Box::new(source)))?;
        debug!(label = %result.label, score = result.score, "prediction complete");
        Ok(result)
    }
}

impl<P: PipelineProvider> Predictor for InferenceService<P> {
    type Error = ServiceError;

    fn load(&mut self) -> Result<(), Self::Error> {
        Self::load(self)
    }

    fn predict(&self, text: &str) -> Result<ClassificationResult, Self::Error> {
        Self::predict(self, text)
    }
}
