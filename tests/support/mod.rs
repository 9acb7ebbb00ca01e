//! Deterministic stand-ins for the external classification capability.
#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use text_classification::{ClassificationResult, PipelineProvider, Task, TextClassifier};
use thiserror::Error;

/// Errors raised by the stubs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StubError {
    #[error("weights could not be downloaded")]
    Unavailable,
    #[error("input was empty")]
    EmptyInput,
}

/// Provider whose classifier flags text containing "good" or "great" as
/// positive. Counts acquisitions and classifier calls.
#[derive(Debug, Clone, Default)]
pub struct StubPipeline {
    pub acquisitions: Arc<AtomicUsize>,
    pub calls: Arc<AtomicUsize>,
    fail: bool,
}

impl StubPipeline {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PipelineProvider for StubPipeline {
    type Classifier = StubClassifier;
    type Error = StubError;

    fn acquire(&self, _task: Task) -> Result<Self::Classifier, Self::Error> {
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(StubError::Unavailable)
        } else {
            Ok(StubClassifier {
                calls: Arc::clone(&self.calls),
            })
        }
    }
}

/// Classifier produced by [`StubPipeline`].
#[derive(Debug)]
pub struct StubClassifier {
    calls: Arc<AtomicUsize>,
}

impl TextClassifier for StubClassifier {
    type Error = StubError;

    fn classify(&self, input: &str) -> Result<ClassificationResult, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if input.is_empty() {
            return Err(StubError::EmptyInput);
        }
        let lowered = input.to_lowercase();
        if lowered.contains("good") || lowered.contains("great") {
            Ok(ClassificationResult::new("POSITIVE", 0.999_8))
        } else {
            Ok(ClassificationResult::new("NEGATIVE", 0.912_5))
        }
    }
}
