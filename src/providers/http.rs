//! HTTP-backed classification provider.
//!
//! Sends text to an inference endpoint in the Hugging Face Inference API
//! shape: the request body is `{"inputs": "..."}` and the response is a list
//! of `{"label", "score"}` candidates, optionally nested one level deep. An
//! optional API key is sent as a bearer token.
//!
//! # Examples
//!
//! ```no_run
//! use text_classification::providers::http::ApiPipeline;
//! use text_classification::InferenceService;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ApiPipeline::new("http://localhost:8080/classify", None);
//! let mut service = InferenceService::new(pipeline);
//! service.load()?;
//! let result = service.predict("good job")?;
//! assert!(!result.label.is_empty());
//! # Ok(())
//! # }
//! ```

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::api::{ClassificationResult, Task};
use crate::providers::{PipelineProvider, TextClassifier, top_candidate};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error returned by [`ApiPipeline`] and [`ApiClassifier`].
#[derive(Debug, Error)]
pub enum ApiClassifierError {
    /// The endpoint URL is empty.
    #[error("inference endpoint URL is empty")]
    MissingUrl,
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response contained no candidate with a finite score.
    #[error("response contained no usable classification")]
    Empty,
    /// Response did not match the expected shape.
    #[error("invalid response")]
    InvalidResponse,
}

impl PartialEq for ApiClassifierError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::MissingUrl, Self::MissingUrl)
                | (Self::Empty, Self::Empty)
                | (Self::InvalidResponse, Self::InvalidResponse)
                | (Self::Client(_), Self::Client(_))
                | (Self::Request(_), Self::Request(_))
        )
    }
}

impl Eq for ApiClassifierError {}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiResponse {
    Nested(Vec<Vec<ClassificationResult>>),
    Flat(Vec<ClassificationResult>),
}

impl ApiResponse {
    fn into_candidates(self) -> Vec<ClassificationResult> {
        match self {
            Self::Nested(rows) => rows.into_iter().flatten().collect(),
            Self::Flat(candidates) => candidates,
        }
    }
}

/// Provider that hands classification to a remote inference endpoint.
#[derive(Debug, Clone)]
pub struct ApiPipeline {
    url: String,
    api_key: Option<String>,
}

impl ApiPipeline {
    /// Create a provider for the given endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            url: url.into(),
            api_key,
        }
    }
}

impl PipelineProvider for ApiPipeline {
    type Classifier = ApiClassifier;
    type Error = ApiClassifierError;

    fn acquire(&self, task: Task) -> Result<Self::Classifier, Self::Error> {
        if self.url.trim().is_empty() {
            return Err(ApiClassifierError::MissingUrl);
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiClassifierError::Client)?;
        debug!(url = %self.url, %task, "inference endpoint client ready");
        Ok(ApiClassifier {
            client,
            url: self.url.clone(),
            api_key: self.api_key.clone(),
        })
    }
}

/// Classifier backed by an HTTP inference endpoint.
#[derive(Debug, Clone)]
pub struct ApiClassifier {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl TextClassifier for ApiClassifier {
    type Error = ApiClassifierError;

    fn classify(&self, input: &str) -> Result<ClassificationResult, Self::Error> {
        let mut req = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "inputs": input }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send()?.error_for_status()?;
        let api: ApiResponse = resp
            .json()
            .map_err(|_| ApiClassifierError::InvalidResponse)?;
        top_candidate(api.into_candidates()).ok_or(ApiClassifierError::Empty)
    }
}
