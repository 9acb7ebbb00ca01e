use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

use super::protocol::{ErrorBody, HEALTH_PATH, HealthBody, PREDICT_PATH, PredictRequest};
use crate::api::{ClassificationResult, Predictor};
use crate::service::ErrorKind;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors returned by [`RemoteFunction`].
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("remote service reported {kind:?}: {message}")]
    Service { kind: ErrorKind, message: String },
    #[error("invalid response from remote service")]
    InvalidResponse,
}

impl RemoteError {
    /// Service-side category, when the remote side reported one.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Service { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<ErrorBody> for RemoteError {
    fn from(body: ErrorBody) -> Self {
        Self::Service {
            kind: body.kind,
            message: body.message,
        }
    }
}

/// Handle to a service hosted with [`serve`](super::serve).
///
/// Calls block until the remote side answers and return the same
/// [`ClassificationResult`] a local service would.
#[derive(Debug, Clone)]
pub struct RemoteFunction {
    client: Client,
    base_url: String,
}

impl RemoteFunction {
    /// Create a handle for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Client`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RemoteError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { client, base_url })
    }

    /// Ask the remote side whether it holds a classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub fn health(&self) -> Result<HealthBody, RemoteError> {
        let resp = self
            .client
            .get(format!("{}{HEALTH_PATH}", self.base_url))
            .send()?
            .error_for_status()?;
        resp.json().map_err(|_| RemoteError::InvalidResponse)
    }

    /// Dispatch one prediction and wait for its result.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Service`] carrying the remote error kind, or a
    /// transport error.
    pub fn remote(&self, text: &str) -> Result<ClassificationResult, RemoteError> {
        debug!(url = %self.base_url, "dispatching prediction");
        let resp = self
            .client
            .post(format!("{}{PREDICT_PATH}", self.base_url))
            .json(&PredictRequest {
                text: text.to_owned(),
            })
            .send()?;
        if resp.status().is_success() {
            return resp.json().map_err(|_| RemoteError::InvalidResponse);
        }
        let status = resp.status();
        match resp.json::<ErrorBody>() {
            Ok(body) => Err(body.into()),
            Err(err) => {
                debug!(%status, error = %err, "remote error body was not understood");
                Err(RemoteError::InvalidResponse)
            }
        }
    }
}

impl Predictor for RemoteFunction {
    type Error = RemoteError;

    fn load(&mut self) -> Result<(), Self::Error> {
        let health = self.health()?;
        if health.loaded {
            Ok(())
        } else {
            Err(RemoteError::Service {
                kind: ErrorKind::NotLoaded,
                message: format!("remote {} classifier is not loaded", health.task),
            })
        }
    }

    fn predict(&self, text: &str) -> Result<ClassificationResult, Self::Error> {
        self.remote(text)
    }
}
