use serde::{Deserialize, Serialize};

use crate::api::Task;
use crate::service::{ErrorKind, ServiceError};

/// Route answering readiness probes.
pub const HEALTH_PATH: &str = "/health";

/// Route dispatching a prediction.
pub const PREDICT_PATH: &str = "/v1/predict";

/// Body of a dispatched prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Readiness of the hosted service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub loaded: bool,
    pub task: Task,
}

/// Failure reported by the hosted service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
