//! Remote dispatch: host a loaded [`InferenceService`](crate::InferenceService)
//! over HTTP and call it as if it were local.
//!
//! The wire format is deliberately small. `GET /health` reports whether the
//! hosted service holds a classifier; `POST /v1/predict` takes
//! `{"text": "..."}` and answers with the same JSON a local
//! [`ClassificationResult`](crate::ClassificationResult) serialises to, or an
//! [`ErrorBody`] on failure.

mod client;
mod protocol;
mod server;

pub use client::{RemoteError, RemoteFunction};
pub use protocol::{ErrorBody, HEALTH_PATH, HealthBody, PREDICT_PATH, PredictRequest};
pub use server::{router, serve};
