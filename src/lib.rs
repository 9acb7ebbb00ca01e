//! Load-once text classification behind a two-call contract.
//!
//! An [`InferenceService`] acquires a classifier from a
//! [`PipelineProvider`] on [`load`](InferenceService::load) and answers
//! [`predict`](InferenceService::predict) calls with a
//! [`ClassificationResult`]. Hosting adapters (the local entrypoint, remote
//! dispatch and the `textcls` binary) sit on top and never reach into the
//! provider directly.

pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod entrypoint;
#[cfg(feature = "cli")]
pub mod logging;
pub mod pipeline;
pub mod providers;
#[cfg(feature = "remote")]
pub mod remote;
pub mod service;

pub use api::{ClassificationResult, DEFAULT_INPUT, Predictor, Task};
#[cfg(feature = "cli")]
pub use cli::TextclsArgs;
pub use config::{ConfigError, Mode, ProviderConfig, Settings};
pub use pipeline::{Pipeline, PipelineError};
pub use providers::{PipelineProvider, TextClassifier};
#[cfg(feature = "remote")]
pub use remote::{RemoteError, RemoteFunction};
pub use service::{ErrorKind, InferenceService, ServiceError};
