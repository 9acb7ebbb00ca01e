//! Validated runtime settings and provider configuration.

use std::{fmt, net::SocketAddr, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{DEFAULT_INPUT, Task, UnsupportedTask};

/// Address `serve` mode binds to unless configured otherwise.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Errors raised while turning raw arguments into [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown mode \"{0}\"; expected local, remote or serve")]
    UnknownMode(String),
    #[error("unknown provider \"{0}\"; expected onnx or api")]
    UnknownProvider(String),
    #[error(transparent)]
    Task(#[from] UnsupportedTask),
    #[error("{0}")]
    Invalid(String),
    #[error("invalid bind address \"{value}\": {source}")]
    Bind {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("the \"{0}\" feature is not enabled in this build")]
    FeatureDisabled(&'static str),
}

/// How the binary hosts the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Load and predict in-process, then exit.
    #[default]
    Local,
    /// Dispatch the prediction to a running server.
    Remote,
    /// Host the service over HTTP.
    Serve,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "serve" => Ok(Self::Serve),
            other => Err(ConfigError::UnknownMode(other.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Serve => "serve",
        })
    }
}

/// Where the classification capability comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Run an ONNX model in-process.
    Onnx(OnnxProviderConfig),
    /// Call an HTTP inference endpoint.
    Api(ApiProviderConfig),
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::Onnx(OnnxProviderConfig::default())
    }
}

impl ProviderConfig {
    /// Ensure the selected provider is usable.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    #[must_use = "Validation should not be ignored"]
    pub fn validate(self) -> Result<Self, ConfigError> {
        match self {
            Self::Onnx(cfg) => cfg.validate().map(Self::Onnx),
            Self::Api(cfg) => cfg.validate().map(Self::Api),
        }
    }
}

/// Configuration for the in-process ONNX provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnnxProviderConfig {
    /// Hub repository to download from; the default sentiment model when unset.
    #[serde(default)]
    pub model_repo: Option<String>,
    /// Hub revision to pin.
    #[serde(default)]
    pub revision: Option<String>,
    /// Local export directory; takes precedence over the hub.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,
    /// ONNX graph path relative to the repository or export directory.
    #[serde(default)]
    pub model_file: Option<String>,
    /// Expected SHA-256 of the ONNX graph, as hexadecimal.
    #[serde(default)]
    pub model_sha256: Option<String>,
    /// Expected SHA-256 of `tokenizer.json`, as hexadecimal.
    #[serde(default)]
    pub tokenizer_sha256: Option<String>,
}

impl OnnxProviderConfig {
    /// Ensure the configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory and a repository are both given, or
    /// if a pinned checksum is not a 64-digit hexadecimal string.
    #[must_use = "Validation should not be ignored"]
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.model_dir.is_some() && (self.model_repo.is_some() || self.revision.is_some()) {
            return Err(ConfigError::Invalid(
                "model_dir cannot be combined with model_repo or revision".into(),
            ));
        }
        for (name, digest) in [
            ("model_sha256", &self.model_sha256),
            ("tokenizer_sha256", &self.tokenizer_sha256),
        ] {
            if let Some(digest) = digest {
                if !is_sha256_hex(digest) {
                    return Err(ConfigError::Invalid(format!(
                        "{name} must be 64 hexadecimal digits"
                    )));
                }
            }
        }
        Ok(self)
    }
}

fn is_sha256_hex(value: &str) -> bool {
    let value = value.trim();
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Configuration for the HTTP inference provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiProviderConfig {
    /// Endpoint receiving `{"inputs": text}`.
    pub url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ApiProviderConfig {
    /// Ensure the configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is blank.
    #[must_use = "Validation should not be ignored"]
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.url.trim().is_empty() {
            Err(ConfigError::Invalid("api provider requires a url".into()))
        } else {
            Ok(self)
        }
    }
}

/// Fully validated settings for one run of the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    pub task: Task,
    pub text: String,
    pub provider: ProviderConfig,
    pub remote_url: Option<String>,
    pub bind: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Local,
            task: Task::TextClassification,
            text: DEFAULT_INPUT.to_owned(),
            provider: ProviderConfig::default(),
            remote_url: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

/// Parse a bind address.
///
/// # Errors
///
/// Returns [`ConfigError::Bind`] when `value` is not a socket address.
pub fn parse_bind(value: &str) -> Result<SocketAddr, ConfigError> {
    value.trim().parse().map_err(|source| ConfigError::Bind {
        value: value.to_owned(),
        source,
    })
}
