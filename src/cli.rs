//! CLI argument types and layered configuration for the `textcls` binary.
//! Loads from CLI args, environment (prefix `TEXTCLS_`), and optional config
//! files.

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use ortho_config::OrthoError;
use serde::Deserialize;
use std::path::PathBuf;

use crate::api::{DEFAULT_INPUT, Task};
use crate::config::{
    ApiProviderConfig, ConfigError, DEFAULT_BIND, Mode, OnnxProviderConfig, ProviderConfig,
    Settings, parse_bind,
};

/// Command-line arguments for the `textcls` binary.
///
/// Every field is optional so that unset values fall through to the next
/// layer; [`TextclsArgs::settings`] applies defaults and validation.
///
/// # Examples
///
/// Parse flags directly:
/// ```
/// use text_classification::cli::TextclsArgs;
/// use ortho_config::OrthoConfig;
///
/// let args = TextclsArgs::load_from_iter(["textcls", "--text", "great"])
///     .expect("load args from CLI iterator");
/// assert_eq!(args.text.as_deref(), Some("great"));
/// ```
///
/// Load from a configuration file:
/// ```
/// use text_classification::cli::TextclsArgs;
/// use ortho_config::OrthoConfig;
/// use std::io::Write;
/// use tempfile::NamedTempFile;
///
/// let mut file = NamedTempFile::new().expect("create temp file");
/// writeln!(file, "mode = \"remote\"").expect("write config");
/// let path = file.path().to_str().expect("path str");
/// let args = TextclsArgs::load_from_iter(["textcls", "--config-path", path])
///     .expect("load args from config path");
/// assert_eq!(args.mode.as_deref(), Some("remote"));
/// ```
#[derive(Debug, Default, Deserialize, ortho_config::OrthoConfig)]
#[ortho_config(prefix = "TEXTCLS")]
pub struct TextclsArgs {
    /// How to host the service: `local`, `remote` or `serve`.
    #[serde(default)]
    pub mode: Option<String>,

    /// Pipeline task requested at load time.
    #[serde(default)]
    pub task: Option<String>,

    /// Text to classify in `local` and `remote` modes.
    #[serde(default)]
    pub text: Option<String>,

    /// Classification provider: `onnx` or `api`.
    #[serde(default)]
    pub provider: Option<String>,

    /// Inference endpoint for the `api` provider.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer token for the `api` provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Hugging Face repository for the `onnx` provider.
    #[serde(default)]
    pub model_repo: Option<String>,

    /// Hub revision for the `onnx` provider.
    #[serde(default)]
    pub model_revision: Option<String>,

    /// Local export directory for the `onnx` provider.
    #[serde(default)]
    pub model_dir: Option<String>,

    /// ONNX graph path inside the repository or export directory.
    #[serde(default)]
    pub model_file: Option<String>,

    /// Expected SHA-256 of the ONNX graph.
    #[serde(default)]
    pub model_sha256: Option<String>,

    /// Expected SHA-256 of `tokenizer.json`.
    #[serde(default)]
    pub tokenizer_sha256: Option<String>,

    /// Base URL of a server started with `--mode serve`.
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Address `serve` mode listens on.
    #[serde(default)]
    pub bind: Option<String>,

    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Optional path to a configuration file.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl TextclsArgs {
    /// Load configuration solely from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if any variable cannot be parsed.
    pub fn load_from_env() -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Env::prefixed("TEXTCLS_"))
            .extract()
            .map_err(Into::into)
    }

    /// Load configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if the file cannot be read or parsed.
    pub fn load_from_config(path: &str) -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Toml::file(path))
            .extract()
            .map_err(Into::into)
    }

    /// Load configuration from environment variables and a file path.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if either source contains invalid values.
    pub fn load_from_env_and_config(path: &str) -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TEXTCLS_"))
            .extract()
            .map_err(Into::into)
    }

    /// Apply defaults and validate the merged arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid value.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mode = self
            .mode
            .as_deref()
            .map_or(Ok(Mode::default()), str::parse::<Mode>)?;
        let task = self
            .task
            .as_deref()
            .map_or(Ok(Task::default()), str::parse::<Task>)?;
        let provider = self.provider_config()?.validate()?;
        let remote_url = self.remote_url.clone().filter(|url| !url.trim().is_empty());
        if mode == Mode::Remote && remote_url.is_none() {
            return Err(ConfigError::Invalid("remote mode requires --remote-url".into()));
        }
        Ok(Settings {
            mode,
            task,
            text: self.text.clone().unwrap_or_else(|| DEFAULT_INPUT.to_owned()),
            provider,
            remote_url,
            bind: parse_bind(self.bind.as_deref().unwrap_or(DEFAULT_BIND))?,
        })
    }

    fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        match self.provider.as_deref().map(str::trim) {
            None | Some("onnx") => Ok(ProviderConfig::Onnx(OnnxProviderConfig {
                model_repo: self.model_repo.clone(),
                revision: self.model_revision.clone(),
                model_dir: self.model_dir.as_ref().map(PathBuf::from),
                model_file: self.model_file.clone(),
                model_sha256: self.model_sha256.clone(),
                tokenizer_sha256: self.tokenizer_sha256.clone(),
            })),
            Some("api") => Ok(ProviderConfig::Api(ApiProviderConfig {
                url: self.api_url.clone().unwrap_or_default(),
                api_key: self.api_key.clone(),
            })),
            Some(other) => Err(ConfigError::UnknownProvider(other.to_owned())),
        }
    }
}
