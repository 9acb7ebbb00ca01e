//! Artefact resolution from the Hugging Face hub.

use std::path::PathBuf;

use hf_hub::{Repo, RepoType, api::sync::ApiBuilder};
use tracing::info;

use super::{
    artefact::OnnxArtefact, config::OnnxClassifierConfig, errors::OnnxClassifierError,
};

/// Hub repository serving the default sentiment model as ONNX.
pub const DEFAULT_MODEL_REPO: &str = "Xenova/distilbert-base-uncased-finetuned-sst-2-english";

/// Location of the ONNX graph inside [`DEFAULT_MODEL_REPO`].
pub const DEFAULT_MODEL_FILE: &str = "onnx/model.onnx";

/// Model published on the Hugging Face hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubModel {
    /// Repository identifier, such as `owner/name`.
    pub repo: String,
    /// Branch, tag or commit; the hub default branch when `None`.
    pub revision: Option<String>,
    /// Path of the ONNX graph within the repository.
    pub model_file: String,
    /// Download cache; falls back to `HF_HOME`, then `~/.cache/huggingface`.
    pub cache_dir: Option<PathBuf>,
}

impl Default for HubModel {
    fn default() -> Self {
        Self {
            repo: DEFAULT_MODEL_REPO.into(),
            revision: None,
            model_file: DEFAULT_MODEL_FILE.into(),
            cache_dir: None,
        }
    }
}

impl HubModel {
    /// Downloads (or reuses cached) artefacts and builds a classifier config.
    ///
    /// # Errors
    ///
    /// Returns an error when the hub client cannot be built, a file cannot
    /// be downloaded, or the model config declares no labels.
    pub fn resolve(&self) -> Result<OnnxClassifierConfig, OnnxClassifierError> {
        let cache_dir = self.cache_dir.clone().unwrap_or_else(default_cache_dir);
        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir)
            .build()
            .map_err(OnnxClassifierError::HubClient)?;
        let repo = match &self.revision {
            Some(revision) => {
                Repo::with_revision(self.repo.clone(), RepoType::Model, revision.clone())
            }
            None => Repo::model(self.repo.clone()),
        };
        let repo = api.repo(repo);

        let fetch = |file: &str| {
            info!(repo = %self.repo, file, "fetching model artefact");
            repo.get(file).map_err(|source| OnnxClassifierError::Download {
                repo: self.repo.clone(),
                file: file.to_owned(),
                source,
            })
        };

        let model = fetch(&self.model_file)?;
        let tokenizer = fetch("tokenizer.json")?;
        let model_config = fetch("config.json")?;
        OnnxClassifierConfig::from_files(
            OnnxArtefact::unpinned(model),
            OnnxArtefact::unpinned(tokenizer),
            &model_config,
        )
    }
}

fn default_cache_dir() -> PathBuf {
    std::env::var_os("HF_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache/huggingface"))
        })
        .unwrap_or_else(|| std::env::temp_dir().join("huggingface"))
}
