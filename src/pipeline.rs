//! Runtime selection between the configured providers.

use thiserror::Error;

use crate::api::{ClassificationResult, Task};
use crate::config::{ConfigError, ProviderConfig};
use crate::providers::http::{ApiClassifier, ApiClassifierError, ApiPipeline};
#[cfg(feature = "onnx")]
use crate::providers::onnx::{
    ArtefactPins, DEFAULT_MODEL_FILE, DEFAULT_MODEL_REPO, HubModel, OnnxClassifierError,
    OnnxPipeline, OnnxTextClassifier,
};
use crate::providers::{PipelineProvider, TextClassifier};

/// Provider chosen from a [`ProviderConfig`].
#[derive(Debug, Clone)]
pub enum Pipeline {
    Api(ApiPipeline),
    #[cfg(feature = "onnx")]
    Onnx(OnnxPipeline),
}

/// Classifier produced by a [`Pipeline`].
#[derive(Debug)]
pub enum PipelineClassifier {
    Api(ApiClassifier),
    #[cfg(feature = "onnx")]
    Onnx(OnnxTextClassifier),
}

/// Errors from whichever provider a [`Pipeline`] wraps.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Api(#[from] ApiClassifierError),
    #[cfg(feature = "onnx")]
    #[error(transparent)]
    Onnx(#[from] OnnxClassifierError),
}

impl Pipeline {
    /// Build the provider described by `config`.
    ///
    /// No artefact is read and no connection is made until
    /// [`PipelineProvider::acquire`] runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FeatureDisabled`] when the configuration names
    /// a provider this build does not include.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        match config {
            ProviderConfig::Api(api) => Ok(Self::Api(ApiPipeline::new(
                api.url.clone(),
                api.api_key.clone(),
            ))),
            #[cfg(feature = "onnx")]
            ProviderConfig::Onnx(onnx) => {
                let model_file = onnx
                    .model_file
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MODEL_FILE.to_owned());
                let pipeline = match &onnx.model_dir {
                    Some(dir) => OnnxPipeline::export_dir(dir.clone(), model_file),
                    None => OnnxPipeline::hub(HubModel {
                        repo: onnx
                            .model_repo
                            .clone()
                            .unwrap_or_else(|| DEFAULT_MODEL_REPO.to_owned()),
                        revision: onnx.revision.clone(),
                        model_file,
                        cache_dir: None,
                    }),
                };
                Ok(Self::Onnx(pipeline.with_pins(ArtefactPins {
                    model: onnx.model_sha256.clone(),
                    tokenizer: onnx.tokenizer_sha256.clone(),
                })))
            }
            #[cfg(not(feature = "onnx"))]
            ProviderConfig::Onnx(_) => Err(ConfigError::FeatureDisabled("onnx")),
        }
    }
}

impl PipelineProvider for Pipeline {
    type Classifier = PipelineClassifier;
    type Error = PipelineError;

    fn acquire(&self, task: Task) -> Result<Self::Classifier, Self::Error> {
        match self {
            Self::Api(pipeline) => Ok(PipelineClassifier::Api(pipeline.acquire(task)?)),
            #[cfg(feature = "onnx")]
            Self::Onnx(pipeline) => Ok(PipelineClassifier::Onnx(pipeline.acquire(task)?)),
        }
    }
}

impl TextClassifier for PipelineClassifier {
    type Error = PipelineError;

    fn classify(&self, input: &str) -> Result<ClassificationResult, Self::Error> {
        match self {
            Self::Api(classifier) => Ok(classifier.classify(input)?),
            #[cfg(feature = "onnx")]
            Self::Onnx(classifier) => Ok(classifier.classify(input)?),
        }
    }
}
