//! ONNX-backed sequence classification with optional hub downloads and
//! artefact verification.
mod artefact;
mod classifier;
mod config;
mod errors;
mod hub;
mod labels;

pub use artefact::{OnnxArtefact, compute_sha256};
pub use classifier::OnnxTextClassifier;
pub use config::{DEFAULT_MAX_SEQUENCE_LENGTH, OnnxClassifierConfig};
pub use errors::OnnxClassifierError;
pub use hub::{DEFAULT_MODEL_FILE, DEFAULT_MODEL_REPO, HubModel};
pub use labels::load_labels;

use std::path::PathBuf;

use tracing::info;

use crate::api::Task;
use crate::providers::PipelineProvider;

/// Where an [`OnnxPipeline`] finds its artefacts.
#[derive(Debug, Clone)]
pub enum OnnxSource {
    /// Artefacts already on disk.
    Local(OnnxClassifierConfig),
    /// A Hugging Face style export directory, read on acquisition.
    ExportDir {
        dir: PathBuf,
        model_file: String,
    },
    /// Artefacts downloaded from the Hugging Face hub on acquisition.
    Hub(HubModel),
}

/// Checksums applied to resolved artefacts before they are loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtefactPins {
    /// Expected SHA-256 of the ONNX graph.
    pub model: Option<String>,
    /// Expected SHA-256 of `tokenizer.json`.
    pub tokenizer: Option<String>,
}

impl ArtefactPins {
    fn apply(&self, config: &mut OnnxClassifierConfig) {
        if let Some(digest) = &self.model {
            config.model.sha256 = Some(digest.clone());
        }
        if let Some(digest) = &self.tokenizer {
            config.tokenizer.sha256 = Some(digest.clone());
        }
    }
}

/// Provider that runs a sequence-classification model in-process.
///
/// # Examples
/// ```no_run
/// use text_classification::InferenceService;
/// use text_classification::providers::onnx::{HubModel, OnnxPipeline};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut service = InferenceService::new(OnnxPipeline::hub(HubModel::default()));
/// service.load()?;
/// let result = service.predict("good job")?;
/// assert_eq!(result.label, "POSITIVE");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OnnxPipeline {
    source: OnnxSource,
    pins: ArtefactPins,
}

impl OnnxPipeline {
    /// Provider reading artefacts from an explicit configuration.
    #[must_use]
    pub fn local(config: OnnxClassifierConfig) -> Self {
        Self {
            source: OnnxSource::Local(config),
            pins: ArtefactPins::default(),
        }
    }

    /// Provider reading an export directory holding the ONNX graph at
    /// `model_file`, plus `tokenizer.json` and `config.json`.
    #[must_use]
    pub fn export_dir(dir: impl Into<PathBuf>, model_file: impl Into<String>) -> Self {
        Self {
            source: OnnxSource::ExportDir {
                dir: dir.into(),
                model_file: model_file.into(),
            },
            pins: ArtefactPins::default(),
        }
    }

    /// Provider downloading artefacts from the hub.
    #[must_use]
    pub fn hub(model: HubModel) -> Self {
        Self {
            source: OnnxSource::Hub(model),
            pins: ArtefactPins::default(),
        }
    }

    /// Pin artefact checksums, overriding any already recorded by the
    /// source.
    #[must_use]
    pub fn with_pins(mut self, pins: ArtefactPins) -> Self {
        self.pins = pins;
        self
    }

    /// Checksums verified on acquisition.
    #[must_use]
    pub fn pins(&self) -> &ArtefactPins {
        &self.pins
    }

    /// Where artefacts come from.
    #[must_use]
    pub fn source(&self) -> &OnnxSource {
        &self.source
    }
}

impl PipelineProvider for OnnxPipeline {
    type Classifier = OnnxTextClassifier;
    type Error = OnnxClassifierError;

    fn acquire(&self, task: Task) -> Result<Self::Classifier, Self::Error> {
        let mut config = match &self.source {
            OnnxSource::Local(config) => config.clone(),
            OnnxSource::ExportDir { dir, model_file } => {
                OnnxClassifierConfig::from_export_dir(dir, model_file)?
            }
            OnnxSource::Hub(model) => model.resolve()?,
        };
        self.pins.apply(&mut config);
        info!(
            %task,
            model = %config.model.path.display(),
            labels = config.labels.len(),
            "initialising ONNX session"
        );
        OnnxTextClassifier::new(config)
    }
}
