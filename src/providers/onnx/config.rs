//! Configuration types for ONNX sequence-classification models.

use std::path::Path;

use super::{artefact::OnnxArtefact, errors::OnnxClassifierError, labels::load_labels};

/// Longest token sequence fed to the model unless configured otherwise.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 512;

/// Configuration for an ONNX sequence-classification model.
#[derive(Debug, Clone)]
pub struct OnnxClassifierConfig {
    /// Model artefact (ONNX graph) to load.
    pub model: OnnxArtefact,
    /// Tokeniser artefact consumed by `tokenizers`.
    pub tokenizer: OnnxArtefact,
    /// Class labels ordered by logit index.
    pub labels: Vec<String>,
    /// Ordered input names: token ids, attention mask, and optionally token
    /// type ids.
    pub input_names: Vec<String>,
    /// Output holding the `[1, labels.len()]` logits.
    pub output_name: String,
    /// Maximum token count accepted by the model. Longer inputs are truncated.
    pub max_sequence_length: usize,
}

impl OnnxClassifierConfig {
    /// Builds a configuration from a directory laid out like a Hugging Face
    /// export: `model_file` relative to `dir`, plus `tokenizer.json` and
    /// `config.json` at its root.
    ///
    /// # Errors
    ///
    /// Returns an error when `config.json` cannot be read or declares no
    /// usable labels.
    pub fn from_export_dir(dir: &Path, model_file: &str) -> Result<Self, OnnxClassifierError> {
        Self::from_files(
            OnnxArtefact::unpinned(dir.join(model_file)),
            OnnxArtefact::unpinned(dir.join("tokenizer.json")),
            &dir.join("config.json"),
        )
    }

    /// Builds a configuration from explicit artefacts and a model config.
    ///
    /// # Errors
    ///
    /// Returns an error when the model config cannot be read or declares no
    /// usable labels.
    pub fn from_files(
        model: OnnxArtefact,
        tokenizer: OnnxArtefact,
        model_config: &Path,
    ) -> Result<Self, OnnxClassifierError> {
        Ok(Self {
            model,
            tokenizer,
            labels: load_labels(model_config)?,
            input_names: vec!["input_ids".into(), "attention_mask".into()],
            output_name: "logits".into(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        })
    }

    /// Checks structural constraints before any artefact is touched.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), OnnxClassifierError> {
        if self.max_sequence_length == 0 {
            return Err(OnnxClassifierError::ZeroSequenceLength);
        }
        if !(2..=3).contains(&self.input_names.len()) {
            return Err(OnnxClassifierError::InputNameCount {
                actual: self.input_names.len(),
            });
        }
        if self.output_name.is_empty() {
            return Err(OnnxClassifierError::MissingOutputName);
        }
        if self.labels.is_empty() {
            return Err(OnnxClassifierError::NoLabels);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> OnnxClassifierConfig {
        OnnxClassifierConfig {
            model: OnnxArtefact::unpinned("model.onnx"),
            tokenizer: OnnxArtefact::unpinned("tokenizer.json"),
            labels: vec!["NEGATIVE".into(), "POSITIVE".into()],
            input_names: vec!["input_ids".into(), "attention_mask".into()],
            output_name: "logits".into(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }

    #[rstest]
    fn default_shape_is_valid(config: OnnxClassifierConfig) {
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn zero_sequence_length_is_rejected(mut config: OnnxClassifierConfig) {
        config.max_sequence_length = 0;
        assert!(matches!(
            config.validate(),
            Err(OnnxClassifierError::ZeroSequenceLength)
        ));
    }

    #[rstest]
    #[case(vec!["input_ids"])]
    #[case(vec!["a", "b", "c", "d"])]
    fn input_name_count_is_checked(mut config: OnnxClassifierConfig, #[case] names: Vec<&str>) {
        config.input_names = names.into_iter().map(String::from).collect();
        assert!(matches!(
            config.validate(),
            Err(OnnxClassifierError::InputNameCount { .. })
        ));
    }

    #[rstest]
    fn labels_are_required(mut config: OnnxClassifierConfig) {
        config.labels.clear();
        assert!(matches!(config.validate(), Err(OnnxClassifierError::NoLabels)));
    }
}
