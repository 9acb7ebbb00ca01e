use std::sync::Mutex;

use ort::{session::Session, value::TensorRef};
use tokenizers::{Tokenizer, TruncationDirection, TruncationParams, TruncationStrategy};

use super::{config::OnnxClassifierConfig, errors::OnnxClassifierError};
use crate::api::ClassificationResult;
use crate::providers::TextClassifier;

/// Sequence classifier running a tokenizer and an ONNX session.
#[derive(Debug)]
pub struct OnnxTextClassifier {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    input_names: Vec<String>,
    output_name: String,
}

impl OnnxTextClassifier {
    /// Builds an ONNX classifier from the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns configuration and runtime errors when artefacts cannot be verified, tokeniser setup fails, or the ONNX session cannot be created.
    pub fn new(config: OnnxClassifierConfig) -> Result<Self, OnnxClassifierError> {
        config.validate()?;
        config.model.verify()?;
        config.tokenizer.verify()?;

        let mut tokenizer = Tokenizer::from_file(&config.tokenizer.path).map_err(|source| {
            OnnxClassifierError::LoadTokenizer {
                path: config.tokenizer.path.clone(),
                source,
            }
        })?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_sequence_length,
                strategy: TruncationStrategy::LongestFirst,
                stride: 0,
                direction: TruncationDirection::Right,
            }))
            .map_err(OnnxClassifierError::ConfigureTruncation)?;
        tokenizer.with_padding(None);

        let session = Session::builder()
            .map_err(OnnxClassifierError::CreateSessionBuilder)?
            .commit_from_file(&config.model.path)
            .map_err(OnnxClassifierError::CreateSession)?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels: config.labels,
            input_names: config.input_names,
            output_name: config.output_name,
        })
    }

    /// Runs inference for a single input string and returns the most likely label.
    ///
    /// # Errors
    ///
    /// Returns encoding or inference errors when tokenisation fails, the ONNX runtime errors, or the logits do not match the label table.
    pub fn predict(&self, input: &str) -> Result<ClassificationResult, OnnxClassifierError> {
        let encoding = self
            .tokenizer
            .encode(input, true)
            .map_err(OnnxClassifierError::Encode)?;

        let to_i64 =
            |values: &[u32]| -> Vec<i64> { values.iter().map(|v| i64::from(*v)).collect() };
        let ids = to_i64(encoding.get_ids());
        let attention = to_i64(encoding.get_attention_mask());
        let type_ids = to_i64(encoding.get_type_ids());
        let shape = [1usize, ids.len()];

        let ids_tensor = TensorRef::from_array_view((shape, ids.as_slice()))
            .map_err(OnnxClassifierError::EncodeTensor)?;
        let attention_tensor = TensorRef::from_array_view((shape, attention.as_slice()))
            .map_err(OnnxClassifierError::EncodeTensor)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| OnnxClassifierError::SessionPoisoned)?;

        let outputs = match self.input_names.as_slice() {
            [ids_name, attention_name] => session.run(ort::inputs! {
                ids_name.as_str() => ids_tensor,
                attention_name.as_str() => attention_tensor,
            }),
            [ids_name, attention_name, type_ids_name] => {
                let type_ids_tensor = TensorRef::from_array_view((shape, type_ids.as_slice()))
                    .map_err(OnnxClassifierError::EncodeTensor)?;
                session.run(ort::inputs! {
                    ids_name.as_str() => ids_tensor,
                    attention_name.as_str() => attention_tensor,
                    type_ids_name.as_str() => type_ids_tensor,
                })
            }
            names => {
                return Err(OnnxClassifierError::InputNameCount {
                    actual: names.len(),
                });
            }
        }
        .map_err(OnnxClassifierError::Inference)?;

        let logits_value =
            outputs
                .get(self.output_name.as_str())
                .ok_or_else(|| OnnxClassifierError::OutputMissing {
                    name: self.output_name.clone(),
                })?;
        let (_, logits) = logits_value
            .try_extract_tensor::<f32>()
            .map_err(OnnxClassifierError::Inference)?;

        if logits.len() != self.labels.len() {
            return Err(OnnxClassifierError::UnexpectedLogitCount {
                name: self.output_name.clone(),
                expected: self.labels.len(),
                actual: logits.len(),
            });
        }

        let (index, score) =
            best_class(&softmax(logits)).ok_or_else(|| OnnxClassifierError::NonFiniteLogits {
                name: self.output_name.clone(),
            })?;
        let label = self
            .labels
            .get(index)
            .cloned()
            .ok_or_else(|| OnnxClassifierError::UnexpectedLogitCount {
                name: self.output_name.clone(),
                expected: self.labels.len(),
                actual: logits.len(),
            })?;
        Ok(ClassificationResult::new(label, score))
    }
}

impl TextClassifier for OnnxTextClassifier {
    type Error = OnnxClassifierError;

    fn classify(&self, input: &str) -> Result<ClassificationResult, Self::Error> {
        self.predict(input)
    }
}

#[expect(clippy::float_arithmetic, reason = "softmax requires float operations")]
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|value| (value - max).exp()).collect();
    let sum = exps.iter().sum::<f32>();
    exps.into_iter().map(|value| value / sum).collect()
}

fn best_class(probabilities: &[f32]) -> Option<(usize, f32)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, probability)| probability.is_finite())
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
}
