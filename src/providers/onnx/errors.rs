use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while acquiring or running an ONNX text classifier.
#[derive(Debug, Error)]
pub enum OnnxClassifierError {
    #[error("failed to read artefact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artefact at {path} expected SHA-256 {expected} but found {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    #[error("failed to initialise the Hugging Face hub client: {0}")]
    HubClient(#[source] hf_hub::api::sync::ApiError),
    #[error("failed to download {file} from {repo}: {source}")]
    Download {
        repo: String,
        file: String,
        #[source]
        source: hf_hub::api::sync::ApiError,
    },
    #[error("failed to parse model config at {path}: {source}")]
    ParseModelConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("model config at {path} declares no labels")]
    MissingLabels { path: PathBuf },
    #[error("model config at {path} has non-contiguous label id \"{id}\"")]
    InvalidLabelId { path: PathBuf, id: String },
    #[error("failed to load tokenizer from {path}: {source}")]
    LoadTokenizer {
        path: PathBuf,
        #[source]
        source: tokenizers::Error,
    },
    #[error("failed to configure tokenizer truncation: {0}")]
    ConfigureTruncation(#[source] tokenizers::Error),
    #[error("failed to construct ONNX session builder: {0}")]
    CreateSessionBuilder(#[source] ort::Error),
    #[error("failed to create ONNX session: {0}")]
    CreateSession(#[source] ort::Error),
    #[error("classifier requires 2 or 3 input names but found {actual}")]
    InputNameCount { actual: usize },
    #[error("classifier requires an output name")]
    MissingOutputName,
    #[error("classifier requires max_sequence_length > 0")]
    ZeroSequenceLength,
    #[error("classifier requires at least one label")]
    NoLabels,
    #[error("failed to encode text: {0}")]
    Encode(#[source] tokenizers::Error),
    #[error("failed to convert encoded text into tensor: {0}")]
    EncodeTensor(#[source] ort::Error),
    #[error("session mutex was poisoned by a previous panic")]
    SessionPoisoned,
    #[error("failed to run inference: {0}")]
    Inference(#[source] ort::Error),
    #[error("ONNX output \"{name}\" missing from session results")]
    OutputMissing { name: String },
    #[error("ONNX output \"{name}\" has {actual} logits but expected {expected}")]
    UnexpectedLogitCount {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("ONNX output \"{name}\" produced non-finite logits")]
    NonFiniteLogits { name: String },
}
