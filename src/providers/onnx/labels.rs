//! Label tables read from a model's `config.json`.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use super::errors::OnnxClassifierError;

#[derive(Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
}

/// Reads the `id2label` table from a model config, ordered by class index.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, declares no
/// labels, or skips a class index.
pub fn load_labels(path: &Path) -> Result<Vec<String>, OnnxClassifierError> {
    let raw = std::fs::read_to_string(path).map_err(|source| OnnxClassifierError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_labels(&raw, path)
}

fn parse_labels(raw: &str, path: &Path) -> Result<Vec<String>, OnnxClassifierError> {
    let config: ModelConfig =
        serde_json::from_str(raw).map_err(|source| OnnxClassifierError::ParseModelConfig {
            path: path.to_path_buf(),
            source,
        })?;
    if config.id2label.is_empty() {
        return Err(OnnxClassifierError::MissingLabels {
            path: path.to_path_buf(),
        });
    }

    let mut indexed = Vec::with_capacity(config.id2label.len());
    for (id, label) in config.id2label {
        let index = id
            .parse::<usize>()
            .map_err(|_| OnnxClassifierError::InvalidLabelId {
                path: path.to_path_buf(),
                id: id.clone(),
            })?;
        indexed.push((index, id, label));
    }
    indexed.sort_by_key(|(index, _, _)| *index);

    indexed
        .into_iter()
        .enumerate()
        .map(|(position, (index, id, label))| {
            if position == index {
                Ok(label)
            } else {
                Err(OnnxClassifierError::InvalidLabelId {
                    path: path.to_path_buf(),
                    id,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(raw: &str) -> Result<Vec<String>, OnnxClassifierError> {
        parse_labels(raw, Path::new("config.json"))
    }

    #[rstest]
    fn orders_labels_numerically() {
        let raw = r#"{"id2label": {"10": "K", "0": "A", "1": "B", "2": "C", "3": "D",
            "4": "E", "5": "F", "6": "G", "7": "H", "8": "I", "9": "J"}}"#;
        let labels = parse(raw).unwrap_or_else(|e| panic!("parse labels: {e}"));
        assert_eq!(labels.first().map(String::as_str), Some("A"));
        assert_eq!(labels.last().map(String::as_str), Some("K"));
    }

    #[rstest]
    fn reads_sst2_labels() {
        let raw = r#"{"architectures": ["DistilBertForSequenceClassification"],
            "id2label": {"0": "NEGATIVE", "1": "POSITIVE"}}"#;
        let labels = parse(raw).unwrap_or_else(|e| panic!("parse labels: {e}"));
        assert_eq!(labels, vec!["NEGATIVE".to_owned(), "POSITIVE".to_owned()]);
    }

    #[rstest]
    #[case(r#"{}"#)]
    #[case(r#"{"id2label": {}}"#)]
    fn missing_labels_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            parse(raw),
            Err(OnnxClassifierError::MissingLabels { .. })
        ));
    }

    #[rstest]
    #[case(r#"{"id2label": {"0": "A", "2": "C"}}"#)]
    #[case(r#"{"id2label": {"zero": "A"}}"#)]
    fn gaps_and_non_numeric_ids_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            parse(raw),
            Err(OnnxClassifierError::InvalidLabelId { .. })
        ));
    }
}
