//! Cold-start entrypoint shared by the local and remote adapters.

use std::io::Write;

use thiserror::Error;

use crate::api::{ClassificationResult, Predictor};

/// Failure while running an entrypoint.
#[derive(Debug, Error)]
pub enum EntrypointError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Predictor(E),
    #[error("failed to write result: {0}")]
    Output(#[source] std::io::Error),
    #[error("failed to encode result: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Load `predictor`, then classify `text` once.
///
/// # Errors
///
/// Propagates the predictor's load or prediction error unchanged.
pub fn invoke<P: Predictor>(
    predictor: &mut P,
    text: &str,
) -> Result<ClassificationResult, P::Error> {
    predictor.load()?;
    predictor.predict(text)
}

/// Load `predictor`, classify `text` and write the result to `out` as a
/// single JSON line.
///
/// # Errors
///
/// Returns [`EntrypointError::Predictor`] when loading or prediction fails and
/// an output error when the result cannot be written.
pub fn run<P, W>(
    predictor: &mut P,
    text: &str,
    out: &mut W,
) -> Result<ClassificationResult, EntrypointError<P::Error>>
where
    P: Predictor,
    W: Write,
{
    let result = invoke(predictor, text).map_err(EntrypointError::Predictor)?;
    serde_json::to_writer(&mut *out, &result).map_err(EntrypointError::Encode)?;
    writeln!(out).map_err(EntrypointError::Output)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Error, PartialEq)]
    enum FakeError {
        #[error("not loaded")]
        NotLoaded,
    }

    #[derive(Default)]
    struct Fake {
        loaded: bool,
    }

    impl Predictor for Fake {
        type Error = FakeError;

        fn load(&mut self) -> Result<(), Self::Error> {
            self.loaded = true;
            Ok(())
        }

        fn predict(&self, text: &str) -> Result<ClassificationResult, Self::Error> {
            if self.loaded {
                Ok(ClassificationResult::new(text.to_uppercase(), 0.5))
            } else {
                Err(FakeError::NotLoaded)
            }
        }
    }

    #[rstest]
    fn run_loads_before_predicting_and_prints_json() {
        let mut out = Vec::new();
        let result = run(&mut Fake::default(), "ok", &mut out)
            .unwrap_or_else(|e| panic!("entrypoint failed: {e}"));
        assert_eq!(result, ClassificationResult::new("OK", 0.5));
        assert_eq!(
            String::from_utf8_lossy(&out),
            "{\"label\":\"OK\",\"score\":0.5}\n"
        );
    }
}
