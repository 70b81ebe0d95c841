//! Error type shared by every stage of the report.

use thiserror::Error;

/// Errors that abort report generation.
///
/// Stages never retry; the first error is propagated unchanged to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter is outside its valid domain (quantile level, alpha, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A sample is too small for the requested estimator or test.
    #[error("insufficient data for {what}: need at least {required}, got {actual}")]
    InsufficientData {
        /// Name of the estimator or test.
        what: &'static str,
        /// Minimum number of observations required.
        required: usize,
        /// Number of observations supplied.
        actual: usize,
    },

    /// A distribution could not be constructed from the given parameters.
    #[error("distribution error: {0}")]
    Distribution(String),

    /// Rendering a plot failed.
    #[error("failed to render plot: {0}")]
    Plot(String),

    /// Writing an output artefact failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialising the result failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::InsufficientData`] unless `data` has at least `required` elements.
pub(crate) fn ensure_len(what: &'static str, data: &[f64], required: usize) -> Result<()> {
    if data.len() < required {
        return Err(Error::InsufficientData {
            what,
            required,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len("hd", &[1.0, 2.0], 2).is_ok());
        let err = ensure_len("hd", &[1.0], 2).unwrap_err();
        assert!(err.to_string().contains("need at least 2, got 1"));
    }
}
