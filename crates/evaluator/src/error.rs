use std::path::PathBuf;

use ptas_core::error::CoreError;

/// Errors surfaced by the batch evaluator.
///
/// Evaluation itself never fails; these cover loading the request and the
/// environment configuration.
#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    /// A domain-level error from `ptas_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {var}: {reason}")]
    Config { var: &'static str, reason: String },

    #[error("No input file given; set PTAS_INPUT or pass a path argument")]
    MissingInput,
}

/// Convenience type alias for evaluator results.
pub type EvaluatorResult<T> = Result<T, EvaluatorError>;
