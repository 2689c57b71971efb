use thiserror::Error;

use synthtab_core::{Dtype, ValidationReport};

/// Errors emitted by generation and export.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The table spec failed validation; no rows were produced.
    #[error("table spec is invalid ({} error(s))", .0.errors.len())]
    Validation(ValidationReport),
    #[error("invalid range for column '{column}': {message}")]
    InvalidRange { column: String, message: String },
    #[error("column '{column}' has no values to choose from")]
    EmptyDomain { column: String },
    #[error("no generator registered for dtype '{0}'")]
    MissingGenerator(Dtype),
    #[error("nothing to export")]
    EmptyArchive,
    #[error("duplicate archive entry '{0}'")]
    DuplicateArchiveEntry(String),
    #[error("generation cancelled after {rows_generated} row(s)")]
    Cancelled { rows_generated: u64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl GenerationError {
    pub(crate) fn invalid_range(column: &str, message: impl Into<String>) -> Self {
        GenerationError::InvalidRange {
            column: column.to_string(),
            message: message.into(),
        }
    }
}
