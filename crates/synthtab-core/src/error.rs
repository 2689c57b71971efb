use thiserror::Error;

/// Core error type shared across synthtab crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A dtype name that no generator understands.
    #[error("unknown dtype: {0}")]
    UnknownDtype(String),
    /// The configuration document is not usable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// JSON Schema could not be built or compiled.
    #[error("schema error: {0}")]
    Schema(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by synthtab crates.
pub type Result<T> = std::result::Result<T, Error>;
