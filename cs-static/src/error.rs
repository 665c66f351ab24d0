//! Static responder error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for static asset operations.
pub type Result<T> = std::result::Result<T, StaticError>;

/// Static responder errors.
#[derive(Debug, Error)]
pub enum StaticError {
    /// An asset file could not be read.
    #[error("Failed to read asset {path}: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The asset directory could not be walked.
    #[error("Failed to walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Response conversion error.
    #[error("Response conversion error: {0}")]
    Response(#[from] http::Error),

    /// Lambda runtime error.
    #[error("Lambda runtime error: {0}")]
    Runtime(String),
}

impl From<lambda_runtime::Error> for StaticError {
    fn from(err: lambda_runtime::Error) -> Self {
        Self::Runtime(err.to_string())
    }
}
