//! Error types for loading pipeline dumps.

use std::path::PathBuf;

/// Errors that can occur while loading an allocated pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// The dump could not be read.
    #[error("failed to read pipeline dump {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The dump is not a valid pipeline document.
    #[error("failed to parse pipeline dump: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },
}
