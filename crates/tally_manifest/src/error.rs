//! Error types for manifest operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// An I/O error occurred while reading or writing the manifest.
    #[error("manifest I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The existing manifest is not valid JSON. It is left untouched.
    #[error("failed to parse manifest {path}: {reason}")]
    Parse {
        /// The manifest path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A registered path is not relative to the output directory.
    #[error("manifest paths must be relative and stay inside the output directory, got {0}")]
    NotRelative(PathBuf),

    /// A serialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
