//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Problems with a `tally.toml` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that was looked up.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML is malformed or has the wrong shape.
    #[error("failed to parse tally.toml: {0}")]
    Parse(String),

    /// A required value is missing or blank.
    #[error("`{0}` must be set")]
    MissingField(&'static str),

    /// A value is present but unusable.
    #[error("`{field}` {reason}")]
    Invalid {
        /// Dotted key of the offending value.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("report.program_name");
        assert_eq!(err.to_string(), "`report.program_name` must be set");
    }

    #[test]
    fn display_invalid() {
        let err = ConfigError::Invalid {
            field: "output.artifact",
            reason: "must be relative to output.dir".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`output.artifact` must be relative to output.dir"
        );
    }

    #[test]
    fn display_read_names_the_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("proj/tally.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert!(err.to_string().starts_with("failed to read proj/tally.toml"));
    }
}
