//! The pipeline object a diagnostic is about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tally_common::StageId;

/// What a diagnostic refers to, in place of a source span.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    /// A table, optionally within a specific stage.
    Table {
        /// The table's name.
        name: String,
        /// The stage the problem was found in, if known.
        stage: Option<StageId>,
    },
    /// A whole stage.
    Stage {
        /// The stage index.
        stage: StageId,
    },
    /// A file read or written by the run.
    File {
        /// The file path.
        path: PathBuf,
    },
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Table {
                name,
                stage: Some(stage),
            } => write!(f, "table '{name}' in stage {stage}"),
            Subject::Table { name, stage: None } => write!(f, "table '{name}'"),
            Subject::Stage { stage } => write!(f, "stage {stage}"),
            Subject::File { path } => write!(f, "{}", path.display()),
        }
    }
}
