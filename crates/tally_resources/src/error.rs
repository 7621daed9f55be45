//! Error types for resource collection and reporting.

use std::path::PathBuf;

use tally_common::{LogicalId, StageId};
use tally_diagnostics::{Category, Diagnostic, DiagnosticCode, Subject};
use tally_manifest::ManifestError;

/// Two tables claim one logical id in one stage.
pub const DUPLICATE_LOGICAL_ID: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);
/// A table reached reporting without an allocation result.
pub const MISSING_ALLOCATION: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);
/// Reading or writing the report failed.
pub const REPORT_IO: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);
/// The artifact path is not inside the output directory.
pub const OUTSIDE_OUTPUT_DIR: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);
/// The report could not be serialized.
pub const SERIALIZATION: DiagnosticCode = DiagnosticCode::new(Category::Error, 305);
/// The manifest could not be updated.
pub const MANIFEST: DiagnosticCode = DiagnosticCode::new(Category::Error, 306);
/// A table is placed in a stage the pipe does not have.
pub const STAGE_OUT_OF_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Error, 307);

/// Errors raised while collecting or reporting resource usage.
///
/// The first three variants mean the upstream allocation is inconsistent. They
/// are never recovered from.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// A logical id in a stage is claimed twice.
    #[error("logical id {logical_id} in stage {stage} claimed by '{table}' but already held by '{existing}'")]
    DuplicateLogicalId {
        /// The stage.
        stage: StageId,
        /// The contested logical id.
        logical_id: LogicalId,
        /// The table making the second claim.
        table: String,
        /// The table already holding the id.
        existing: String,
    },

    /// A table has no placement, or a placement has no resources attached.
    #[error("{}", missing_allocation_message(.table, .stage))]
    MissingAllocation {
        /// The table.
        table: String,
        /// The placement's stage, when the table was placed at all.
        stage: Option<StageId>,
    },

    /// A placement names a stage at or past the pipe's stage count.
    #[error("table '{table}' is placed in stage {stage} but the pipe has {stage_count} stages")]
    StageOutOfRange {
        /// The table.
        table: String,
        /// The placement's stage.
        stage: StageId,
        /// Number of stages the pipe declares.
        stage_count: usize,
    },

    /// Writing the artifact failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact would land outside the output directory.
    #[error("artifact {path} is not inside output directory {output_dir}")]
    OutsideOutputDir {
        /// The artifact path.
        path: PathBuf,
        /// The output directory.
        output_dir: PathBuf,
    },

    /// The document could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// The manifest rejected the registration.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

fn missing_allocation_message(table: &str, stage: &Option<StageId>) -> String {
    match stage {
        Some(stage) => format!("table '{table}' has no resource allocation in stage {stage}"),
        None => format!("table '{table}' was never placed in any stage"),
    }
}

impl ResourceError {
    /// The stable diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ResourceError::DuplicateLogicalId { .. } => DUPLICATE_LOGICAL_ID,
            ResourceError::MissingAllocation { .. } => MISSING_ALLOCATION,
            ResourceError::StageOutOfRange { .. } => STAGE_OUT_OF_RANGE,
            ResourceError::Io { .. } => REPORT_IO,
            ResourceError::OutsideOutputDir { .. } => OUTSIDE_OUTPUT_DIR,
            ResourceError::Serialization { .. } => SERIALIZATION,
            ResourceError::Manifest(_) => MANIFEST,
        }
    }

    /// Converts the error into an error-severity diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            ResourceError::DuplicateLogicalId {
                stage,
                table,
                existing,
                ..
            } => diag
                .with_subject(Subject::Table {
                    name: table.clone(),
                    stage: Some(*stage),
                })
                .with_note(format!("'{existing}' was placed first"))
                .with_help("logical ids must be unique within a stage; this is an allocation bug"),
            ResourceError::MissingAllocation { table, stage } => diag
                .with_subject(Subject::Table {
                    name: table.clone(),
                    stage: *stage,
                })
                .with_help("resource allocation must run before reporting"),
            ResourceError::StageOutOfRange { table, stage, .. } => diag
                .with_subject(Subject::Table {
                    name: table.clone(),
                    stage: Some(*stage),
                })
                .with_help("placements must stay within the pipe's stages; this is an allocation bug"),
            ResourceError::Io { path, .. } => diag.with_subject(Subject::File { path: path.clone() }),
            ResourceError::OutsideOutputDir { path, .. } => {
                diag.with_subject(Subject::File { path: path.clone() })
            }
            ResourceError::Serialization { .. } | ResourceError::Manifest(_) => diag,
        }
    }
}
