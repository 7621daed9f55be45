//! Output resolution: turning configured paths into concrete locations.

use crate::types::TallyConfig;
use std::path::{Path, PathBuf};

/// Fully resolved output locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    /// The designated output directory.
    pub output_dir: PathBuf,
    /// Where the resources artifact is written.
    pub artifact_path: PathBuf,
    /// Where the shared manifest index lives.
    pub manifest_path: PathBuf,
}

/// Resolves output locations, letting a command-line directory override
/// `output.dir`. The artifact and manifest stay relative to whichever
/// directory wins.
pub fn resolve_output(config: &TallyConfig, cli_output_dir: Option<&Path>) -> ResolvedOutput {
    let output_dir = cli_output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output.dir.clone());
    ResolvedOutput {
        artifact_path: output_dir.join(&config.output.artifact),
        manifest_path: output_dir.join(&config.output.manifest),
        output_dir,
    }
}
