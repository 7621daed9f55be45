//! Configuration types deserialized from `tally.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level configuration parsed from `tally.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TallyConfig {
    /// Report metadata and formatting.
    pub report: ReportConfig,
    /// Where the artifact and the manifest live.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Metadata stamped into the report header.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Name of the compiled program.
    pub program_name: String,
    /// Version string of the compiler that produced the allocation.
    #[serde(default = "default_compiler_version")]
    pub compiler_version: String,
    /// Pretty-print the JSON document.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

/// Output locations. Relative paths are resolved against `dir`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// The designated output directory that manifest paths are relative to.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Path of the resources artifact, relative to `dir`.
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,
    /// Path of the shared manifest index, relative to `dir`.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            artifact: default_artifact(),
            manifest: default_manifest(),
        }
    }
}

fn default_compiler_version() -> String {
    "unknown".to_string()
}

fn default_true() -> bool {
    true
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_artifact() -> PathBuf {
    PathBuf::from("resources.json")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("manifest.json")
}
