//! `manifest.json`: the list of artifacts in an output directory.
//!
//! Entries are keyed by `(kind, path)`. Registering is append-only with one
//! exception: re-registering an existing `(kind, path)` refreshes that entry in
//! place. Fields and top-level keys this crate does not know about are kept
//! verbatim so other writers' data survives a load/save cycle.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_common::ContentHash;
use tracing::debug;

use crate::error::ManifestError;

/// Version of the manifest layout written by this crate.
pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

/// The manifest index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Layout version of the file.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Registered artifacts, in registration order.
    #[serde(default)]
    pub artifacts: Vec<ManifestEntry>,

    /// Top-level keys written by other tools.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_schema_version() -> String {
    MANIFEST_SCHEMA_VERSION.to_string()
}

/// One registered artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// What kind of artifact this is (e.g. "resources").
    pub kind: String,

    /// Path relative to the output directory, with `/` separators.
    pub path: String,

    /// The pipe the artifact describes, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe: Option<String>,

    /// Digest of the artifact's bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<ContentHash>,

    /// Entry fields written by other tools.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ManifestEntry {
    /// Creates an entry for a path relative to the output directory.
    ///
    /// Fails if the path is absolute or escapes the directory through `..`.
    pub fn new(kind: impl Into<String>, relative: &Path) -> Result<Self, ManifestError> {
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return Err(ManifestError::NotRelative(relative.to_path_buf())),
            }
        }
        if parts.is_empty() {
            return Err(ManifestError::NotRelative(relative.to_path_buf()));
        }
        Ok(Self {
            kind: kind.into(),
            path: parts.join("/"),
            pipe: None,
            digest: None,
            extra: BTreeMap::new(),
        })
    }

    /// Sets the pipe name.
    pub fn with_pipe(mut self, pipe: impl Into<String>) -> Self {
        self.pipe = Some(pipe.into());
        self
    }

    /// Sets the artifact digest.
    pub fn with_digest(mut self, digest: ContentHash) -> Self {
        self.digest = Some(digest);
        self
    }
}

/// What [`ManifestIndex::register`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new entry was appended.
    Appended,
    /// An entry with the same kind and path was refreshed.
    Updated,
    /// An identical entry already existed.
    Unchanged,
}

/// Something artifacts can be registered with.
pub trait ManifestIndex {
    /// Records an artifact. Must never remove or reorder other entries.
    fn register(&mut self, entry: ManifestEntry) -> Registration;
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self {
            schema_version: default_schema_version(),
            artifacts: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Loads the manifest at `path`, or starts an empty one if the file does
    /// not exist yet.
    ///
    /// A file that exists but cannot be parsed is an error: overwriting it
    /// would drop other writers' entries.
    pub fn load_or_new(path: &Path) -> Result<Self, ManifestError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(ManifestError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Saves the manifest, creating its parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ManifestError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut json =
            serde_json::to_string_pretty(self).map_err(|e| ManifestError::Serialization {
                reason: e.to_string(),
            })?;
        json.push('\n');
        std::fs::write(path, json).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the entries of one kind, in registration order.
    pub fn entries_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ManifestEntry> {
        self.artifacts.iter().filter(move |e| e.kind == kind)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestIndex for Manifest {
    fn register(&mut self, entry: ManifestEntry) -> Registration {
        let position = self
            .artifacts
            .iter()
            .position(|e| e.kind == entry.kind && e.path == entry.path);
        let Some(index) = position else {
            debug!(kind = %entry.kind, path = %entry.path, "appending manifest entry");
            self.artifacts.push(entry);
            return Registration::Appended;
        };

        let existing = &mut self.artifacts[index];
        if existing.pipe == entry.pipe && existing.digest == entry.digest {
            return Registration::Unchanged;
        }
        debug!(kind = %entry.kind, path = %entry.path, "refreshing manifest entry");
        existing.pipe = entry.pipe;
        existing.digest = entry.digest;
        Registration::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(kind: &str, path: &str) -> ManifestEntry {
        ManifestEntry::new(kind, Path::new(path)).unwrap()
    }

    #[test]
    fn new_manifest_is_empty() {
        let m = Manifest::new();
        assert_eq!(m.schema_version, MANIFEST_SCHEMA_VERSION);
        assert!(m.artifacts.is_empty());
    }

    #[test]
    fn entry_normalizes_separators() {
        let e = entry("resources", "./logs/pipe0/resources.json");
        assert_eq!(e.path, "logs/pipe0/resources.json");
    }

    #[test]
    fn entry_rejects_escaping_paths() {
        assert!(ManifestEntry::new("resources", Path::new("../x.json")).is_err());
        assert!(ManifestEntry::new("resources", Path::new("/abs/x.json")).is_err());
        assert!(ManifestEntry::new("resources", Path::new("")).is_err());
    }

    #[test]
    fn register_appends_then_updates() {
        let mut m = Manifest::new();
        m.register(entry("phv", "logs/phv.json"));
        let digest = ContentHash::from_bytes(b"v1");
        assert_eq!(
            m.register(entry("resources", "logs/resources.json").with_digest(digest)),
            Registration::Appended
        );
        assert_eq!(
            m.register(entry("resources", "logs/resources.json").with_digest(digest)),
            Registration::Unchanged
        );
        let digest2 = ContentHash::from_bytes(b"v2");
        assert_eq!(
            m.register(entry("resources", "logs/resources.json").with_digest(digest2)),
            Registration::Updated
        );
        assert_eq!(m.artifacts.len(), 2);
        assert_eq!(m.artifacts[0].kind, "phv");
        assert_eq!(m.artifacts[1].digest, Some(digest2));
    }

    #[test]
    fn same_path_different_kind_is_separate() {
        let mut m = Manifest::new();
        m.register(entry("a", "x.json"));
        m.register(entry("b", "x.json"));
        assert_eq!(m.artifacts.len(), 2);
        assert_eq!(m.entries_of_kind("b").count(), 1);
    }

    #[test]
    fn load_missing_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let m = Manifest::load_or_new(&dir.path().join("manifest.json")).unwrap();
        assert!(m.artifacts.is_empty());
    }

    #[test]
    fn load_corrupt_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, "not json {{{").unwrap();
        let err = Manifest::load_or_new(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json {{{");
    }

    #[test]
    fn foreign_fields_survive_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(
            &path,
            r#"{
                "schema_version": "1.0.0",
                "compile_command": "p4c --target tofino",
                "artifacts": [
                    {"kind": "phv", "path": "logs/phv.json", "owner": "phv_logging"}
                ]
            }"#,
        )
        .unwrap();

        let mut m = Manifest::load_or_new(&path).unwrap();
        m.register(entry("resources", "logs/resources.json").with_pipe("pipe0"));
        m.save(&path).unwrap();

        let back = Manifest::load_or_new(&path).unwrap();
        assert_eq!(back.artifacts.len(), 2);
        assert_eq!(back.artifacts[0].extra["owner"], "phv_logging");
        assert_eq!(back.extra["compile_command"], "p4c --target tofino");
        assert_eq!(back.artifacts[1].pipe.as_deref(), Some("pipe0"));
    }

    #[test]
    fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested: PathBuf = dir.path().join("a").join("b").join("manifest.json");
        Manifest::new().save(&nested).unwrap();
        assert!(nested.exists());
    }
}
