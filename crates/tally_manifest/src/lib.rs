//! The shared manifest index of compiler output artifacts.
//!
//! Several reporting passes write artifacts into one output directory and
//! record them in a single `manifest.json`, so downstream tools can find every
//! artifact without knowing each pass's naming rules. This crate owns that
//! file: loading it, registering entries without disturbing anyone else's,
//! and saving it back.

#![warn(missing_docs)]

pub mod error;
pub mod manifest;

pub use error::ManifestError;
pub use manifest::{Manifest, ManifestEntry, ManifestIndex, Registration, MANIFEST_SCHEMA_VERSION};
