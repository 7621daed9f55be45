//! Parsing and validation of `tally.toml` configuration files.
//!
//! This crate reads the reporting configuration and produces a strongly-typed
//! [`TallyConfig`], then resolves it into concrete output locations.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_output, ResolvedOutput};
pub use types::*;
