//! Resource usage aggregation and reporting for an allocated pipeline.
//!
//! The [`Collector`] walks a [`tally_ir::Pipe`] once and folds every table's
//! allocation into per-stage [`StageAggregate`]s, keeping shared resources
//! shared and collapsing duplicate reports of the same fact. The
//! [`Reporter`] turns the finished [`PipelineReport`] into the versioned
//! `resources.json` document (see [`schema`]) and registers it in the
//! output manifest. [`lint_actions`] cross-checks declared actions against
//! instruction memory and reports mismatches as warnings.
//!
//! ```no_run
//! use std::path::Path;
//! use tally_manifest::Manifest;
//! use tally_resources::{collect, ReportOptions, Reporter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipe = tally_ir::Pipe::load(Path::new("pipe.json"))?;
//! let report = collect(&pipe)?;
//! let out = Path::new("build");
//! let mut manifest = Manifest::load_or_new(&out.join("manifest.json"))?;
//! Reporter::new(ReportOptions::new("switch"))
//!     .write(&report, &out.join("resources.json"), out, &mut manifest)?;
//! manifest.save(&out.join("manifest.json"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod collector;
pub mod error;
pub mod lint;
pub mod model;
pub mod reporter;
pub mod schema;
pub mod stage;

pub use collector::{collect, Collector, EmbeddedSummaries, SummaryProvider};
pub use error::ResourceError;
pub use lint::{lint_actions, ActionLint};
pub use model::{
    ActionSlotKey, HashBitKey, HashBitUsage, HashDistKey, HashDistUsage, ImemSlot, TableMemoriesUsage, Usage,
    XbarByteUsage,
};
pub use reporter::{ReportOptions, Reporter, WrittenArtifact, RESOURCES_KIND};
pub use schema::{ResourcesLog, SCHEMA_VERSION};
pub use stage::{PipelineReport, StageAggregate};
