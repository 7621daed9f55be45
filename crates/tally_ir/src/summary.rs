//! Opaque pipeline-wide summaries produced by other backend passes.
//!
//! Parser and CLOT resource accounting is computed elsewhere. Reporting copies
//! these values into its output without looking inside them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parser resource usage for the whole pipeline, as produced by the parser
/// resource pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParserResources(pub Value);

/// CLOT (packet-header extraction) usage for one gress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClotResourceUsage(pub Value);
