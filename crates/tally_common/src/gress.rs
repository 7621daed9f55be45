//! Packet-processing direction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The direction ("gress") a table or instruction slot belongs to.
///
/// Declaration order is the report order: ingress sorts before egress,
/// egress before ghost.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Gress {
    /// Ingress pipeline.
    #[default]
    Ingress,
    /// Egress pipeline.
    Egress,
    /// Ghost thread (ingress-side, driven without a packet).
    Ghost,
}

impl Gress {
    /// Returns the lowercase name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Gress::Ingress => "ingress",
            Gress::Egress => "egress",
            Gress::Ghost => "ghost",
        }
    }
}

impl fmt::Display for Gress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a gress.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gress '{0}' (expected ingress, egress or ghost)")]
pub struct ParseGressError(pub String);

impl FromStr for Gress {
    type Err = ParseGressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ingress" => Ok(Gress::Ingress),
            "egress" => Ok(Gress::Egress),
            "ghost" => Ok(Gress::Ghost),
            _ => Err(ParseGressError(s.to_string())),
        }
    }
}
