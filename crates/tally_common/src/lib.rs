//! Shared foundational types used across the tally workspace.
//!
//! This crate provides the physical coordinate newtypes (stage indices and
//! logical table ids), the packet-processing direction [`Gress`], and the
//! XXH3 [`ContentHash`] used to fingerprint emitted artifacts.

#![warn(missing_docs)]

pub mod gress;
pub mod hash;
pub mod ids;

pub use gress::{Gress, ParseGressError};
pub use hash::ContentHash;
pub use ids::{LogicalId, StageId};
