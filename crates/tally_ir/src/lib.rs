//! The allocated match-action pipeline as seen by resource reporting.
//!
//! Table placement and resource allocation happen upstream. This crate models
//! their *results*: a [`Pipe`] holding [`Table`]s, each placed into one or
//! more stages through [`StagePlacement`]s that carry the
//! [`TableResourceAlloc`] the allocator attached. Parser and CLOT usage are
//! carried as opaque, pre-computed summaries.
//!
//! The tree is walked through the closed [`Node`] set with an [`Inspector`].

#![warn(missing_docs)]

pub mod alloc;
pub mod error;
pub mod pipe;
pub mod summary;
pub mod visit;

pub use alloc::{
    ActionSlotUse, GatewayUnit, HashBitRole, HashBitUse, HashDistUse, InstrMemUse, MemoryKind, MemoryRow,
    MemoryUse, TableResourceAlloc, XbarByte, XbarPurpose, XbarUse,
};
pub use error::IrError;
pub use pipe::{Action, Pipe, StagePlacement, Table};
pub use summary::{ClotResourceUsage, ParserResources};
pub use visit::{Inspector, Node};
