//! Opaque ID newtypes for pipeline coordinates.
//!
//! [`StageId`] and [`LogicalId`] are thin `u32` wrappers. They are `Copy`,
//! totally ordered (so they can key `BTreeMap`s in the resource model), and
//! serialize as bare integers.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` value.
            pub fn from_raw(value: u32) -> Self {
                Self(value)
            }

            /// Returns the raw `u32` value.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the value as a `usize`, for indexing per-stage vectors.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Index of a physical match-action stage, counted from 0.
    StageId
);

define_id!(
    /// Compiler-assigned id of a table's placement within one stage.
    ///
    /// Only unique within a single stage; the same number is reused freely
    /// across stages.
    LogicalId
);
