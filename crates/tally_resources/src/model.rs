//! Usage records for each hardware resource category.
//!
//! A physical unit may be claimed by several tables, and a single table may be
//! reported as claiming the same unit more than once. Every record here is
//! stored in an ordered set or keyed map so that the first case keeps all
//! claimants while the second collapses to one entry.

use std::collections::{BTreeMap, BTreeSet};

use tally_common::{Gress, StageId};
use tally_ir::{HashBitRole, MemoryUse, XbarByte};

/// One crossbar byte claimed by one consumer for one purpose.
///
/// Ordered by byte coordinate first, which is the report order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct XbarByteUsage {
    /// The physical byte.
    pub byte: XbarByte,
    /// Consumer label.
    pub used_by: String,
    /// Purpose label.
    pub used_for: String,
}

impl XbarByteUsage {
    /// Creates a record.
    pub fn new(byte: XbarByte, used_by: impl Into<String>, used_for: impl Into<String>) -> Self {
        Self {
            byte,
            used_by: used_by.into(),
            used_for: used_for.into(),
        }
    }
}

/// Key of a hash bit: the bit position within one hash function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashBitKey {
    /// Bit position.
    pub bit: u32,
    /// Hash function.
    pub function: u32,
}

/// One way a hash bit is consumed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Usage {
    /// The consuming role.
    pub role: HashBitRole,
    /// Role-specific value.
    pub value: i32,
    /// Source field, or empty.
    pub field_name: String,
}

/// Every use of one hash bit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashBitUsage {
    /// Consumer labels.
    pub used_by: BTreeSet<String>,
    /// Purpose labels.
    pub used_for: BTreeSet<String>,
    /// Distinct uses, ordered by role, then value, then field.
    pub usages: BTreeSet<Usage>,
}

impl HashBitUsage {
    /// Records one use by one consumer. Returns `false` if nothing new was
    /// learned.
    pub fn add(&mut self, used_by: &str, used_for: &str, usage: Usage) -> bool {
        let by = self.used_by.insert(used_by.to_string());
        let purpose = self.used_for.insert(used_for.to_string());
        let fresh = self.usages.insert(usage);
        by || purpose || fresh
    }
}

/// Key of an action-data slot: width first, so slots group by size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionSlotKey {
    /// Slot width in bits.
    pub bit_width: u32,
    /// Slot index within its width.
    pub slot: u32,
}

/// Key of a hash-distribution unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashDistKey {
    /// 48-bit hash group.
    pub hash_id: u32,
    /// Unit within the group.
    pub unit_id: u32,
}

/// Consumers and purposes of one hash-distribution unit.
///
/// The two sets are independent: a consumer is not tied to the purpose it
/// was recorded with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashDistUsage {
    /// Consumer labels.
    pub used_by: BTreeSet<String>,
    /// Purpose labels.
    pub used_for: BTreeSet<String>,
}

/// An instruction-memory color slot in one gress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImemSlot {
    /// Color.
    pub color: u32,
    /// Gress the slot belongs to.
    pub gress: Gress,
}

/// Actions using one instruction-memory slot, grouped by consumer.
pub type ImemColorUsage = BTreeMap<String, BTreeSet<String>>;

/// The memory and ALU allocation of one table in one stage.
///
/// Unlike the other records these are kept as a list: each entry is a whole
/// allocation, not a single fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMemoriesUsage {
    /// Table name.
    pub table_name: String,
    /// Name of the merged gateway, if any.
    pub gateway_name: Option<String>,
    /// Stage the allocation belongs to.
    pub stage: StageId,
    /// The allocation as handed over by the allocator.
    pub memories: Vec<MemoryUse>,
}
