//! Per-table allocation results attached by the resource allocator.
//!
//! One [`TableResourceAlloc`] describes everything a table consumes in a
//! single stage: crossbar bytes, hash bits, hash-distribution units,
//! action-bus bytes and slots, instruction-memory colors, and memory/ALU
//! units.

use serde::{Deserialize, Serialize};

/// Everything one table placement consumes in its stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableResourceAlloc {
    /// Crossbar bytes, grouped by the purpose they were allocated for.
    #[serde(default)]
    pub xbar: Vec<XbarUse>,
    /// Hash bits consumed by match, selection, distribution and gateways.
    #[serde(default)]
    pub hash_bits: Vec<HashBitUse>,
    /// Hash-distribution units.
    #[serde(default)]
    pub hash_dist: Vec<HashDistUse>,
    /// Action-bus byte indices.
    #[serde(default)]
    pub action_bus: Vec<u32>,
    /// Action-data slots on the action bus, by width.
    #[serde(default)]
    pub action_slots: Vec<ActionSlotUse>,
    /// Instruction-memory colors, one entry per action.
    #[serde(default)]
    pub instr_mem: Vec<InstrMemUse>,
    /// RAM/TCAM/map-RAM/gateway/stash/ALU assignments.
    #[serde(default)]
    pub memories: Vec<MemoryUse>,
}

/// A physical crossbar byte coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct XbarByte {
    /// Crossbar group.
    pub group: u32,
    /// Byte index within the group.
    pub index: u32,
}

impl XbarByte {
    /// Creates a byte coordinate.
    pub fn new(group: u32, index: u32) -> Self {
        Self { group, index }
    }
}

/// What a set of crossbar bytes was routed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XbarPurpose {
    /// Key bytes of an exact-match search.
    ExactMatchKey,
    /// Key bytes of a ternary search.
    TernaryMatchKey,
    /// Partition index of an algorithmic TCAM.
    AtcamPartition,
    /// Gateway comparison inputs.
    Gateway,
    /// Inputs to a selector's hash.
    Selector,
    /// Inputs to a meter's address or color computation.
    Meter,
    /// Inputs to a stateful ALU.
    StatefulAlu,
    /// Inputs to a hash-distribution computation.
    HashDist,
    /// Inputs to a proxy hash.
    ProxyHash,
}

impl XbarPurpose {
    /// The label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            XbarPurpose::ExactMatchKey => "exact-match-key",
            XbarPurpose::TernaryMatchKey => "ternary-match-key",
            XbarPurpose::AtcamPartition => "atcam-partition",
            XbarPurpose::Gateway => "gateway",
            XbarPurpose::Selector => "selector",
            XbarPurpose::Meter => "meter",
            XbarPurpose::StatefulAlu => "stateful-alu",
            XbarPurpose::HashDist => "hash-dist",
            XbarPurpose::ProxyHash => "proxy-hash",
        }
    }
}

/// Crossbar bytes allocated for one purpose.
///
/// The allocator may list the same byte more than once, e.g. when two field
/// slices share it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XbarUse {
    /// Why these bytes were routed.
    pub purpose: XbarPurpose,
    /// The claimed bytes.
    pub bytes: Vec<XbarByte>,
}

/// How a hash bit is consumed.
///
/// Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashBitRole {
    /// Selects the RAM of an exact-match way.
    WaySelect,
    /// Selects the RAM line within an exact-match way.
    WayLineSelect,
    /// A selector's member-selection bit.
    SelectionBit,
    /// A bit feeding a hash-distribution unit.
    DistBit,
    /// A bit compared by a gateway.
    Gateway,
}

/// One use of one hash bit of one hash function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashBitUse {
    /// Bit position in the hash output.
    pub bit: u32,
    /// Hash function (group) the bit belongs to.
    pub function: u32,
    /// How the bit is consumed.
    pub role: HashBitRole,
    /// Role-specific value, e.g. the way number for way-select bits.
    #[serde(default)]
    pub value: i32,
    /// Field the bit was computed from, if the allocator recorded it.
    #[serde(default)]
    pub field: String,
    /// Free-form purpose label.
    pub purpose: String,
}

/// One use of a hash-distribution unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDistUse {
    /// 48-bit hash group.
    pub hash_id: u32,
    /// Unit within the group.
    pub unit_id: u32,
    /// What the unit's output feeds (e.g. "meter address").
    pub purpose: String,
}

/// One action-data slot claimed on the action bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSlotUse {
    /// Slot width in bits (8, 16 or 32 on current targets).
    pub bit_width: u32,
    /// Slot index among the slots of that width.
    pub slot: u32,
}

/// The instruction-memory color assigned to one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrMemUse {
    /// The color slot.
    pub color: u32,
    /// The action whose instruction uses the slot.
    pub action: String,
}

/// The kind of table or attached resource a memory allocation serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// Exact-match RAMs.
    Exact,
    /// Algorithmic TCAM RAMs.
    Atcam,
    /// TCAMs.
    Ternary,
    /// Ternary-indirection RAMs.
    TernaryIndirect,
    /// Action data RAMs.
    ActionData,
    /// Statistics counters.
    Counter,
    /// Meters.
    Meter,
    /// Selectors.
    Selector,
    /// Stateful ALU registers.
    Stateful,
    /// Idle-time tracking.
    Idletime,
    /// Gateway-only allocation.
    Gateway,
}

impl MemoryKind {
    /// The label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            MemoryKind::Exact => "exact",
            MemoryKind::Atcam => "atcam",
            MemoryKind::Ternary => "ternary",
            MemoryKind::TernaryIndirect => "tind",
            MemoryKind::ActionData => "action_data",
            MemoryKind::Counter => "counter",
            MemoryKind::Meter => "meter",
            MemoryKind::Selector => "selector",
            MemoryKind::Stateful => "stateful",
            MemoryKind::Idletime => "idletime",
            MemoryKind::Gateway => "gateway",
        }
    }

    /// Whether the columns of this allocation are TCAMs rather than RAMs.
    pub fn is_tcam(self) -> bool {
        self == MemoryKind::Ternary
    }

    /// Whether the home row's meter ALU is consumed.
    pub fn uses_meter_alu(self) -> bool {
        matches!(
            self,
            MemoryKind::Meter | MemoryKind::Selector | MemoryKind::Stateful
        )
    }

    /// Whether the home row's statistics ALU is consumed.
    pub fn uses_stats_alu(self) -> bool {
        self == MemoryKind::Counter
    }

    /// Whether rows of this kind drive an exact-match search bus.
    pub fn uses_search_bus(self) -> bool {
        matches!(self, MemoryKind::Exact | MemoryKind::Atcam)
    }
}

/// Memory units claimed within one physical row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRow {
    /// The physical row.
    pub row: u32,
    /// RAM (or TCAM) columns.
    #[serde(default)]
    pub cols: Vec<u32>,
    /// Map-RAM columns.
    #[serde(default)]
    pub map_cols: Vec<u32>,
    /// Stash columns.
    #[serde(default)]
    pub stash_cols: Vec<u32>,
    /// Search bus the row's RAMs are read through.
    #[serde(default)]
    pub bus: Option<u32>,
    /// Result bus the row's match results leave on.
    #[serde(default)]
    pub result_bus: Option<u32>,
}

/// A gateway unit coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayUnit {
    /// The physical row.
    pub row: u32,
    /// Gateway unit within the row.
    pub unit: u32,
}

/// One memory allocation of a table or one of its attached resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUse {
    /// What the memory serves.
    pub kind: MemoryKind,
    /// Rows and the units claimed in each.
    #[serde(default)]
    pub rows: Vec<MemoryRow>,
    /// Row whose ALU serves this allocation.
    #[serde(default)]
    pub home_row: Option<u32>,
    /// Gateway unit, for allocations that include a gateway.
    #[serde(default)]
    pub gateway: Option<GatewayUnit>,
}

impl MemoryUse {
    /// Creates an allocation with no rows.
    pub fn new(kind: MemoryKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            home_row: None,
            gateway: None,
        }
    }

    /// Adds a row with RAM (or TCAM) columns.
    pub fn with_row(mut self, row: u32, cols: impl IntoIterator<Item = u32>) -> Self {
        self.rows.push(MemoryRow {
            row,
            cols: cols.into_iter().collect(),
            ..MemoryRow::default()
        });
        self
    }

    /// Sets the home row.
    pub fn with_home_row(mut self, row: u32) -> Self {
        self.home_row = Some(row);
        self
    }
}
