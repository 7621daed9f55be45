//! Per-stage aggregates and the whole-pipeline report.

use std::collections::{BTreeMap, BTreeSet};

use tally_common::{Gress, LogicalId, StageId};
use tally_ir::{ClotResourceUsage, ParserResources};
use tracing::trace;

use crate::error::ResourceError;
use crate::model::{
    ActionSlotKey, HashBitKey, HashBitUsage, HashDistKey, HashDistUsage, ImemColorUsage, ImemSlot,
    TableMemoriesUsage, Usage, XbarByteUsage,
};

/// All resource usage recorded for one physical stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageAggregate {
    stage: StageId,
    logical_tables: BTreeMap<LogicalId, String>,
    xbar_bytes: BTreeSet<XbarByteUsage>,
    hash_bits: BTreeMap<HashBitKey, HashBitUsage>,
    hash_dist: BTreeMap<HashDistKey, HashDistUsage>,
    action_bus: BTreeMap<u32, BTreeSet<String>>,
    action_slots: BTreeMap<ActionSlotKey, BTreeSet<String>>,
    imem: BTreeMap<ImemSlot, ImemColorUsage>,
    memories: Vec<TableMemoriesUsage>,
}

impl StageAggregate {
    /// Creates an empty aggregate for `stage`.
    pub fn new(stage: StageId) -> Self {
        Self {
            stage,
            logical_tables: BTreeMap::new(),
            xbar_bytes: BTreeSet::new(),
            hash_bits: BTreeMap::new(),
            hash_dist: BTreeMap::new(),
            action_bus: BTreeMap::new(),
            action_slots: BTreeMap::new(),
            imem: BTreeMap::new(),
            memories: Vec::new(),
        }
    }

    /// Claims `logical_id` for `table`.
    ///
    /// Any second claim on the same id is an error, including one by the same
    /// table: a table occupies a stage at most once.
    pub fn insert_logical_id(
        &mut self,
        logical_id: LogicalId,
        table: &str,
    ) -> Result<(), ResourceError> {
        if let Some(existing) = self.logical_tables.get(&logical_id) {
            return Err(ResourceError::DuplicateLogicalId {
                stage: self.stage,
                logical_id,
                table: table.to_string(),
                existing: existing.clone(),
            });
        }
        self.logical_tables.insert(logical_id, table.to_string());
        Ok(())
    }

    /// Records a crossbar byte. Returns `false` for a repeat of a known fact.
    pub fn add_xbar_byte(&mut self, usage: XbarByteUsage) -> bool {
        let fresh = self.xbar_bytes.insert(usage);
        if !fresh {
            trace!(stage = %self.stage, "duplicate crossbar byte usage collapsed");
        }
        fresh
    }

    /// Records one use of a hash bit.
    pub fn add_hash_bit(&mut self, key: HashBitKey, used_by: &str, used_for: &str, usage: Usage) {
        if !self
            .hash_bits
            .entry(key)
            .or_default()
            .add(used_by, used_for, usage)
        {
            trace!(stage = %self.stage, bit = key.bit, function = key.function, "duplicate hash bit usage collapsed");
        }
    }

    /// Records a consumer and a purpose of a hash-distribution unit.
    pub fn add_hash_dist(&mut self, key: HashDistKey, used_by: &str, used_for: &str) {
        let unit = self.hash_dist.entry(key).or_default();
        unit.used_by.insert(used_by.to_string());
        unit.used_for.insert(used_for.to_string());
    }

    /// Records a consumer of an action-bus byte.
    pub fn add_action_bus_byte(&mut self, byte: u32, used_by: &str) {
        if !self
            .action_bus
            .entry(byte)
            .or_default()
            .insert(used_by.to_string())
        {
            trace!(stage = %self.stage, byte, "duplicate action bus usage collapsed");
        }
    }

    /// Records a consumer of an action-data slot.
    pub fn add_action_slot(&mut self, key: ActionSlotKey, used_by: &str) {
        if !self
            .action_slots
            .entry(key)
            .or_default()
            .insert(used_by.to_string())
        {
            trace!(stage = %self.stage, bit_width = key.bit_width, slot = key.slot, "duplicate action slot usage collapsed");
        }
    }

    /// Records that `action` of `used_by` occupies an instruction-memory slot.
    pub fn add_instruction(&mut self, color: u32, gress: Gress, used_by: &str, action: &str) {
        self.imem
            .entry(ImemSlot { color, gress })
            .or_default()
            .entry(used_by.to_string())
            .or_default()
            .insert(action.to_string());
    }

    /// Appends a table's memory allocation.
    pub fn push_memories(&mut self, usage: TableMemoriesUsage) {
        self.memories.push(usage);
    }

    /// The stage index.
    pub fn stage(&self) -> StageId {
        self.stage
    }

    /// Logical id to table name, in id order.
    pub fn logical_tables(&self) -> &BTreeMap<LogicalId, String> {
        &self.logical_tables
    }

    /// Crossbar byte records.
    pub fn xbar_bytes(&self) -> &BTreeSet<XbarByteUsage> {
        &self.xbar_bytes
    }

    /// Hash bit records.
    pub fn hash_bits(&self) -> &BTreeMap<HashBitKey, HashBitUsage> {
        &self.hash_bits
    }

    /// Hash-distribution unit records.
    pub fn hash_dist(&self) -> &BTreeMap<HashDistKey, HashDistUsage> {
        &self.hash_dist
    }

    /// Action-bus byte consumers.
    pub fn action_bus(&self) -> &BTreeMap<u32, BTreeSet<String>> {
        &self.action_bus
    }

    /// Action-data slot consumers, grouped by width.
    pub fn action_slots(&self) -> &BTreeMap<ActionSlotKey, BTreeSet<String>> {
        &self.action_slots
    }

    /// Instruction-memory slot usage.
    pub fn imem(&self) -> &BTreeMap<ImemSlot, ImemColorUsage> {
        &self.imem
    }

    /// Memory allocations in the order tables were visited.
    pub fn memories(&self) -> &[TableMemoriesUsage] {
        &self.memories
    }

    /// Whether nothing was placed in this stage.
    pub fn is_empty(&self) -> bool {
        self.logical_tables.is_empty() && self.memories.is_empty()
    }
}

/// The collected usage of a whole pipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pipe_name: String,
    stages: Vec<StageAggregate>,
    parser: ParserResources,
    clots: Vec<ClotResourceUsage>,
}

impl PipelineReport {
    /// Creates a report with `stage_count` empty stages.
    pub fn new(pipe_name: impl Into<String>, stage_count: u32) -> Self {
        Self {
            pipe_name: pipe_name.into(),
            stages: (0..stage_count)
                .map(|s| StageAggregate::new(StageId::from_raw(s)))
                .collect(),
            parser: ParserResources::default(),
            clots: Vec::new(),
        }
    }

    /// Returns the aggregate for `stage`, or `None` if the pipe declares fewer
    /// stages.
    pub fn stage_mut(&mut self, stage: StageId) -> Option<&mut StageAggregate> {
        self.stages.get_mut(stage.index())
    }

    /// Sets the pipeline-wide summaries.
    pub fn set_summaries(&mut self, parser: ParserResources, clots: Vec<ClotResourceUsage>) {
        self.parser = parser;
        self.clots = clots;
    }

    /// The pipe's name.
    pub fn pipe_name(&self) -> &str {
        &self.pipe_name
    }

    /// All stages, in index order, empty ones included.
    pub fn stages(&self) -> &[StageAggregate] {
        &self.stages
    }

    /// Parser summary.
    pub fn parser(&self) -> &ParserResources {
        &self.parser
    }

    /// CLOT summaries.
    pub fn clots(&self) -> &[ClotResourceUsage] {
        &self.clots
    }
}
