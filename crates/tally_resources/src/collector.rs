//! The collection pass: folds per-table allocations into stage aggregates.

use tally_ir::{ClotResourceUsage, Inspector, Node, ParserResources, Pipe, Table};
use tracing::debug;

use crate::error::ResourceError;
use crate::model::{ActionSlotKey, HashBitKey, HashDistKey, TableMemoriesUsage, Usage, XbarByteUsage};
use crate::stage::PipelineReport;

/// Source of the pipeline-wide parser and CLOT summaries.
///
/// These are computed by other passes; the collector copies them through.
pub trait SummaryProvider {
    /// Parser resource usage of `pipe`.
    fn parser_resources(&self, pipe: &Pipe) -> ParserResources;

    /// CLOT usage of `pipe`.
    fn clot_usages(&self, pipe: &Pipe) -> Vec<ClotResourceUsage>;
}

/// Reads the summaries carried on the [`Pipe`] itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSummaries;

impl SummaryProvider for EmbeddedSummaries {
    fn parser_resources(&self, pipe: &Pipe) -> ParserResources {
        pipe.parser.clone()
    }

    fn clot_usages(&self, pipe: &Pipe) -> Vec<ClotResourceUsage> {
        pipe.clots.clone()
    }
}

/// Builds a [`PipelineReport`] from one walk over a [`Pipe`].
#[derive(Debug, Default)]
pub struct Collector<S = EmbeddedSummaries> {
    summaries: S,
    report: PipelineReport,
}

impl Collector {
    /// Creates a collector that takes summaries from the pipe.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: SummaryProvider> Collector<S> {
    /// Creates a collector with a custom summary source.
    pub fn with_summaries(summaries: S) -> Self {
        Self {
            summaries,
            report: PipelineReport::default(),
        }
    }

    /// Hands over the collected report.
    pub fn finish(self) -> PipelineReport {
        self.report
    }

    fn collect_table(&mut self, table: &Table) -> Result<(), ResourceError> {
        if table.placements.is_empty() {
            return Err(ResourceError::MissingAllocation {
                table: table.name.clone(),
                stage: None,
            });
        }

        let used_by = table.name.as_str();
        for placement in &table.placements {
            let alloc = placement
                .resources
                .as_ref()
                .ok_or_else(|| ResourceError::MissingAllocation {
                    table: table.name.clone(),
                    stage: Some(placement.stage),
                })?;
            debug!(table = %table.name, stage = %placement.stage, logical_id = %placement.logical_id, "collecting table");

            let stage_count = self.report.stages().len();
            let stage = self.report.stage_mut(placement.stage).ok_or_else(|| {
                ResourceError::StageOutOfRange {
                    table: table.name.clone(),
                    stage: placement.stage,
                    stage_count,
                }
            })?;
            stage.insert_logical_id(placement.logical_id, used_by)?;

            for xbar in &alloc.xbar {
                for &byte in &xbar.bytes {
                    stage.add_xbar_byte(XbarByteUsage::new(byte, used_by, xbar.purpose.as_str()));
                }
            }

            for hb in &alloc.hash_bits {
                let key = HashBitKey {
                    bit: hb.bit,
                    function: hb.function,
                };
                let usage = Usage {
                    role: hb.role,
                    value: hb.value,
                    field_name: hb.field.clone(),
                };
                stage.add_hash_bit(key, used_by, &hb.purpose, usage);
            }

            for hd in &alloc.hash_dist {
                let key = HashDistKey {
                    hash_id: hd.hash_id,
                    unit_id: hd.unit_id,
                };
                stage.add_hash_dist(key, used_by, &hd.purpose);
            }

            for &byte in &alloc.action_bus {
                stage.add_action_bus_byte(byte, used_by);
            }

            for slot in &alloc.action_slots {
                let key = ActionSlotKey {
                    bit_width: slot.bit_width,
                    slot: slot.slot,
                };
                stage.add_action_slot(key, used_by);
            }

            for instr in &alloc.instr_mem {
                stage.add_instruction(instr.color, table.gress, used_by, &instr.action);
            }

            stage.push_memories(TableMemoriesUsage {
                table_name: table.name.clone(),
                gateway_name: table.gateway.clone(),
                stage: placement.stage,
                memories: alloc.memories.clone(),
            });
        }
        Ok(())
    }
}

impl<S: SummaryProvider> Inspector for Collector<S> {
    type Error = ResourceError;

    fn preorder(&mut self, node: Node<'_>) -> Result<bool, ResourceError> {
        match node {
            Node::Pipe(pipe) => {
                self.report = PipelineReport::new(pipe.name.clone(), pipe.stage_count);
                self.report.set_summaries(
                    self.summaries.parser_resources(pipe),
                    self.summaries.clot_usages(pipe),
                );
                Ok(true)
            }
            Node::Table(table) => {
                self.collect_table(table)?;
                // Instruction slots already name their actions.
                Ok(false)
            }
            Node::Action { .. } => Ok(false),
        }
    }

    fn end_apply(&mut self, pipe: &Pipe) -> Result<(), ResourceError> {
        let used = self
            .report
            .stages()
            .iter()
            .filter(|s| !s.is_empty())
            .count();
        debug!(pipe = %pipe.name, tables = pipe.tables.len(), stages = self.report.stages().len(), used, "collection finished");
        Ok(())
    }
}

/// Collects `pipe` with summaries taken from the pipe itself.
pub fn collect(pipe: &Pipe) -> Result<PipelineReport, ResourceError> {
    let mut collector = Collector::new();
    pipe.apply(&mut collector)?;
    Ok(collector.finish())
}
