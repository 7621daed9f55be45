//! Turns a finished [`PipelineReport`] into `resources.json`.
//!
//! Every category is translated by its own function, and every function sorts
//! its output by the category's key, so two identical reports always render
//! to identical bytes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tally_common::ContentHash;
use tally_ir::MemoryKind;
use tally_manifest::{ManifestEntry, ManifestIndex, Registration};
use tracing::info;

use crate::error::ResourceError;
use crate::schema::{
    ActionBusByteResource, ActionSlotResource, AluResource, BusResource, ByteCoordinate, GatewayResource,
    HashBitResource, HashBitUsageResource, HashDistResource, MauResources, MauStageResources,
    MemoryResource, Resources, ResourcesLog, VliwResource, VliwUsageResource, XbarByteResource,
    SCHEMA_VERSION,
};
use crate::stage::{PipelineReport, StageAggregate};

/// Manifest kind under which the artifact is registered.
pub const RESOURCES_KIND: &str = "resources";

/// Document-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Name of the compiled program.
    pub program_name: String,
    /// Compiler version recorded in the document.
    pub compiler_version: String,
    /// Indent the JSON output.
    pub pretty: bool,
}

impl ReportOptions {
    /// Pretty-printed output with an unknown compiler version.
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            compiler_version: "unknown".to_string(),
            pretty: true,
        }
    }
}

/// Where an artifact ended up and how it was registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    /// The path written.
    pub path: PathBuf,
    /// The path recorded in the manifest.
    pub relative_path: PathBuf,
    /// Digest of the written bytes.
    pub digest: ContentHash,
    /// What the manifest did with the entry.
    pub registration: Registration,
}

/// Serializes pipeline reports.
#[derive(Debug, Clone)]
pub struct Reporter {
    options: ReportOptions,
}

impl Reporter {
    /// Creates a reporter.
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Builds the document for `report`.
    pub fn build(&self, report: &PipelineReport) -> ResourcesLog {
        let mau_stages: Vec<MauStageResources> = report.stages().iter().map(stage_resources).collect();
        ResourcesLog {
            schema_version: SCHEMA_VERSION.to_string(),
            program_name: self.options.program_name.clone(),
            compiler_version: self.options.compiler_version.clone(),
            resources: Resources {
                parser: report.parser().0.clone(),
                clots: report.clots().iter().map(|c| c.0.clone()).collect(),
                mau: MauResources {
                    n_stages: mau_stages.len() as u32,
                    mau_stages,
                },
            },
        }
    }

    /// Renders the document as JSON text with a trailing newline.
    pub fn render(&self, report: &PipelineReport) -> Result<String, ResourceError> {
        let log = self.build(report);
        let result = if self.options.pretty {
            serde_json::to_string_pretty(&log)
        } else {
            serde_json::to_string(&log)
        };
        let mut text = result.map_err(|e| ResourceError::Serialization {
            reason: e.to_string(),
        })?;
        text.push('\n');
        Ok(text)
    }

    /// Writes the document to `artifact` and registers it in `manifest`.
    ///
    /// `artifact` must lie inside `output_dir`; the manifest records the path
    /// relative to it. Directories are not created: a missing parent is an
    /// I/O error.
    pub fn write<M: ManifestIndex + ?Sized>(
        &self,
        report: &PipelineReport,
        artifact: &Path,
        output_dir: &Path,
        manifest: &mut M,
    ) -> Result<WrittenArtifact, ResourceError> {
        let relative = artifact
            .strip_prefix(output_dir)
            .map_err(|_| ResourceError::OutsideOutputDir {
                path: artifact.to_path_buf(),
                output_dir: output_dir.to_path_buf(),
            })?
            .to_path_buf();
        let entry = ManifestEntry::new(RESOURCES_KIND, &relative)?;

        let text = self.render(report)?;
        std::fs::write(artifact, &text).map_err(|source| ResourceError::Io {
            path: artifact.to_path_buf(),
            source,
        })?;

        let digest = ContentHash::from_bytes(text.as_bytes());
        let registration =
            manifest.register(entry.with_pipe(report.pipe_name()).with_digest(digest));
        info!(path = %artifact.display(), %digest, ?registration, "wrote resource report");

        Ok(WrittenArtifact {
            path: artifact.to_path_buf(),
            relative_path: relative,
            digest,
            registration,
        })
    }
}

fn stage_resources(stage: &StageAggregate) -> MauStageResources {
    let memories = memory_resources(stage);
    MauStageResources {
        stage_number: stage.stage().as_raw(),
        logical_tables: stage
            .logical_tables()
            .iter()
            .map(|(id, name)| (id.as_raw(), name.clone()))
            .collect(),
        xbar_bytes: xbar_bytes(stage),
        hash_bits: hash_bits(stage),
        hash_distribution_units: hash_distribution_units(stage),
        action_bus_bytes: action_bus_bytes(stage),
        action_slots: action_slots(stage),
        vliw: vliw(stage),
        rams: memories.rams,
        map_rams: memories.map_rams,
        tcams: memories.tcams,
        stashes: memories.stashes,
        gateways: memories.gateways,
        meter_alus: memories.meter_alus,
        statistic_alus: memories.statistic_alus,
        exact_match_search_buses: memories.search_buses,
        exact_match_result_buses: memories.result_buses,
        tind_result_buses: memories.tind_result_buses,
    }
}

fn xbar_bytes(stage: &StageAggregate) -> Vec<XbarByteResource> {
    let mut out: Vec<XbarByteResource> = stage
        .xbar_bytes()
        .iter()
        .map(|u| XbarByteResource {
            byte: ByteCoordinate {
                group: u.byte.group,
                index: u.byte.index,
            },
            used_by: u.used_by.clone(),
            used_for: u.used_for.clone(),
        })
        .collect();
    out.sort();
    out
}

fn hash_bits(stage: &StageAggregate) -> Vec<HashBitResource> {
    let mut out: Vec<HashBitResource> = stage
        .hash_bits()
        .iter()
        .map(|(key, bit)| HashBitResource {
            hash_bit: key.bit,
            hash_function: key.function,
            used_by: bit.used_by.iter().cloned().collect(),
            used_for: bit.used_for.iter().cloned().collect(),
            usages: bit
                .usages
                .iter()
                .map(|u| HashBitUsageResource {
                    role: u.role,
                    value: u.value,
                    field_name: u.field_name.clone(),
                })
                .collect(),
        })
        .collect();
    out.sort_by_key(|b| (b.hash_bit, b.hash_function));
    out
}

fn hash_distribution_units(stage: &StageAggregate) -> Vec<HashDistResource> {
    let mut out: Vec<HashDistResource> = stage
        .hash_dist()
        .iter()
        .map(|(key, unit)| HashDistResource {
            hash_id: key.hash_id,
            unit_id: key.unit_id,
            used_by: unit.used_by.iter().cloned().collect(),
            used_for: unit.used_for.iter().cloned().collect(),
        })
        .collect();
    out.sort_by_key(|u| (u.hash_id, u.unit_id));
    out
}

fn action_bus_bytes(stage: &StageAggregate) -> Vec<ActionBusByteResource> {
    let mut out: Vec<ActionBusByteResource> = stage
        .action_bus()
        .iter()
        .map(|(&byte, users)| ActionBusByteResource {
            byte_number: byte,
            used_by: users.iter().cloned().collect(),
        })
        .collect();
    out.sort_by_key(|b| b.byte_number);
    out
}

fn action_slots(stage: &StageAggregate) -> Vec<ActionSlotResource> {
    let mut by_width: BTreeMap<u32, (u32, BTreeSet<&str>)> = BTreeMap::new();
    for (key, users) in stage.action_slots() {
        let (used, names) = by_width.entry(key.bit_width).or_default();
        *used += 1;
        names.extend(users.iter().map(String::as_str));
    }
    let mut out: Vec<ActionSlotResource> = by_width
        .into_iter()
        .map(|(width, (used, names))| ActionSlotResource {
            slot_bit_width: width,
            number_used: used,
            used_by: names.into_iter().map(str::to_string).collect(),
        })
        .collect();
    out.sort_by_key(|s| s.slot_bit_width);
    out
}

fn vliw(stage: &StageAggregate) -> Vec<VliwResource> {
    let mut out: Vec<VliwResource> = stage
        .imem()
        .iter()
        .map(|(slot, users)| VliwResource {
            color: slot.color,
            gress: slot.gress,
            usages: users
                .iter()
                .map(|(used_by, actions)| VliwUsageResource {
                    used_by: used_by.clone(),
                    actions: actions.iter().cloned().collect(),
                })
                .collect(),
        })
        .collect();
    out.sort_by_key(|v| (v.color, v.gress));
    out
}

#[derive(Default)]
struct MemoryResources {
    rams: Vec<MemoryResource>,
    map_rams: Vec<MemoryResource>,
    tcams: Vec<MemoryResource>,
    stashes: Vec<MemoryResource>,
    gateways: Vec<GatewayResource>,
    meter_alus: Vec<AluResource>,
    statistic_alus: Vec<AluResource>,
    search_buses: Vec<BusResource>,
    result_buses: Vec<BusResource>,
    tind_result_buses: Vec<BusResource>,
}

fn memory_resources(stage: &StageAggregate) -> MemoryResources {
    let mut out = MemoryResources::default();
    for table in stage.memories() {
        let used_by = &table.table_name;
        for mem in &table.memories {
            let used_for = mem.kind.as_str();
            let unit = |row: u32, column: u32| MemoryResource {
                row,
                column,
                used_by: used_by.clone(),
                used_for: used_for.to_string(),
            };
            let bus = |row: u32, bus: u32| BusResource {
                row,
                bus,
                used_by: used_by.clone(),
            };

            for row in &mem.rows {
                if mem.kind.is_tcam() {
                    out.tcams.extend(row.cols.iter().map(|&c| unit(row.row, c)));
                } else if mem.kind != MemoryKind::Gateway {
                    out.rams.extend(row.cols.iter().map(|&c| unit(row.row, c)));
                }
                out.map_rams.extend(row.map_cols.iter().map(|&c| unit(row.row, c)));
                out.stashes.extend(row.stash_cols.iter().map(|&c| unit(row.row, c)));

                if let Some(b) = row.bus.filter(|_| mem.kind.uses_search_bus()) {
                    out.search_buses.push(bus(row.row, b));
                }
                if let Some(b) = row.result_bus {
                    if mem.kind == MemoryKind::TernaryIndirect {
                        out.tind_result_buses.push(bus(row.row, b));
                    } else {
                        out.result_buses.push(bus(row.row, b));
                    }
                }
            }

            if let Some(gw) = mem.gateway {
                out.gateways.push(GatewayResource {
                    row: gw.row,
                    unit: gw.unit,
                    used_by: table.gateway_name.clone().unwrap_or_else(|| used_by.clone()),
                    used_for: MemoryKind::Gateway.as_str().to_string(),
                });
            }

            if let Some(home) = mem.home_row {
                let alu = AluResource {
                    id: home / 2,
                    used_by: used_by.clone(),
                    used_for: used_for.to_string(),
                };
                if mem.kind.uses_meter_alu() {
                    out.meter_alus.push(alu);
                } else if mem.kind.uses_stats_alu() {
                    out.statistic_alus.push(alu);
                }
            }
        }
    }

    out.rams.sort();
    out.map_rams.sort();
    out.tcams.sort();
    out.stashes.sort();
    out.gateways.sort();
    out.meter_alus.sort();
    out.meter_alus.dedup();
    out.statistic_alus.sort();
    out.statistic_alus.dedup();
    out.search_buses.sort();
    out.result_buses.sort();
    out.tind_result_buses.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect;
    use tally_ir::{
        ActionSlotUse, GatewayUnit, MemoryRow, MemoryUse, Pipe, Table, TableResourceAlloc,
    };
    use tally_manifest::Manifest;

    fn with_memories(memories: Vec<MemoryUse>) -> TableResourceAlloc {
        TableResourceAlloc {
            memories,
            ..TableResourceAlloc::default()
        }
    }

    fn stage0(pipe: &Pipe) -> MauStageResources {
        let report = collect(pipe).unwrap();
        let mut log = Reporter::new(ReportOptions::new("prog")).build(&report);
        log.resources.mau.mau_stages.remove(0)
    }

    #[test]
    fn memory_units_split_by_kind() {
        let exact = MemoryUse {
            kind: MemoryKind::Exact,
            rows: vec![MemoryRow {
                row: 3,
                cols: vec![4, 2],
                map_cols: vec![1],
                stash_cols: vec![0],
                bus: Some(1),
                result_bus: Some(0),
            }],
            home_row: None,
            gateway: Some(GatewayUnit { row: 3, unit: 1 }),
        };
        let tcam = MemoryUse::new(MemoryKind::Ternary).with_row(0, [1]);
        let pipe = Pipe::new("p", 1)
            .with_table(Table::new("T").gateway("cond0").placed(0, 0, with_memories(vec![exact, tcam])));
        let s = stage0(&pipe);

        let ram_cols: Vec<_> = s.rams.iter().map(|r| (r.row, r.column)).collect();
        assert_eq!(ram_cols, vec![(3, 2), (3, 4)]);
        assert_eq!(s.rams[0].used_for, "exact");
        assert_eq!(s.map_rams.len(), 1);
        assert_eq!(s.stashes.len(), 1);
        assert_eq!(s.tcams.len(), 1);
        assert_eq!(s.tcams[0].used_for, "ternary");
        assert_eq!(s.gateways[0].used_by, "cond0");
        assert_eq!(s.exact_match_search_buses.len(), 1);
        assert_eq!(s.exact_match_result_buses.len(), 1);
        assert!(s.tind_result_buses.is_empty());
    }

    #[test]
    fn tind_rows_use_tind_result_bus() {
        let tind = MemoryUse {
            kind: MemoryKind::TernaryIndirect,
            rows: vec![MemoryRow {
                row: 5,
                cols: vec![0],
                bus: Some(0),
                result_bus: Some(1),
                ..MemoryRow::default()
            }],
            home_row: None,
            gateway: None,
        };
        let pipe = Pipe::new("p", 1).with_table(Table::new("T").placed(0, 0, with_memories(vec![tind])));
        let s = stage0(&pipe);
        assert_eq!(s.tind_result_buses.len(), 1);
        assert!(s.exact_match_result_buses.is_empty());
        assert!(s.exact_match_search_buses.is_empty());
        assert_eq!(s.rams[0].used_for, "tind");
    }

    #[test]
    fn alus_follow_home_row() {
        let meter = MemoryUse::new(MemoryKind::Meter).with_row(7, [10]).with_home_row(7);
        let counter = MemoryUse::new(MemoryKind::Counter).with_row(4, [8]).with_home_row(4);
        let action = MemoryUse::new(MemoryKind::ActionData).with_row(2, [9]).with_home_row(2);
        let pipe = Pipe::new("p", 1)
            .with_table(Table::new("T").placed(0, 0, with_memories(vec![meter, counter, action])));
        let s = stage0(&pipe);
        assert_eq!(s.meter_alus.len(), 1);
        assert_eq!(s.meter_alus[0].id, 3);
        assert_eq!(s.statistic_alus.len(), 1);
        assert_eq!(s.statistic_alus[0].id, 2);
        assert_eq!(s.statistic_alus[0].used_for, "counter");
    }

    #[test]
    fn shared_home_row_claims_alu_once() {
        let first = MemoryUse::new(MemoryKind::Counter).with_row(4, [8]).with_home_row(4);
        let second = MemoryUse::new(MemoryKind::Counter).with_row(5, [9]).with_home_row(5);
        let meter = MemoryUse::new(MemoryKind::Meter).with_row(6, [1]).with_home_row(6);
        let meter_again = MemoryUse::new(MemoryKind::Meter).with_row(7, [2]).with_home_row(7);
        let pipe = Pipe::new("p", 1).with_table(
            Table::new("T").placed(0, 0, with_memories(vec![first, second, meter, meter_again])),
        );
        let s = stage0(&pipe);
        assert_eq!(s.statistic_alus.len(), 1);
        assert_eq!(s.statistic_alus[0].id, 2);
        assert_eq!(s.meter_alus.len(), 1);
        assert_eq!(s.meter_alus[0].id, 3);
    }

    #[test]
    fn action_slots_grouped_by_width() {
        let slots = |pairs: &[(u32, u32)]| TableResourceAlloc {
            action_slots: pairs
                .iter()
                .map(|&(bit_width, slot)| ActionSlotUse { bit_width, slot })
                .collect(),
            ..TableResourceAlloc::default()
        };
        let pipe = Pipe::new("p", 1)
            .with_table(Table::new("B").placed(0, 0, slots(&[(32, 0), (8, 1), (8, 1)])))
            .with_table(Table::new("A").placed(0, 1, slots(&[(8, 1), (8, 4), (16, 2)])));
        let s = stage0(&pipe);
        let rows: Vec<_> = s
            .action_slots
            .iter()
            .map(|r| (r.slot_bit_width, r.number_used, r.used_by.clone()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (8, 2, vec!["A".to_string(), "B".to_string()]),
                (16, 1, vec!["A".to_string()]),
                (32, 1, vec!["B".to_string()]),
            ]
        );
    }

    #[test]
    fn gateway_without_name_is_attributed_to_table() {
        let gw = MemoryUse {
            gateway: Some(GatewayUnit { row: 1, unit: 0 }),
            ..MemoryUse::new(MemoryKind::Gateway)
        };
        let pipe = Pipe::new("p", 1).with_table(Table::new("T").placed(0, 0, with_memories(vec![gw])));
        let s = stage0(&pipe);
        assert_eq!(s.gateways[0].used_by, "T");
        assert!(s.rams.is_empty());
    }

    #[test]
    fn empty_stages_are_reported() {
        let pipe = Pipe::new("p", 3)
            .with_table(Table::new("T").placed(1, 0, TableResourceAlloc::default()));
        let report = collect(&pipe).unwrap();
        let log = Reporter::new(ReportOptions::new("prog")).build(&report);
        assert_eq!(log.resources.mau.n_stages, 3);
        let numbers: Vec<_> = log.resources.mau.mau_stages.iter().map(|s| s.stage_number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
        assert!(log.resources.mau.mau_stages[0].logical_tables.is_empty());
    }

    #[test]
    fn compact_output_is_single_line() {
        let report = collect(&Pipe::new("p", 1)).unwrap();
        let mut options = ReportOptions::new("prog");
        options.pretty = false;
        let text = Reporter::new(options).render(&report).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn write_rejects_artifact_outside_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let report = collect(&Pipe::new("p", 1)).unwrap();
        let mut manifest = Manifest::new();
        let err = Reporter::new(ReportOptions::new("prog"))
            .write(&report, &other.path().join("r.json"), dir.path(), &mut manifest)
            .unwrap_err();
        assert!(matches!(err, ResourceError::OutsideOutputDir { .. }));
        assert!(manifest.artifacts.is_empty());
    }

    #[test]
    fn write_does_not_create_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let report = collect(&Pipe::new("p", 1)).unwrap();
        let mut manifest = Manifest::new();
        let artifact = dir.path().join("logs").join("resources.json");
        let err = Reporter::new(ReportOptions::new("prog"))
            .write(&report, &artifact, dir.path(), &mut manifest)
            .unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
        assert!(!dir.path().join("logs").exists());
        assert!(manifest.artifacts.is_empty());
    }
}
