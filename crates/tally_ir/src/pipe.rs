//! The pipeline tree: a pipe, its tables, and their stage placements.

use crate::alloc::TableResourceAlloc;
use crate::error::IrError;
use crate::summary::{ClotResourceUsage, ParserResources};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_common::{Gress, LogicalId, StageId};

/// A fully placed and allocated pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// The pipe's name.
    pub name: String,
    /// Number of physical stages on the target, including unused ones.
    #[serde(default)]
    pub stage_count: u32,
    /// All tables, in program order.
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Parser resource summary from the parser resource pass.
    #[serde(default)]
    pub parser: ParserResources,
    /// CLOT usage summaries, one per gress that allocates CLOTs.
    #[serde(default)]
    pub clots: Vec<ClotResourceUsage>,
}

impl Pipe {
    /// Creates an empty pipe spanning `stage_count` stages.
    pub fn new(name: impl Into<String>, stage_count: u32) -> Self {
        Self {
            name: name.into(),
            stage_count,
            ..Self::default()
        }
    }

    /// Appends a table.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Parses a pipeline dump from JSON text.
    pub fn from_json(text: &str) -> Result<Self, IrError> {
        serde_json::from_str(text).map_err(|e| IrError::Parse {
            reason: e.to_string(),
        })
    }

    /// Reads and parses a pipeline dump file.
    pub fn load(path: &Path) -> Result<Self, IrError> {
        let text = std::fs::read_to_string(path).map_err(|source| IrError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// A logical match-action table after placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Externally visible table name.
    pub name: String,
    /// The direction the table runs in.
    #[serde(default)]
    pub gress: Gress,
    /// Name of an attached gateway, if the table was merged with one.
    #[serde(default)]
    pub gateway: Option<String>,
    /// The table's actions.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// One entry per stage the table occupies. Wide tables have several.
    #[serde(default)]
    pub placements: Vec<StagePlacement>,
}

impl Table {
    /// Creates an unplaced ingress table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gress: Gress::Ingress,
            gateway: None,
            actions: Vec::new(),
            placements: Vec::new(),
        }
    }

    /// Sets the table's gress.
    pub fn gress(mut self, gress: Gress) -> Self {
        self.gress = gress;
        self
    }

    /// Attaches a gateway name.
    pub fn gateway(mut self, name: impl Into<String>) -> Self {
        self.gateway = Some(name.into());
        self
    }

    /// Adds an action.
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.actions.push(Action { name: name.into() });
        self
    }

    /// Places the table in a stage with the given allocation.
    pub fn placed(mut self, stage: u32, logical_id: u32, resources: TableResourceAlloc) -> Self {
        self.placements.push(StagePlacement {
            stage: StageId::from_raw(stage),
            logical_id: LogicalId::from_raw(logical_id),
            resources: Some(resources),
        });
        self
    }

    /// Places the table in a stage without an allocation result.
    pub fn placed_unallocated(mut self, stage: u32, logical_id: u32) -> Self {
        self.placements.push(StagePlacement {
            stage: StageId::from_raw(stage),
            logical_id: LogicalId::from_raw(logical_id),
            resources: None,
        });
        self
    }

    /// Whether the table spans more than one stage.
    pub fn is_wide(&self) -> bool {
        self.placements.len() > 1
    }
}

/// A table's occupancy of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagePlacement {
    /// The occupied stage.
    pub stage: StageId,
    /// The logical id assigned within that stage.
    pub logical_id: LogicalId,
    /// What the allocator assigned in this stage. `None` means allocation
    /// never ran for this placement.
    #[serde(default)]
    pub resources: Option<TableResourceAlloc>,
}

/// An action of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_places_wide_table() {
        let t = Table::new("T3")
            .placed(0, 1, TableResourceAlloc::default())
            .placed(1, 4, TableResourceAlloc::default());
        assert!(t.is_wide());
        assert!(!Table::new("T4").placed(2, 0, TableResourceAlloc::default()).is_wide());
        assert_eq!(t.placements[1].stage, StageId::from_raw(1));
        assert_eq!(t.placements[1].logical_id, LogicalId::from_raw(4));
    }

    #[test]
    fn parse_minimal_dump() {
        let pipe = Pipe::from_json(
            r#"{
                "name": "pipe0",
                "stage_count": 2,
                "tables": [
                    {"name": "T1", "gress": "egress",
                     "placements": [{"stage": 0, "logical_id": 3, "resources": {}}]},
                    {"name": "T2", "placements": [{"stage": 1, "logical_id": 0}]}
                ],
                "parser": {"states": 4}
            }"#,
        )
        .unwrap();
        assert_eq!(pipe.stage_count, 2);
        assert_eq!(pipe.tables[0].gress, Gress::Egress);
        assert!(pipe.tables[0].placements[0].resources.is_some());
        assert!(pipe.tables[1].placements[0].resources.is_none());
        assert_eq!(pipe.parser.0["states"], 4);
        assert!(pipe.clots.is_empty());
    }

    #[test]
    fn parse_error_is_reported() {
        let err = Pipe::from_json("{\"tables\": 3}").unwrap_err();
        assert!(matches!(err, IrError::Parse { .. }));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Pipe::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, IrError::Io { .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipe.json");
        std::fs::write(&path, r#"{"name":"p","stage_count":1}"#).unwrap();
        let pipe = Pipe::load(&path).unwrap();
        assert_eq!(pipe.name, "p");
    }
}
