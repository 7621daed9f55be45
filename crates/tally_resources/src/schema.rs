//! The `resources.json` document layout.
//!
//! Field names here are the external contract read by visualizers and
//! regression tooling. Changing any of them requires bumping
//! [`SCHEMA_VERSION`].

// Field names mirror the document keys and are not repeated in prose.
#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_common::Gress;
use tally_ir::HashBitRole;

/// Version of the document layout.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// The root of `resources.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesLog {
    /// Layout version.
    pub schema_version: String,
    /// Name of the compiled program.
    pub program_name: String,
    /// Version of the compiler that produced the report.
    pub compiler_version: String,
    /// The resource sections.
    pub resources: Resources,
}

/// Parser, CLOT and match-action resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    /// Parser summary, copied verbatim.
    pub parser: Value,
    /// CLOT summaries, copied verbatim.
    pub clots: Vec<Value>,
    /// Match-action unit resources.
    pub mau: MauResources,
}

/// Resources of all match-action stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MauResources {
    /// Number of stages reported.
    #[serde(rename = "nStages")]
    pub n_stages: u32,
    /// One entry per stage, in stage order.
    pub mau_stages: Vec<MauStageResources>,
}

/// Everything used in one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MauStageResources {
    pub stage_number: u32,
    /// Logical id to table name.
    pub logical_tables: BTreeMap<u32, String>,
    pub xbar_bytes: Vec<XbarByteResource>,
    pub hash_bits: Vec<HashBitResource>,
    pub hash_distribution_units: Vec<HashDistResource>,
    pub action_bus_bytes: Vec<ActionBusByteResource>,
    pub action_slots: Vec<ActionSlotResource>,
    pub vliw: Vec<VliwResource>,
    pub rams: Vec<MemoryResource>,
    pub map_rams: Vec<MemoryResource>,
    pub tcams: Vec<MemoryResource>,
    pub stashes: Vec<MemoryResource>,
    pub gateways: Vec<GatewayResource>,
    pub meter_alus: Vec<AluResource>,
    pub statistic_alus: Vec<AluResource>,
    pub exact_match_search_buses: Vec<BusResource>,
    pub exact_match_result_buses: Vec<BusResource>,
    pub tind_result_buses: Vec<BusResource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ByteCoordinate {
    pub group: u32,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct XbarByteResource {
    pub byte: ByteCoordinate,
    pub used_by: String,
    pub used_for: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashBitResource {
    pub hash_bit: u32,
    pub hash_function: u32,
    pub used_by: Vec<String>,
    pub used_for: Vec<String>,
    pub usages: Vec<HashBitUsageResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashBitUsageResource {
    pub role: HashBitRole,
    pub value: i32,
    pub field_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDistResource {
    pub hash_id: u32,
    pub unit_id: u32,
    pub used_by: Vec<String>,
    pub used_for: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBusByteResource {
    pub byte_number: u32,
    pub used_by: Vec<String>,
}

/// Action-data slots of one width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSlotResource {
    pub slot_bit_width: u32,
    /// Distinct slots of this width in use.
    pub number_used: u32,
    pub used_by: Vec<String>,
}

/// One instruction-memory color slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VliwResource {
    pub color: u32,
    pub gress: Gress,
    pub usages: Vec<VliwUsageResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VliwUsageResource {
    pub used_by: String,
    pub actions: Vec<String>,
}

/// A RAM, map-RAM, TCAM or stash unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemoryResource {
    pub row: u32,
    pub column: u32,
    pub used_by: String,
    pub used_for: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GatewayResource {
    pub row: u32,
    pub unit: u32,
    pub used_by: String,
    pub used_for: String,
}

/// A meter or statistics ALU.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AluResource {
    pub id: u32,
    pub used_by: String,
    pub used_for: String,
}

/// A search or result bus of one row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusResource {
    pub row: u32,
    pub bus: u32,
    pub used_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_count_uses_camel_case_key() {
        let mau = MauResources {
            n_stages: 3,
            mau_stages: Vec::new(),
        };
        let v = serde_json::to_value(&mau).unwrap();
        assert_eq!(v["nStages"], 3);
        assert!(v.get("n_stages").is_none());
    }

    #[test]
    fn logical_tables_serialize_with_string_keys_in_numeric_order() {
        let mut tables = BTreeMap::new();
        tables.insert(10, "ten".to_string());
        tables.insert(2, "two".to_string());
        let json = serde_json::to_string(&tables).unwrap();
        assert_eq!(json, r#"{"2":"two","10":"ten"}"#);
    }

    #[test]
    fn vliw_gress_is_lowercase() {
        let v = VliwResource {
            color: 1,
            gress: Gress::Egress,
            usages: Vec::new(),
        };
        assert_eq!(serde_json::to_value(&v).unwrap()["gress"], "egress");
    }
}
