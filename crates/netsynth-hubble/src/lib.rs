//! Hubble flow export reader
//!
//! Reads `hubble observe -o json` output or a batched collection and
//! normalizes each flow into a [`netsynth_common::FlowRecord`].

pub mod error;
pub mod parser;
pub mod reader;
pub mod types;

pub use error::{HubbleError, Result};
pub use parser::{normalize_flow, normalize_flows, to_hubble_flow};
pub use reader::{parse_export, read_flows_file, write_flows_file};
pub use types::{FlowCollection, HubbleEndpoint, HubbleFlow, Layer4, PortPair, COLLECTION_SCHEMA};

use std::path::Path;

use netsynth_common::FlowRecord;

/// Read an export file and normalize every flow in it
pub fn read_flow_records(path: &Path) -> Result<Vec<FlowRecord>> {
    let collection = read_flows_file(path)?;
    Ok(normalize_flows(&collection.flows))
}

/// Write flow records as a normalized batched collection
pub fn write_flow_records(records: &[FlowRecord], path: &Path) -> Result<()> {
    let collection = FlowCollection::new(records.iter().map(to_hubble_flow).collect());
    write_flows_file(&collection, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsynth_common::{FlowEndpoint, LabelSet, Protocol};

    #[test]
    fn story_records_round_trip_through_collection_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flows.json");
        let records = vec![FlowRecord::new(
            FlowEndpoint::new(LabelSet::parse(["app=frontend"]), "default"),
            FlowEndpoint::new(LabelSet::parse(["app=catalog"]), "default"),
            8080,
            Protocol::Tcp,
        )];

        write_flow_records(&records, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(COLLECTION_SCHEMA));
        assert_eq!(read_flow_records(&path).unwrap(), records);
    }
}
