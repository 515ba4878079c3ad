//! Reading and writing flow export files
//!
//! Two input shapes are accepted: a batched collection
//! (`{"schema": ..., "flows": [...]}`) and Hubble's NDJSON stream where each
//! line wraps one flow as `{"flow": {...}, ...}`.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{HubbleError, Result};
use crate::types::{FlowCollection, HubbleFlow, COLLECTION_SCHEMA};

/// Parse export text in either supported shape.
///
/// A batched collection is recognized by a non-empty `schema` string; flows
/// inside it that fail to deserialize are skipped. Otherwise the text is read
/// as NDJSON, skipping lines that are not JSON or carry no `flow`. NDJSON
/// that yields no flow at all is [`HubbleError::UnrecognizedFormat`].
pub fn parse_export(text: &str) -> Result<FlowCollection> {
    if let Some(collection) = parse_batched(text) {
        return Ok(collection);
    }

    let mut flows = Vec::new();
    let mut skipped = 0usize;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let flow = serde_json::from_str::<Value>(line)
            .ok()
            .and_then(|mut v| v.get_mut("flow").map(Value::take))
            .and_then(|v| serde_json::from_value::<HubbleFlow>(v).ok());
        match flow {
            Some(flow) => flows.push(flow),
            None => skipped += 1,
        }
    }

    if flows.is_empty() {
        return Err(HubbleError::UnrecognizedFormat);
    }
    if skipped > 0 {
        warn!(skipped, "skipped NDJSON lines without a readable flow");
    }
    debug!(flows = flows.len(), "parsed NDJSON export");
    Ok(FlowCollection {
        schema: COLLECTION_SCHEMA.to_string(),
        flows,
    })
}

fn parse_batched(text: &str) -> Option<FlowCollection> {
    let Value::Object(mut root) = serde_json::from_str::<Value>(text).ok()? else {
        return None;
    };
    let schema = match root.get("schema") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return None,
    };

    let raw = match root.remove("flows") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let total = raw.len();
    let flows: Vec<HubbleFlow> = raw
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();

    if flows.len() < total {
        warn!(
            skipped = total - flows.len(),
            "skipped unreadable flows in batched export"
        );
    }
    debug!(schema = %schema, flows = flows.len(), "parsed batched export");
    Some(FlowCollection { schema, flows })
}

/// Read and parse an export file
pub fn read_flows_file(path: &Path) -> Result<FlowCollection> {
    let text = std::fs::read_to_string(path).map_err(|e| HubbleError::read(path, e))?;
    parse_export(&text)
}

/// Write a collection as pretty-printed JSON, creating parent directories
pub fn write_flows_file(collection: &FlowCollection, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(collection)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| HubbleError::write(dir, e))?;
    }
    std::fs::write(path, json).map_err(|e| HubbleError::write(path, e))?;
    debug!(path = %path.display(), flows = collection.flows.len(), "wrote flows file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NDJSON: &str = r#"{"flow":{"source":{"labels":["app=web"],"namespace":"prod"},"destination":{"labels":["app=api"],"namespace":"prod"},"l4":{"TCP":{"destination_port":443}},"verdict":"FORWARDED"},"node_name":"node-1","time":"2024-05-01T10:00:00Z"}
not json at all
{"node_name":"node-1"}

{"flow":{"source":{"labels":["app=api"],"namespace":"prod"},"destination":{"labels":["app=dns"],"namespace":"kube-system"},"l4":{"UDP":{"destination_port":53}}}}
"#;

    #[test]
    fn story_ndjson_export_skips_noise() {
        let collection = parse_export(NDJSON).unwrap();
        assert_eq!(collection.schema, COLLECTION_SCHEMA);
        assert_eq!(collection.flows.len(), 2);
        assert_eq!(collection.flows[1].l4.as_ref().unwrap().udp.unwrap().destination_port, 53);
    }

    #[test]
    fn story_batched_export_keeps_its_schema() {
        let text = r#"{
            "schema": "cpp.flows.v1",
            "flows": [
                {"source": {"labels": ["app=web"], "namespace": "prod"},
                 "destination": {"labels": ["app=api"], "namespace": "prod"},
                 "l4": {"TCP": {"destination_port": 8080}}},
                {"l4": "garbage"}
            ]
        }"#;
        let collection = parse_export(text).unwrap();
        assert_eq!(collection.schema, "cpp.flows.v1");
        assert_eq!(collection.flows.len(), 1);
    }

    #[test]
    fn batched_export_may_be_empty() {
        let collection = parse_export(r#"{"schema":"netsynth.flows.v1","flows":[]}"#).unwrap();
        assert!(collection.flows.is_empty());
    }

    #[rstest]
    #[case::empty("")]
    #[case::plain_text("hello")]
    #[case::no_schema(r#"{"flows": []}"#)]
    #[case::array("[1, 2, 3]")]
    fn unrecognized_input_is_an_error(#[case] text: &str) {
        assert!(matches!(
            parse_export(text),
            Err(HubbleError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn written_collection_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("flows.json");
        let collection = parse_export(NDJSON).unwrap();

        write_flows_file(&collection, &path).unwrap();
        let reread = read_flows_file(&path).unwrap();
        assert_eq!(reread, collection);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_flows_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, HubbleError::Read { .. }));
    }
}
