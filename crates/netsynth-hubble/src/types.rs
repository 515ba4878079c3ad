//! Wire types for Hubble flow exports
//!
//! Field names follow `hubble observe -o json`. Unknown fields are ignored and
//! every field is optional, so partial exports still deserialize.

use serde::{Deserialize, Serialize};

/// Schema tag written on normalized collections
pub const COLLECTION_SCHEMA: &str = "netsynth.flows.v1";

/// One flow as exported by Hubble
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HubbleFlow {
    /// Observation timestamp, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Source endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<HubbleEndpoint>,
    /// Destination endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<HubbleEndpoint>,
    /// Network layer addresses
    #[serde(default, alias = "IP", skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpInfo>,
    /// Transport layer ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l4: Option<Layer4>,
    /// Verdict such as `FORWARDED` or `DROPPED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
}

/// Endpoint identity as Hubble reports it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubbleEndpoint {
    /// Labels in `key=value` form
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    /// Cilium security identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<u64>,
}

/// IP layer information
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IpInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// `"IPv4"`/`"IPv6"` or `4`/`6` depending on exporter version
    #[serde(default, rename = "ipVersion", skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<serde_json::Value>,
}

/// Transport layer information; at most one of TCP or UDP is set
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer4 {
    #[serde(default, rename = "TCP", skip_serializing_if = "Option::is_none")]
    pub tcp: Option<PortPair>,
    #[serde(default, rename = "UDP", skip_serializing_if = "Option::is_none")]
    pub udp: Option<PortPair>,
}

/// Source and destination port of a transport flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortPair {
    #[serde(default)]
    pub source_port: u16,
    #[serde(default)]
    pub destination_port: u16,
}

/// Batched export: a schema tag plus every flow
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowCollection {
    pub schema: String,
    #[serde(default)]
    pub flows: Vec<HubbleFlow>,
}

impl FlowCollection {
    /// Collection tagged with [`COLLECTION_SCHEMA`]
    pub fn new(flows: Vec<HubbleFlow>) -> Self {
        Self {
            schema: COLLECTION_SCHEMA.to_string(),
            flows,
        }
    }
}
