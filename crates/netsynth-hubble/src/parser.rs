//! Normalization of Hubble flows into flow records

use netsynth_common::{FlowEndpoint, FlowRecord, LabelSet, Protocol};

use crate::types::{HubbleEndpoint, HubbleFlow, Layer4, PortPair};

/// Convert a Hubble flow into a flow record.
///
/// Missing endpoints become empty identities, which grouping later skips. A
/// flow without transport information defaults to TCP with port 0. TCP wins
/// when both TCP and UDP are present.
pub fn normalize_flow(flow: &HubbleFlow) -> FlowRecord {
    let (port, protocol) = match &flow.l4 {
        Some(Layer4 { tcp: Some(tcp), .. }) => (tcp.destination_port, Protocol::Tcp),
        Some(Layer4 { udp: Some(udp), .. }) => (udp.destination_port, Protocol::Udp),
        _ => (0, Protocol::default()),
    };

    let mut record = FlowRecord::new(
        endpoint(flow.source.as_ref()),
        endpoint(flow.destination.as_ref()),
        port,
        protocol,
    );
    record.verdict = flow.verdict.clone().filter(|v| !v.is_empty());
    record
}

/// Normalize every flow, preserving order
pub fn normalize_flows(flows: &[HubbleFlow]) -> Vec<FlowRecord> {
    flows.iter().map(normalize_flow).collect()
}

/// Convert a flow record back into Hubble wire form
pub fn to_hubble_flow(record: &FlowRecord) -> HubbleFlow {
    let ports = PortPair {
        source_port: 0,
        destination_port: record.port,
    };
    let l4 = match record.protocol {
        Protocol::Tcp => Layer4 {
            tcp: Some(ports),
            udp: None,
        },
        Protocol::Udp => Layer4 {
            tcp: None,
            udp: Some(ports),
        },
    };

    HubbleFlow {
        source: Some(to_hubble_endpoint(&record.source)),
        destination: Some(to_hubble_endpoint(&record.destination)),
        l4: Some(l4),
        verdict: record.verdict.clone(),
        ..Default::default()
    }
}

fn endpoint(ep: Option<&HubbleEndpoint>) -> FlowEndpoint {
    let Some(ep) = ep else {
        return FlowEndpoint::default();
    };
    let mut out = FlowEndpoint::new(LabelSet::parse(&ep.labels), ep.namespace.clone());
    if let Some(pod) = ep.pod_name.as_deref().filter(|p| !p.is_empty()) {
        out = out.with_pod(pod);
    }
    out
}

fn to_hubble_endpoint(ep: &FlowEndpoint) -> HubbleEndpoint {
    HubbleEndpoint {
        labels: ep.labels.iter().map(|(k, v)| format!("{k}={v}")).collect(),
        namespace: ep.namespace.clone(),
        pod_name: ep.pod_name.clone(),
        identity: None,
    }
}
