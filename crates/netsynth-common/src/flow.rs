//! Flow record model
//!
//! The normalized shape of one observed connection, as handed to synthesis by
//! the ingestion layer. Records are plain data and never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::labels::LabelSet;

/// Transport protocol of a flow
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// TCP (the default when the source did not say)
    #[default]
    Tcp,
    /// UDP
    Udp,
}

impl Protocol {
    /// Wire form used in policy documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a connection
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEndpoint {
    /// Endpoint labels
    #[serde(default)]
    pub labels: LabelSet,
    /// Kubernetes namespace (empty when unknown)
    #[serde(default)]
    pub namespace: String,
    /// Pod name, when the endpoint is a pod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
}

impl FlowEndpoint {
    /// Create an endpoint from labels and namespace
    pub fn new(labels: LabelSet, namespace: impl Into<String>) -> Self {
        Self {
            labels,
            namespace: namespace.into(),
            pod_name: None,
        }
    }

    /// Set the pod name
    pub fn with_pod(mut self, pod_name: impl Into<String>) -> Self {
        self.pod_name = Some(pod_name.into());
        self
    }

    /// True when the endpoint can be the target of a policy
    pub fn is_addressable(&self) -> bool {
        !self.namespace.is_empty() && !self.labels.is_empty()
    }
}

/// One observed connection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRecord {
    /// Connection initiator
    pub source: FlowEndpoint,
    /// Connection target
    pub destination: FlowEndpoint,
    /// Destination port (0 when the flow carried no L4 port)
    pub port: u16,
    /// Transport protocol
    #[serde(default)]
    pub protocol: Protocol,
    /// Observed verdict (informational only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
}

impl FlowRecord {
    /// Create a flow record with no verdict
    pub fn new(
        source: FlowEndpoint,
        destination: FlowEndpoint,
        port: u16,
        protocol: Protocol,
    ) -> Self {
        Self {
            source,
            destination,
            port,
            protocol,
            verdict: None,
        }
    }

    /// Attach the observed verdict
    pub fn with_verdict(mut self, verdict: impl Into<String>) -> Self {
        self.verdict = Some(verdict.into());
        self
    }
}
