//! Rule derivation for a single authorization unit
//!
//! Every distinct source label set observed flowing into a unit yields one
//! permission rule carrying exactly the `(port, protocol)` pairs it used.

use std::collections::{BTreeMap, BTreeSet};

use netsynth_common::policy::{
    CiliumIngressRule, CiliumNetworkPolicy, CiliumNetworkPolicySpec, CiliumPort, CiliumPortRule,
    EndpointSelector, PolicyMetadata,
};
use netsynth_common::{LabelSet, Protocol};

use crate::grouping::AuthorizationUnit;

/// Label keys consulted, in order, when naming a policy
pub const PREFERRED_NAME_KEYS: [&str; 4] = ["app", "k8s:app", "name", "component"];

/// Name used when a unit has no labels at all
pub const DEFAULT_POLICY_NAME: &str = "default-policy";

const POLICY_NAME_SUFFIX: &str = "-policy";

/// A destination port and its transport protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortProtocol {
    /// Destination port
    pub port: u16,
    /// Transport protocol
    pub protocol: Protocol,
}

impl PortProtocol {
    /// Create a port/protocol pair
    pub fn new(port: u16, protocol: Protocol) -> Self {
        Self { port, protocol }
    }
}

/// Permission for one source identity to reach a unit on a set of ports
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionRule {
    /// Labels selecting the permitted source
    pub source_selector: LabelSet,
    /// Observed ports, ordered by port then protocol
    pub ports: BTreeSet<PortProtocol>,
}

/// The synthesized least-privilege policy for one authorization unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyObject {
    /// Policy name
    pub name: String,
    /// Namespace the policy lives in
    pub namespace: String,
    /// Labels selecting the protected endpoints
    pub selector: LabelSet,
    /// Rules, ordered by canonical source labels
    pub rules: Vec<PermissionRule>,
}

/// Derive a policy name from destination labels.
///
/// Uses the first present key from [`PREFERRED_NAME_KEYS`], then the value of
/// the first label in key order, then [`DEFAULT_POLICY_NAME`].
pub fn policy_name(labels: &LabelSet) -> String {
    PREFERRED_NAME_KEYS
        .iter()
        .find_map(|key| labels.get(key))
        .or_else(|| labels.iter().next().map(|(_, value)| value))
        .map(|value| format!("{value}{POLICY_NAME_SUFFIX}"))
        .unwrap_or_else(|| DEFAULT_POLICY_NAME.to_string())
}

/// Derive one permission rule per distinct source label set.
///
/// Flows from unlabeled sources or without a destination port contribute
/// nothing. Rules come back sorted by canonical source labels; sources are
/// told apart by their label pairs, not by the canonical string.
pub fn derive_rules(unit: &AuthorizationUnit<'_>) -> Vec<PermissionRule> {
    let mut by_source: BTreeMap<(String, LabelSet), PermissionRule> = BTreeMap::new();

    for flow in &unit.flows {
        if flow.source.labels.is_empty() || flow.port == 0 {
            continue;
        }

        by_source
            .entry((flow.source.labels.canonical(), flow.source.labels.clone()))
            .or_insert_with(|| PermissionRule {
                source_selector: flow.source.labels.clone(),
                ports: BTreeSet::new(),
            })
            .ports
            .insert(PortProtocol::new(flow.port, flow.protocol));
    }

    by_source.into_values().collect()
}

/// Synthesize the policy for a unit, or `None` if no rule could be formed
pub fn synthesize_unit(unit: &AuthorizationUnit<'_>) -> Option<PolicyObject> {
    let rules = derive_rules(unit);
    if rules.is_empty() {
        return None;
    }

    Some(PolicyObject {
        name: policy_name(&unit.selector),
        namespace: unit.namespace.clone(),
        selector: unit.selector.clone(),
        rules,
    })
}

impl PermissionRule {
    /// Render as a Cilium ingress rule.
    ///
    /// Ports are split into one port rule per protocol (TCP before UDP), each
    /// listing its ports in ascending order.
    pub fn to_ingress_rule(&self) -> CiliumIngressRule {
        let mut by_protocol: BTreeMap<Protocol, Vec<CiliumPort>> = BTreeMap::new();
        for pp in &self.ports {
            by_protocol.entry(pp.protocol).or_default().push(CiliumPort {
                port: pp.port.to_string(),
                protocol: pp.protocol.to_string(),
            });
        }

        CiliumIngressRule {
            from_endpoints: vec![EndpointSelector::from_labels(self.source_selector.clone())],
            to_ports: by_protocol
                .into_values()
                .map(|ports| CiliumPortRule { ports })
                .collect(),
        }
    }
}

impl PolicyObject {
    /// Render as a CiliumNetworkPolicy resource
    pub fn to_cilium(&self) -> CiliumNetworkPolicy {
        CiliumNetworkPolicy::new(
            PolicyMetadata::new(&self.name, &self.namespace),
            CiliumNetworkPolicySpec {
                endpoint_selector: EndpointSelector::from_labels(self.selector.clone()),
                ingress: self.rules.iter().map(PermissionRule::to_ingress_rule).collect(),
                egress: vec![],
            },
        )
    }
}
