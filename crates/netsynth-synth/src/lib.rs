//! Least-privilege policy synthesis from observed flows
//!
//! Flows are grouped into authorization units by destination identity
//! ([`grouping`]), each unit gets one rule per observed source identity
//! ([`rules`]), and the resulting policies are rendered as a deterministic
//! multi-document YAML stream ([`serializer`]).
//!
//! For synthesis, use [`PolicySynthesizer`] or the [`synthesize`] shorthand.

pub mod grouping;
pub mod rules;
pub mod serializer;

pub use grouping::{group_by_destination, AuthorizationUnit, Grouping, UnitKey};
pub use rules::{policy_name, PermissionRule, PolicyObject, PortProtocol};
pub use serializer::{render_policies, render_policy, write_policies};

use netsynth_common::{validate_namespace, Error, FlowRecord, Result};
use tracing::{debug, info};

/// Counters describing what a synthesis run kept and dropped
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SynthesisStats {
    /// Flows handed in
    pub flows: usize,
    /// Flows outside the namespace filter
    pub flows_filtered: usize,
    /// Flows whose destination had no namespace or labels
    pub flows_without_destination: usize,
    /// Authorization units formed
    pub units: usize,
    /// Units that produced no rule and therefore no policy
    pub units_without_rules: usize,
    /// Policies emitted
    pub policies: usize,
}

/// Output of a synthesis run
#[derive(Clone, Debug, Default)]
pub struct Synthesis {
    /// Policies in deterministic order (namespace, then destination labels)
    pub policies: Vec<PolicyObject>,
    /// What was kept and dropped along the way
    pub stats: SynthesisStats,
}

impl Synthesis {
    /// True when flows were present but nothing was synthesizable
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// Synthesizer turning flow records into policy objects
///
/// Holds no state across calls; independent flow sets can be synthesized
/// with independent instances or by reusing one.
#[derive(Clone, Debug, Default)]
pub struct PolicySynthesizer {
    namespace: Option<String>,
}

impl PolicySynthesizer {
    /// Create a synthesizer that considers every namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Only synthesize policies for destinations in `namespace`
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Synthesize one policy per authorization unit that has at least one rule.
    ///
    /// Fails with [`Error::NoFlowsProvided`] when `flows` is empty and with
    /// [`Error::Validation`] when the namespace filter is not a valid
    /// namespace name. Input that yields no policy is an `Ok` result with no
    /// policies.
    pub fn synthesize(&self, flows: &[FlowRecord]) -> Result<Synthesis> {
        if let Some(ns) = &self.namespace {
            validate_namespace(ns)?;
        }
        if flows.is_empty() {
            return Err(Error::NoFlowsProvided);
        }

        let selected: Vec<FlowRecord>;
        let input = match &self.namespace {
            Some(ns) => {
                selected = flows
                    .iter()
                    .filter(|f| f.destination.namespace == *ns)
                    .cloned()
                    .collect();
                selected.as_slice()
            }
            None => flows,
        };

        let mut stats = SynthesisStats {
            flows: flows.len(),
            flows_filtered: flows.len() - input.len(),
            ..Default::default()
        };

        if input.is_empty() {
            info!(namespace = ?self.namespace, "no flows in selected namespace");
            return Ok(Synthesis {
                policies: Vec::new(),
                stats,
            });
        }

        let grouping = group_by_destination(input)?;
        stats.flows_without_destination = grouping.skipped;
        stats.units = grouping.units.len();

        let mut policies = Vec::with_capacity(grouping.units.len());
        for unit in &grouping.units {
            match rules::synthesize_unit(unit) {
                Some(policy) => policies.push(policy),
                None => {
                    stats.units_without_rules += 1;
                    debug!(
                        namespace = %unit.namespace,
                        selector = %unit.selector,
                        flows = unit.flows.len(),
                        "unit produced no rules"
                    );
                }
            }
        }
        stats.policies = policies.len();

        info!(
            flows = stats.flows,
            units = stats.units,
            policies = stats.policies,
            skipped_flows = stats.flows_without_destination,
            "synthesized policies"
        );

        Ok(Synthesis { policies, stats })
    }
}

/// Synthesize policies for every namespace
pub fn synthesize(flows: &[FlowRecord]) -> Result<Synthesis> {
    PolicySynthesizer::new().synthesize(flows)
}
