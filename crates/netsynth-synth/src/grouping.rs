//! Grouping flows into authorization units
//!
//! An authorization unit is every flow that targets one destination identity
//! (namespace plus label set). Each unit becomes at most one policy.

use std::collections::BTreeMap;

use netsynth_common::{Error, FlowRecord, LabelSet, Result};

/// Destination identity used as the grouping key.
///
/// Ordering is namespace first, then canonical label string, which is also
/// the output order of [`group_by_destination`]. The label set itself takes
/// part in equality, so sets that merely render alike stay separate units.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey {
    /// Destination namespace
    pub namespace: String,
    /// Canonical `key=value,...` form of the destination labels
    pub labels: String,
    /// The destination labels
    pub selector: LabelSet,
}

impl UnitKey {
    /// Build the key for a namespace and label set
    pub fn new(namespace: &str, labels: &LabelSet) -> Self {
        Self {
            namespace: namespace.to_string(),
            labels: labels.canonical(),
            selector: labels.clone(),
        }
    }
}

/// All flows sharing one destination identity
#[derive(Clone, Debug)]
pub struct AuthorizationUnit<'a> {
    /// Destination namespace
    pub namespace: String,
    /// Destination labels; becomes the policy's endpoint selector
    pub selector: LabelSet,
    /// Contributing flows
    pub flows: Vec<&'a FlowRecord>,
}

impl AuthorizationUnit<'_> {
    /// Grouping key of this unit
    pub fn key(&self) -> UnitKey {
        UnitKey::new(&self.namespace, &self.selector)
    }
}

/// Result of partitioning a flow set
#[derive(Clone, Debug, Default)]
pub struct Grouping<'a> {
    /// Units sorted by namespace, then canonical labels
    pub units: Vec<AuthorizationUnit<'a>>,
    /// Flows dropped because their destination had no namespace or labels
    pub skipped: usize,
}

/// Partition flows into authorization units keyed by destination identity.
///
/// Flows whose destination lacks a namespace or labels are counted in
/// [`Grouping::skipped`] and otherwise ignored.
pub fn group_by_destination(flows: &[FlowRecord]) -> Result<Grouping<'_>> {
    if flows.is_empty() {
        return Err(Error::NoFlowsProvided);
    }

    let mut units: BTreeMap<UnitKey, AuthorizationUnit<'_>> = BTreeMap::new();
    let mut skipped = 0;

    for flow in flows {
        let destination = &flow.destination;
        if !destination.is_addressable() {
            skipped += 1;
            continue;
        }

        units
            .entry(UnitKey::new(&destination.namespace, &destination.labels))
            .or_insert_with(|| AuthorizationUnit {
                namespace: destination.namespace.clone(),
                selector: destination.labels.clone(),
                flows: Vec::new(),
            })
            .flows
            .push(flow);
    }

    Ok(Grouping {
        units: units.into_values().collect(),
        skipped,
    })
}
