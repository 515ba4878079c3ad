//! Policy resource types
//!
//! Typed `CiliumNetworkPolicy` resources produced by synthesis. The validator
//! deliberately does not use these types; it walks a generic YAML tree so
//! hand-edited files are checked the same way as generated ones.

mod cilium;

pub use cilium::{
    CiliumEgressRule, CiliumIngressRule, CiliumNetworkPolicy, CiliumNetworkPolicySpec, CiliumPort,
    CiliumPortRule, EndpointSelector, PolicyMetadata,
};
