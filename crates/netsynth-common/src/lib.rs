//! Common types for netsynth: flow records, label sets, policy resources, and utilities

#![deny(missing_docs)]

pub mod error;
pub mod flow;
pub mod labels;
pub mod namespace;
pub mod policy;
pub mod yaml;

pub use error::Error;
pub use flow::{FlowEndpoint, FlowRecord, Protocol};
pub use labels::LabelSet;
pub use namespace::validate_namespace;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// API version of every policy document netsynth emits and accepts
pub const CILIUM_API_VERSION: &str = "cilium.io/v2";

/// Resource kind of every policy document netsynth emits and accepts
pub const CILIUM_POLICY_KIND: &str = "CiliumNetworkPolicy";

/// Line separating consecutive documents in a multi-document YAML stream
pub const DOCUMENT_SEPARATOR: &str = "---";
