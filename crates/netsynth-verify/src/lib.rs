//! Structural validation of CiliumNetworkPolicy YAML streams
//!
//! A stream is split into documents, each document is parsed into a generic
//! tree and checked field by field. All violations are collected; nothing
//! about one document stops the others from being checked.

pub mod document;
pub mod report;
pub mod schema;

pub use document::{split_documents, Document};
pub use report::{DocumentReport, ValidationReport};
pub use schema::{check_policy, Findings, VALID_PROTOCOLS};

use std::path::Path;

use netsynth_common::yaml::parse_yaml;
use netsynth_common::Result;
use tracing::debug;

/// Validate every document in a multi-document policy stream
pub fn validate_policies(text: &str) -> ValidationReport {
    let mut documents = Vec::new();
    let mut errors = Vec::new();

    for doc in split_documents(text) {
        let report = match parse_yaml(&doc.body) {
            Ok(value) => {
                let findings = check_policy(&value);
                DocumentReport {
                    index: doc.index,
                    name: findings.name,
                    namespace: findings.namespace,
                    kind: findings.kind,
                    valid: findings.errors.is_empty(),
                    errors: findings.errors,
                }
            }
            Err(e) => {
                let message = format!("invalid YAML syntax: {e}");
                errors.push(format!("document {}: {message}", doc.index));
                DocumentReport {
                    index: doc.index,
                    name: None,
                    namespace: None,
                    kind: None,
                    valid: false,
                    errors: vec![message],
                }
            }
        };

        debug!(
            index = report.index,
            name = ?report.name,
            errors = report.errors.len(),
            "checked document"
        );
        documents.push(report);
    }

    if documents.is_empty() {
        errors.push("no valid policies found in file".to_string());
    }

    ValidationReport {
        valid: !documents.is_empty() && documents.iter().all(|d| d.valid),
        documents,
        errors,
    }
}

/// Read and validate a policy file.
///
/// Only a failure to read the file is an error; every policy problem lands
/// in the report.
pub fn validate_file(path: &Path) -> Result<ValidationReport> {
    let text = std::fs::read_to_string(path)?;
    let report = validate_policies(&text);
    debug!(
        path = %path.display(),
        documents = report.documents.len(),
        valid = report.valid,
        "validated policy file"
    );
    Ok(report)
}
