//! Validation report types

use serde::Serialize;

/// Outcome of checking one document in a policy stream
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// 1-based position in the stream
    pub index: usize,
    /// `metadata.name`, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `metadata.namespace`, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// `kind`, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// True when `errors` is empty
    pub valid: bool,
    /// Every violation found in this document
    pub errors: Vec<String>,
}

/// Outcome of checking a whole policy stream
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True when at least one document exists and every document is valid
    pub valid: bool,
    /// Per-document results in stream order
    pub documents: Vec<DocumentReport>,
    /// Stream-level errors, including each unparseable document
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Number of documents that passed
    pub fn valid_count(&self) -> usize {
        self.documents.iter().filter(|d| d.valid).count()
    }

    /// Total violations across all documents
    pub fn error_count(&self) -> usize {
        self.documents.iter().map(|d| d.errors.len()).sum()
    }

    /// Documents that failed
    pub fn invalid_documents(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|d| !d.valid)
    }
}
