//! Kubernetes namespace name checks

use crate::{Error, Result};

const MAX_NAMESPACE_LEN: usize = 63;

fn is_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Check that `namespace` is a valid Kubernetes namespace name.
///
/// An empty string is accepted and means "no namespace".
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Ok(());
    }
    if namespace.len() > MAX_NAMESPACE_LEN {
        return Err(Error::validation_for_field(
            "namespace",
            format!("namespace '{namespace}' exceeds {MAX_NAMESPACE_LEN} characters"),
        ));
    }
    if !namespace.chars().all(|c| is_alnum(c) || c == '-') {
        return Err(Error::validation_for_field(
            "namespace",
            format!(
                "namespace '{namespace}' must contain only lowercase alphanumeric characters or '-'"
            ),
        ));
    }
    if !namespace.starts_with(is_alnum) || !namespace.ends_with(is_alnum) {
        return Err(Error::validation_for_field(
            "namespace",
            format!("namespace '{namespace}' must start and end with an alphanumeric character"),
        ));
    }
    Ok(())
}
