//! YAML rendering of synthesized policies
//!
//! Output order is fixed entirely by grouping and rule derivation; rendering
//! only emits one document per policy with `---` between consecutive
//! documents.

use std::path::Path;

use netsynth_common::policy::CiliumNetworkPolicy;
use netsynth_common::{Error, Result, CILIUM_POLICY_KIND, DOCUMENT_SEPARATOR};
use tracing::debug;

use crate::rules::PolicyObject;

/// Render a single policy resource as one YAML document
pub fn render_policy(policy: &CiliumNetworkPolicy) -> Result<String> {
    serde_yaml::to_string(policy)
        .map_err(|e| Error::serialization_for_kind(CILIUM_POLICY_KIND, e.to_string()))
}

/// Render policies as a multi-document YAML stream.
///
/// No separator precedes the first document or follows the last. An empty
/// slice renders as an empty string.
pub fn render_policies(policies: &[PolicyObject]) -> Result<String> {
    let mut out = String::new();
    for (i, policy) in policies.iter().enumerate() {
        if i > 0 {
            out.push_str(DOCUMENT_SEPARATOR);
            out.push('\n');
        }
        let doc = render_policy(&policy.to_cilium())?;
        out.push_str(&doc);
        if !doc.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

/// Render policies and write them to `path`, creating parent directories.
///
/// Refuses to write an empty policy set.
pub fn write_policies(policies: &[PolicyObject], path: &Path) -> Result<()> {
    if policies.is_empty() {
        return Err(Error::NoPolicies);
    }

    let content = render_policies(policies)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, content)?;

    debug!(path = %path.display(), policies = policies.len(), "wrote policy file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PermissionRule, PortProtocol};
    use netsynth_common::{LabelSet, Protocol};
    use std::collections::BTreeSet;

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        pairs.iter().copied().collect()
    }

    fn policy(app: &str, source: &str, ports: &[u16]) -> PolicyObject {
        PolicyObject {
            name: format!("{app}-policy"),
            namespace: "default".to_string(),
            selector: labels(&[("app", app)]),
            rules: vec![PermissionRule {
                source_selector: labels(&[("app", source)]),
                ports: ports
                    .iter()
                    .map(|p| PortProtocol::new(*p, Protocol::Tcp))
                    .collect::<BTreeSet<_>>(),
            }],
        }
    }

    #[test]
    fn story_single_policy_renders_expected_document() {
        let yaml = render_policies(&[policy("catalog", "frontend", &[8080])]).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(doc["apiVersion"].as_str(), Some("cilium.io/v2"));
        assert_eq!(doc["kind"].as_str(), Some("CiliumNetworkPolicy"));
        assert_eq!(doc["metadata"]["name"].as_str(), Some("catalog-policy"));
        assert_eq!(doc["metadata"]["namespace"].as_str(), Some("default"));
        assert_eq!(
            doc["spec"]["endpointSelector"]["matchLabels"]["app"].as_str(),
            Some("catalog")
        );
        let port = &doc["spec"]["ingress"][0]["toPorts"][0]["ports"][0];
        // Port stays a string, not an integer
        assert_eq!(port["port"].as_str(), Some("8080"));
        assert_eq!(port["protocol"].as_str(), Some("TCP"));
        assert!(!yaml.starts_with("---"));
    }

    #[test]
    fn story_documents_are_separated_without_leading_or_trailing_marker() {
        let yaml = render_policies(&[
            policy("api", "web", &[80]),
            policy("db", "api", &[5432]),
            policy("cache", "api", &[6379]),
        ])
        .unwrap();

        let separators = yaml.lines().filter(|l| *l == "---").count();
        assert_eq!(separators, 2);
        assert!(!yaml.starts_with("---"));
        assert!(!yaml.trim_end().ends_with("---"));
    }

    #[test]
    fn empty_slice_renders_empty_string() {
        assert_eq!(render_policies(&[]).unwrap(), "");
    }

    #[test]
    fn rendering_is_repeatable() {
        let policies = vec![policy("api", "web", &[443, 80])];
        assert_eq!(
            render_policies(&policies).unwrap(),
            render_policies(&policies).unwrap()
        );
    }

    #[test]
    fn write_refuses_empty_policy_set() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_policies(&[], &dir.path().join("policy.yaml")).unwrap_err();
        assert!(matches!(err, Error::NoPolicies));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("nested").join("policy.yaml");
        write_policies(&[policy("api", "web", &[80])], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("name: api-policy"));
    }
}
