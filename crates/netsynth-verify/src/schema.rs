//! Structural checks over a generic policy tree
//!
//! Walks a parsed document as plain mappings, sequences and scalars. Every
//! violation is recorded; no check stops the walk.

use serde_json::{Map, Value};

use netsynth_common::{CILIUM_API_VERSION, CILIUM_POLICY_KIND};

/// Protocols accepted in `toPorts[].ports[].protocol`, compared case-insensitively
pub const VALID_PROTOCOLS: [&str; 4] = ["TCP", "UDP", "ICMP", "SCTP"];

/// Identity and violations found in one document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Findings {
    /// `metadata.name`, when it is a string
    pub name: Option<String>,
    /// `metadata.namespace`, when it is a string
    pub namespace: Option<String>,
    /// `kind`, when it is a string
    pub kind: Option<String>,
    /// Every violation, in document order
    pub errors: Vec<String>,
}

/// Rule direction; decides which peer field is checked
#[derive(Clone, Copy, Debug)]
enum Direction {
    Ingress,
    Egress,
}

impl Direction {
    fn section(self) -> &'static str {
        match self {
            Direction::Ingress => "ingress",
            Direction::Egress => "egress",
        }
    }

    fn peers(self) -> &'static str {
        match self {
            Direction::Ingress => "fromEndpoints",
            Direction::Egress => "toEndpoints",
        }
    }
}

/// Check a parsed document against the CiliumNetworkPolicy shape.
///
/// A `null` root (empty or comment-only document) is checked as an empty
/// mapping so every missing field is reported.
pub fn check_policy(doc: &Value) -> Findings {
    let empty = Map::new();
    let root = match doc {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Findings {
                errors: vec!["document root must be a mapping".to_string()],
                ..Default::default()
            }
        }
    };

    let mut findings = Findings::default();
    check_api_identity(root, &mut findings);
    check_metadata(root, &mut findings);
    check_spec(root, &mut findings.errors);
    findings
}

fn check_api_identity(root: &Map<String, Value>, findings: &mut Findings) {
    match root.get("apiVersion") {
        None | Some(Value::Null) => findings
            .errors
            .push("missing required field: apiVersion".to_string()),
        Some(Value::String(v)) if v == CILIUM_API_VERSION => {}
        Some(other) => findings.errors.push(format!(
            "invalid apiVersion: expected '{}', got '{}'",
            CILIUM_API_VERSION,
            display_scalar(other)
        )),
    }

    match root.get("kind") {
        None | Some(Value::Null) => findings
            .errors
            .push("missing required field: kind".to_string()),
        Some(Value::String(kind)) => {
            findings.kind = Some(kind.clone());
            if kind != CILIUM_POLICY_KIND {
                findings.errors.push(format!(
                    "invalid kind: expected '{}', got '{}'",
                    CILIUM_POLICY_KIND, kind
                ));
            }
        }
        Some(other) => findings.errors.push(format!(
            "invalid kind: expected '{}', got '{}'",
            CILIUM_POLICY_KIND,
            display_scalar(other)
        )),
    }
}

fn check_metadata(root: &Map<String, Value>, findings: &mut Findings) {
    let Some(metadata) = root.get("metadata").and_then(Value::as_object) else {
        findings
            .errors
            .push("missing required field: metadata".to_string());
        return;
    };

    match metadata.get("name") {
        Some(Value::String(name)) => {
            findings.name = Some(name.clone());
            if name.is_empty() {
                findings
                    .errors
                    .push("metadata.name cannot be empty".to_string());
            }
        }
        _ => findings
            .errors
            .push("missing required field: metadata.name".to_string()),
    }

    if let Some(Value::String(namespace)) = metadata.get("namespace") {
        findings.namespace = Some(namespace.clone());
    }
}

fn check_spec(root: &Map<String, Value>, errors: &mut Vec<String>) {
    let Some(spec) = root.get("spec").and_then(Value::as_object) else {
        errors.push("missing required field: spec".to_string());
        return;
    };

    match spec.get("endpointSelector").and_then(Value::as_object) {
        None => errors.push("missing required field: spec.endpointSelector".to_string()),
        Some(selector) => match selector.get("matchLabels").and_then(Value::as_object) {
            None => errors
                .push("missing required field: spec.endpointSelector.matchLabels".to_string()),
            Some(labels) if labels.is_empty() => {
                errors.push("endpointSelector.matchLabels cannot be empty".to_string())
            }
            Some(_) => {}
        },
    }

    for direction in [Direction::Ingress, Direction::Egress] {
        let section = direction.section();
        match spec.get(section) {
            None | Some(Value::Null) => {}
            Some(Value::Array(rules)) => {
                for (i, rule) in rules.iter().enumerate() {
                    let prefix = format!("{section}[{i}]");
                    check_rule(rule, direction, &prefix, errors);
                }
            }
            Some(_) => errors.push(format!("spec.{section} must be a list")),
        }
    }
}

fn check_rule(rule: &Value, direction: Direction, prefix: &str, errors: &mut Vec<String>) {
    let Some(rule) = rule.as_object() else {
        errors.push(format!("{prefix}: {} rule must be a map", direction.section()));
        return;
    };

    let peers = direction.peers();
    match rule.get(peers) {
        None | Some(Value::Null) => {}
        Some(Value::Array(selectors)) => {
            for (i, selector) in selectors.iter().enumerate() {
                check_selector(selector, &format!("{prefix}: {peers}[{i}]"), errors);
            }
        }
        Some(_) => errors.push(format!("{prefix}: {peers} must be a list")),
    }

    match rule.get("toPorts") {
        None | Some(Value::Null) => {}
        Some(Value::Array(port_rules)) => {
            for (i, port_rule) in port_rules.iter().enumerate() {
                check_port_rule(port_rule, &format!("{prefix}: toPorts[{i}]"), errors);
            }
        }
        Some(_) => errors.push(format!("{prefix}: toPorts must be a list")),
    }
}

fn check_selector(selector: &Value, prefix: &str, errors: &mut Vec<String>) {
    let Some(selector) = selector.as_object() else {
        errors.push(format!("{prefix} must be a map"));
        return;
    };
    match selector.get("matchLabels").and_then(Value::as_object) {
        None => errors.push(format!("{prefix} missing matchLabels")),
        Some(labels) if labels.is_empty() => {
            errors.push(format!("{prefix}.matchLabels cannot be empty"))
        }
        Some(_) => {}
    }
}

fn check_port_rule(port_rule: &Value, prefix: &str, errors: &mut Vec<String>) {
    let Some(port_rule) = port_rule.as_object() else {
        errors.push(format!("{prefix}: port rule must be a map"));
        return;
    };

    let ports = match port_rule.get("ports") {
        Some(Value::Array(ports)) => ports,
        Some(Value::Null) | None => {
            errors.push(format!("{prefix}: missing required field: ports"));
            return;
        }
        Some(_) => {
            errors.push(format!("{prefix}: ports must be a list"));
            return;
        }
    };

    if ports.is_empty() {
        errors.push(format!("{prefix}: ports array cannot be empty"));
        return;
    }

    for (i, port) in ports.iter().enumerate() {
        let Some(port) = port.as_object() else {
            errors.push(format!("{prefix}: ports[{i}] must be a map"));
            continue;
        };

        match port.get("port") {
            Some(Value::String(p)) if p.is_empty() => {
                errors.push(format!("{prefix}: ports[{i}].port cannot be empty"))
            }
            Some(Value::String(_)) => {}
            Some(Value::Null) | None => {
                errors.push(format!("{prefix}: ports[{i}] missing required field: port"))
            }
            Some(_) => errors.push(format!("{prefix}: ports[{i}].port must be a quoted string")),
        }

        match port.get("protocol") {
            Some(Value::String(proto)) => {
                if !is_valid_protocol(proto) {
                    errors.push(format!(
                        "{prefix}: ports[{i}].protocol invalid: '{proto}' is not supported, must be TCP, UDP, ICMP, or SCTP"
                    ));
                }
            }
            Some(Value::Null) | None => errors.push(format!(
                "{prefix}: ports[{i}] missing required field: protocol"
            )),
            Some(other) => errors.push(format!(
                "{prefix}: ports[{i}].protocol invalid: '{}' is not supported, must be TCP, UDP, ICMP, or SCTP",
                display_scalar(other)
            )),
        }
    }
}

fn is_valid_protocol(protocol: &str) -> bool {
    VALID_PROTOCOLS
        .iter()
        .any(|valid| valid.eq_ignore_ascii_case(protocol))
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn valid_policy() -> Value {
        json!({
            "apiVersion": "cilium.io/v2",
            "kind": "CiliumNetworkPolicy",
            "metadata": {"name": "catalog-policy", "namespace": "default"},
            "spec": {
                "endpointSelector": {"matchLabels": {"app": "catalog"}},
                "ingress": [{
                    "fromEndpoints": [{"matchLabels": {"app": "frontend"}}],
                    "toPorts": [{"ports": [{"port": "8080", "protocol": "TCP"}]}]
                }]
            }
        })
    }

    #[test]
    fn story_well_formed_policy_has_no_findings() {
        let findings = check_policy(&valid_policy());
        assert!(findings.errors.is_empty(), "{:?}", findings.errors);
        assert_eq!(findings.name.as_deref(), Some("catalog-policy"));
        assert_eq!(findings.namespace.as_deref(), Some("default"));
        assert_eq!(findings.kind.as_deref(), Some("CiliumNetworkPolicy"));
    }

    #[test]
    fn story_wrong_api_version_is_the_only_error() {
        let mut doc = valid_policy();
        doc["apiVersion"] = json!("wrong/v1");
        let findings = check_policy(&doc);
        assert_eq!(findings.errors.len(), 1);
        assert!(findings.errors[0].contains("apiVersion"));
        assert!(findings.errors[0].contains("wrong/v1"));
    }

    #[test]
    fn story_unsupported_protocol_is_reported() {
        let mut doc = valid_policy();
        doc["spec"]["ingress"][0]["toPorts"][0]["ports"][0]["protocol"] = json!("HTTP");
        let findings = check_policy(&doc);
        assert_eq!(findings.errors.len(), 1);
        assert!(findings.errors[0].contains("protocol invalid"));
        assert!(findings.errors[0].contains("HTTP"));
        assert!(findings.errors[0].starts_with("ingress[0]: toPorts[0]: ports[0]"));
    }

    #[rstest]
    #[case("tcp")]
    #[case("Udp")]
    #[case("icmp")]
    #[case("SCTP")]
    fn protocols_are_case_insensitive(#[case] proto: &str) {
        let mut doc = valid_policy();
        doc["spec"]["ingress"][0]["toPorts"][0]["ports"][0]["protocol"] = json!(proto);
        assert!(check_policy(&doc).errors.is_empty(), "{proto} rejected");
    }

    /// Story: every violation is collected in a single pass
    #[test]
    fn story_violations_accumulate() {
        let doc = json!({
            "apiVersion": "v1",
            "kind": "NetworkPolicy",
            "metadata": {"name": ""},
            "spec": {
                "endpointSelector": {"matchLabels": {}},
                "ingress": [{
                    "fromEndpoints": [{"matchLabels": {}}, {}],
                    "toPorts": [{"ports": []}, {}]
                }],
                "egress": [{
                    "toEndpoints": ["not-a-map"],
                    "toPorts": [{"ports": [{"port": "", "protocol": "TCP"}, {"port": "53"}]}]
                }]
            }
        });

        let errors = check_policy(&doc).errors;
        assert_eq!(
            errors,
            vec![
                "invalid apiVersion: expected 'cilium.io/v2', got 'v1'",
                "invalid kind: expected 'CiliumNetworkPolicy', got 'NetworkPolicy'",
                "metadata.name cannot be empty",
                "endpointSelector.matchLabels cannot be empty",
                "ingress[0]: fromEndpoints[0].matchLabels cannot be empty",
                "ingress[0]: fromEndpoints[1] missing matchLabels",
                "ingress[0]: toPorts[0]: ports array cannot be empty",
                "ingress[0]: toPorts[1]: missing required field: ports",
                "egress[0]: toEndpoints[0] must be a map",
                "egress[0]: toPorts[0]: ports[0].port cannot be empty",
                "egress[0]: toPorts[0]: ports[1] missing required field: protocol",
            ]
        );
    }

    #[test]
    fn missing_top_level_sections_are_each_reported() {
        let errors = check_policy(&json!({})).errors;
        assert_eq!(
            errors,
            vec![
                "missing required field: apiVersion",
                "missing required field: kind",
                "missing required field: metadata",
                "missing required field: spec",
            ]
        );
        assert_eq!(check_policy(&Value::Null).errors.len(), 4);
    }

    #[test]
    fn missing_selector_and_name() {
        let doc = json!({
            "apiVersion": "cilium.io/v2",
            "kind": "CiliumNetworkPolicy",
            "metadata": {"namespace": "default"},
            "spec": {"endpointSelector": {}}
        });
        let findings = check_policy(&doc);
        assert_eq!(
            findings.errors,
            vec![
                "missing required field: metadata.name",
                "missing required field: spec.endpointSelector.matchLabels",
            ]
        );
        assert_eq!(findings.namespace.as_deref(), Some("default"));
    }

    #[test]
    fn integer_port_must_be_quoted() {
        let mut doc = valid_policy();
        doc["spec"]["ingress"][0]["toPorts"][0]["ports"][0]["port"] = json!(8080);
        let errors = check_policy(&doc).errors;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("must be a quoted string"));
    }

    #[test]
    fn non_list_sections_are_reported() {
        let mut doc = valid_policy();
        doc["spec"]["egress"] = json!({"toPorts": []});
        doc["spec"]["ingress"][0]["fromEndpoints"] = json!("frontend");
        let errors = check_policy(&doc).errors;
        assert!(errors.contains(&"spec.egress must be a list".to_string()));
        assert!(errors.contains(&"ingress[0]: fromEndpoints must be a list".to_string()));
    }

    #[test]
    fn scalar_root_is_rejected() {
        let findings = check_policy(&json!("just a string"));
        assert_eq!(findings.errors, vec!["document root must be a mapping"]);
    }

    #[test]
    fn non_map_rule_is_reported() {
        let mut doc = valid_policy();
        doc["spec"]["ingress"] = json!(["oops"]);
        let errors = check_policy(&doc).errors;
        assert_eq!(errors, vec!["ingress[0]: ingress rule must be a map"]);
    }
}
