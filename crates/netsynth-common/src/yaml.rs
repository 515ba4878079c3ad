//! Generic YAML tree parsing using yaml-rust2
//!
//! Converts a YAML document into a `serde_json::Value` so callers can walk
//! mappings, sequences and scalars without committing to a typed schema.

use serde_json::{Map, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

/// Error raised when text is not well-formed YAML
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct YamlError(String);

impl YamlError {
    fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Parse exactly one YAML document into a generic tree.
///
/// Returns `Value::Null` for empty or comment-only input. Text that holds
/// more than one document (for example content after a `...` end marker) is
/// an error rather than being truncated.
pub fn parse_yaml(input: &str) -> Result<Value, YamlError> {
    let mut docs = YamlLoader::load_from_str(input).map_err(|e| YamlError::new(e.to_string()))?;
    if docs.len() > 1 {
        return Err(YamlError::new(format!(
            "expected a single document, found {}",
            docs.len()
        )));
    }
    match docs.pop() {
        Some(doc) => to_value(doc, "$"),
        None => Ok(Value::Null),
    }
}

/// Convert a node, naming `path` in any error
fn to_value(yaml: Yaml, path: &str) -> Result<Value, YamlError> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Boolean(b) => Ok(Value::Bool(b)),
        Yaml::Integer(i) => Ok(Value::Number(i.into())),
        Yaml::Real(s) => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| YamlError::new(format!("{path}: unrepresentable number '{s}'"))),
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| to_value(item, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Hash(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                let key = scalar_key(k, path)?;
                let child = format!("{path}.{key}");
                if out.insert(key, to_value(v, &child)?).is_some() {
                    return Err(YamlError::new(format!("{child}: duplicate key")));
                }
            }
            Ok(Value::Object(out))
        }
        Yaml::Alias(_) => Err(YamlError::new(format!("{path}: aliases are not supported"))),
        Yaml::BadValue => Err(YamlError::new(format!("{path}: bad value"))),
    }
}

/// Mapping keys are stringified; only scalar keys are accepted.
fn scalar_key(key: Yaml, path: &str) -> Result<String, YamlError> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(r) => Ok(r),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        _ => Err(YamlError::new(format!("{path}: mapping keys must be scalars"))),
    }
}
