//! netsynth CLI configuration
//!
//! An optional file supplies defaults for the flow and policy paths and the
//! namespace filter. Command-line flags always win over file values.
//!
//! The config file resolution chain (highest priority first):
//! 1. Explicit `--config` flag
//! 2. `NETSYNTH_CONFIG` environment variable
//! 3. `~/.netsynth/config.json`, if it exists
//! 4. Built-in defaults
//!
//! Files are JSON unless their extension is `.yaml` or `.yml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const CONFIG_DIR_NAME: &str = ".netsynth";
const CONFIG_FILE_NAME: &str = "config.json";
const NETSYNTH_CONFIG_ENV: &str = "NETSYNTH_CONFIG";

/// Default location of the normalized flow collection
pub const DEFAULT_FLOWS_FILE: &str = "out/flows.json";
/// Default location of the synthesized policy file
pub const DEFAULT_POLICY_FILE: &str = "out/policy.yaml";

/// Persistent CLI defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NetsynthConfig {
    /// Flow collection read by `propose` and written by `learn`.
    pub flows_file: Option<PathBuf>,
    /// Policy file written by `propose` and read by `verify`.
    pub policy_file: Option<PathBuf>,
    /// Namespace filter for `propose`.
    pub namespace: Option<String>,
}

impl NetsynthConfig {
    pub fn flows_file(&self) -> PathBuf {
        self.flows_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FLOWS_FILE))
    }

    pub fn policy_file(&self) -> PathBuf {
        self.policy_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POLICY_FILE))
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

/// Where a config file was found and whether it has to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    /// Explicitly requested paths must exist; the home default may not
    pub required: bool,
}

/// Path to `~/.netsynth/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Resolve the config file location using the priority chain.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<ConfigLocation> {
    resolve_with(
        explicit,
        std::env::var(NETSYNTH_CONFIG_ENV).ok(),
        default_config_path(),
    )
}

fn resolve_with(
    explicit: Option<&Path>,
    env: Option<String>,
    home_default: Option<PathBuf>,
) -> Option<ConfigLocation> {
    if let Some(path) = explicit {
        return Some(ConfigLocation {
            path: path.to_path_buf(),
            required: true,
        });
    }

    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return Some(ConfigLocation {
            path: PathBuf::from(path),
            required: true,
        });
    }

    home_default.map(|path| ConfigLocation {
        path,
        required: false,
    })
}

/// Load the resolved config, returning defaults when no file applies.
pub fn load_config(explicit: Option<&Path>) -> Result<NetsynthConfig> {
    match resolve_config_path(explicit) {
        Some(location) => load_from(&location),
        None => Ok(NetsynthConfig::default()),
    }
}

fn load_from(location: &ConfigLocation) -> Result<NetsynthConfig> {
    let path = &location.path;
    if !location.required && !path.exists() {
        return Ok(NetsynthConfig::default());
    }

    let data = std::fs::read_to_string(path)
        .map_err(|e| Error::command_failed(format!("failed to read {}: {}", path.display(), e)))?;
    let config = parse_config(path, &data)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn parse_config(path: &Path, data: &str) -> Result<NetsynthConfig> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str(data).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(data).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| Error::command_failed(format!("failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_uses_builtin_paths() {
        let config = NetsynthConfig::default();
        assert_eq!(config.flows_file(), PathBuf::from("out/flows.json"));
        assert_eq!(config.policy_file(), PathBuf::from("out/policy.yaml"));
        assert!(config.namespace().is_none());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: NetsynthConfig = serde_json::from_str(r#"{"namespace": "prod"}"#).unwrap();
        assert_eq!(config.namespace(), Some("prod"));
        assert_eq!(config.policy_file(), PathBuf::from(DEFAULT_POLICY_FILE));
    }

    // =========================================================================
    // Resolution chain
    // =========================================================================

    #[test]
    fn explicit_flag_beats_env() {
        let loc = resolve_with(
            Some(Path::new("/flag.json")),
            Some("/env.json".to_string()),
            Some(PathBuf::from("/home/.netsynth/config.json")),
        )
        .unwrap();
        assert_eq!(loc.path, PathBuf::from("/flag.json"));
        assert!(loc.required);
    }

    #[test]
    fn env_beats_home_default() {
        let loc = resolve_with(
            None,
            Some("/env.json".to_string()),
            Some(PathBuf::from("/home/.netsynth/config.json")),
        )
        .unwrap();
        assert_eq!(loc.path, PathBuf::from("/env.json"));
        assert!(loc.required);
    }

    #[test]
    fn empty_env_falls_through_to_home() {
        let loc = resolve_with(
            None,
            Some(String::new()),
            Some(PathBuf::from("/home/.netsynth/config.json")),
        )
        .unwrap();
        assert!(!loc.required);
    }

    #[test]
    fn no_sources_resolves_to_nothing() {
        assert!(resolve_with(None, None, None).is_none());
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn missing_optional_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loc = ConfigLocation {
            path: dir.path().join("config.json"),
            required: false,
        };
        assert_eq!(load_from(&loc).unwrap(), NetsynthConfig::default());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loc = ConfigLocation {
            path: dir.path().join("config.json"),
            required: true,
        };
        assert!(matches!(load_from(&loc), Err(Error::CommandFailed { .. })));
    }

    #[test]
    fn loads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("config.json");
        std::fs::write(&json, r#"{"flows_file": "data/flows.json"}"#).unwrap();
        let yaml = dir.path().join("config.yaml");
        std::fs::write(&yaml, "policy_file: data/policy.yaml\nnamespace: prod\n").unwrap();

        let config = load_config(Some(&json)).unwrap();
        assert_eq!(config.flows_file(), PathBuf::from("data/flows.json"));

        let config = load_config(Some(&yaml)).unwrap();
        assert_eq!(config.policy_file(), PathBuf::from("data/policy.yaml"));
        assert_eq!(config.namespace(), Some("prod"));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }
}
