//! Client configuration for the HTTP collaborators.
//!
//! The config is a small versioned JSON file. `BOOKFLOW_API_BASE` overrides the
//! base URL after loading so a single file can serve several environments.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Environment variable that replaces `api_base_url`.
pub const API_BASE_ENV: &str = "BOOKFLOW_API_BASE";

const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub schema_version: u32,
    pub api_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_user_agent() -> String {
    format!("bookflow/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        default_config()
    }
}

pub fn default_config() -> ClientConfig {
    ClientConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        api_base_url: DEFAULT_API_BASE.to_string(),
        timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        user_agent: default_user_agent(),
    }
}

/// `<config dir>/bookflow/config.json`, or `None` on platforms without one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bookflow").join("config.json"))
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ClientConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Resolve the effective config for a command.
///
/// An explicit path must exist. Without one, the default location is used when
/// present and built-in defaults otherwise. The env override applies last.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ClientConfig> {
    let config = match explicit {
        Some(path) => load_config(path)?,
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => load_config(&path)?,
            None => {
                tracing::debug!("no config file; using defaults");
                default_config()
            }
        },
    };
    let config = with_base_override(config, env::var(API_BASE_ENV).ok());
    validate_config(&config)?;
    Ok(config)
}

/// Replace the base URL when an override is set and non-blank.
pub fn with_base_override(mut config: ClientConfig, base: Option<String>) -> ClientConfig {
    if let Some(base) = base.map(|base| base.trim().to_string()).filter(|base| !base.is_empty()) {
        tracing::debug!(api_base_url = %base, "api base overridden from {API_BASE_ENV}");
        config.api_base_url = base;
    }
    config
}

/// Write the config as pretty JSON, replacing any previous file atomically.
pub fn write_config(path: &Path, config: &ClientConfig) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let mut text = serde_json::to_string_pretty(config).context("serialize config")?;
    text.push('\n');
    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("stage config in {}", parent.display()))?;
    staged
        .write_all(text.as_bytes())
        .context("write staged config")?;
    staged
        .persist(path)
        .map_err(|err| anyhow!("persist {}: {}", path.display(), err.error))?;
    Ok(())
}

pub fn validate_config(config: &ClientConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    let base = config.api_base_url.trim();
    if base.is_empty() {
        return Err(anyhow!("api_base_url must be non-empty"));
    }
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(anyhow!(
            "api_base_url must start with http:// or https:// (got {base:?})"
        ));
    }
    if config.timeout_seconds == 0 {
        return Err(anyhow!("timeout_seconds must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_config(&default_config()).expect("defaults validate");
    }

    #[test]
    fn write_then_load_keeps_fields() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nested").join("config.json");
        let config = ClientConfig {
            api_base_url: "https://book.example.test/v1".to_string(),
            timeout_seconds: 3,
            ..default_config()
        };
        write_config(&path, &config).expect("write config");
        assert_eq!(load_config(&path).expect("load config"), config);
        let text = fs::read_to_string(&path).expect("read back");
        assert!(text.contains("\"api_base_url\""));
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"schema_version": 1, "api_base_url": "http://127.0.0.1:9000"}"#,
        )
        .expect("parse");
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.user_agent.starts_with("bookflow/"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"schema_version": 1, "api_base_url": "http://x", "retries": 3}"#,
        )
        .expect("write");
        let err = load_config(&path).expect_err("unknown field");
        assert!(format!("{err:#}").contains("retries"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let wrong_version = ClientConfig {
            schema_version: 7,
            ..default_config()
        };
        assert!(validate_config(&wrong_version).is_err());
        let no_scheme = ClientConfig {
            api_base_url: "book.example.test".to_string(),
            ..default_config()
        };
        assert!(validate_config(&no_scheme).is_err());
        let zero_timeout = ClientConfig {
            timeout_seconds: 0,
            ..default_config()
        };
        assert!(validate_config(&zero_timeout).is_err());
    }

    #[test]
    fn base_override_ignores_blank_values() {
        let config = with_base_override(default_config(), Some("  ".to_string()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
        let config = with_base_override(
            default_config(),
            Some("https://staging.example.test".to_string()),
        );
        assert_eq!(config.api_base_url, "https://staging.example.test");
    }
}
