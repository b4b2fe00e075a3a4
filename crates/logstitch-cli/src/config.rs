use crate::types::TiePolicyName;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Resolve the config file path based on priority:
/// 1. Explicit path (`--config` or `LOGSTITCH_CONFIG`, with tilde expansion)
/// 2. Platform config directory (`<config_dir>/logstitch/config.toml`)
/// 3. ~/.logstitch/config.toml (fallback for systems without one)
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("logstitch").join("config.toml"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".logstitch").join("config.toml"));
    }

    anyhow::bail!("Could not determine config path: no HOME or config directory found")
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ControllerSection {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub insecure: Option<bool>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExportSection {
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub tie_policy: Option<TiePolicyName>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerSection,
    #[serde(default)]
    pub export: ExportSection,
}

impl Config {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.controller.address.is_none());
        assert!(config.export.filters.is_empty());
    }

    #[test]
    fn test_load_full_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[controller]
address = "10.10.0.5"
user = "auditor"
tenant = "ops"
api_version = "22.1.3"
insecure = true
timeout_secs = 30

[export]
page_size = 500
filters = ["co(event_id,CONFIG)"]
tie_policy = "overlap"
"#,
        )?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(
            config.controller,
            ControllerSection {
                address: Some("10.10.0.5".to_string()),
                user: Some("auditor".to_string()),
                tenant: Some("ops".to_string()),
                api_version: Some("22.1.3".to_string()),
                insecure: Some(true),
                timeout_secs: Some(30),
            }
        );
        assert_eq!(
            config.export,
            ExportSection {
                page_size: Some(500),
                fields: None,
                filters: vec!["co(event_id,CONFIG)".to_string()],
                tie_policy: Some(TiePolicyName::Overlap),
            }
        );

        Ok(())
    }

    #[test]
    fn test_load_partial_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[export]\nfields = [\"report_timestamp\", \"event_id\"]\ntie_policy = \"stop\"\n",
        )?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.controller, ControllerSection::default());
        assert_eq!(
            config.export.fields,
            Some(vec!["report_timestamp".to_string(), "event_id".to_string()])
        );
        assert_eq!(config.export.tie_policy, Some(TiePolicyName::Stop));

        Ok(())
    }

    #[test]
    fn test_invalid_config_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[export]\npage_size = \"lots\"\n")?;

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config, Config::default());

        Ok(())
    }

    #[test]
    fn test_default_path_is_under_the_config_dir() -> Result<()> {
        let path = resolve_config_path(None)?;
        assert!(path.ends_with("logstitch/config.toml"));
        if let Some(config_dir) = dirs::config_dir() {
            assert!(path.starts_with(config_dir));
        }
        Ok(())
    }

    #[test]
    fn test_explicit_config_path_wins() -> Result<()> {
        let path = resolve_config_path(Some("/etc/logstitch.toml"))?;
        assert_eq!(path, PathBuf::from("/etc/logstitch.toml"));
        Ok(())
    }
}
