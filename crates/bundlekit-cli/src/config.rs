use bundlekit_schema::BundleFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Placement grammar used when `--format` is not given.
    #[serde(default)]
    pub default_format: BundleFormat,
    /// Top-level bundle field holding the machines mapping.
    #[serde(default = "default_machines_key")]
    pub machines_key: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_format: BundleFormat::default(),
            machines_key: default_machines_key(),
        }
    }
}

fn default_machines_key() -> String {
    "machines".to_owned()
}

impl CliConfig {
    /// Load an explicit config file, or fall back to the default location.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, String> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        }
    }

    /// Load `~/.config/bundlekit/config.toml`; defaults when it does not exist.
    pub fn load_default() -> Result<Self, String> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("config error: failed to read {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| format!("config error: invalid config {}: {e}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            default_format = %config.default_format,
            machines_key = %config.machines_key,
            "loaded config"
        );
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/bundlekit/config.toml"))
}
