/*!
 * Plugin Configuration
 *
 * Sources, later ones overriding earlier ones:
 * - defaults (sentinel filter on /tmp/passwd, proc events, no managed list)
 * - JSON file named by SCVIRT_CONFIG
 * - SCVIRT_SENTINEL / SCVIRT_PREFIX / SCVIRT_MANAGED / SCVIRT_CTL
 *
 * Names are kept as strings here and validated when the plugin is built.
 */

use crate::core::errors::PluginError;
use crate::core::types::PluginResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sentinel path claimed by the default filter
pub const DEFAULT_SENTINEL: &str = "/tmp/passwd";

/// Claim policy selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum FilterConfig {
    /// Claim exactly one path
    Sentinel { path: PathBuf },
    /// Claim every path under a directory
    Prefix { prefix: PathBuf },
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::Sentinel {
            path: PathBuf::from(DEFAULT_SENTINEL),
        }
    }
}

/// Load-time plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub filter: FilterConfig,
    /// Syscall names the host may query about; `None` means every bound one
    pub managed_syscalls: Option<Vec<String>>,
    /// Lifecycle classes to observe (`proc`, `module`, `mount`)
    pub ctl_classes: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            managed_syscalls: None,
            ctl_classes: vec!["proc".to_string()],
        }
    }
}

impl PluginConfig {
    pub fn from_json_str(json: &str) -> PluginResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PluginResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| PluginError::config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Defaults, then SCVIRT_CONFIG, then the individual SCVIRT_* overrides
    pub fn from_env() -> PluginResult<Self> {
        let mut config = match std::env::var("SCVIRT_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(prefix) = std::env::var("SCVIRT_PREFIX") {
            config.filter = FilterConfig::Prefix {
                prefix: PathBuf::from(prefix),
            };
        }
        if let Ok(path) = std::env::var("SCVIRT_SENTINEL") {
            config.filter = FilterConfig::Sentinel {
                path: PathBuf::from(path),
            };
        }
        if let Ok(list) = std::env::var("SCVIRT_MANAGED") {
            config.managed_syscalls = Some(split_list(&list));
        }
        if let Ok(list) = std::env::var("SCVIRT_CTL") {
            config.ctl_classes = split_list(&list);
        }

        Ok(config)
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
