//! Engine configuration.
//!
//! Loaded from an optional TOML file. A missing or unreadable file never stops
//! the engine; it falls back to the defaults, which match the key layout a
//! compiz settings UI expects.

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for the synchronization engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// First key segment, e.g. `apps`.
    pub namespace: String,
    /// Second key segment, e.g. `compiz`.
    pub app_name: String,
    /// Name of the host's built-in plugin, stored under the `general` branch.
    pub core_plugin: String,
    /// Delay before a scheduled reload pass runs (ms).
    pub reload_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            namespace: "apps".to_string(),
            app_name: "compiz".to_string(),
            core_plugin: "core".to_string(),
            reload_delay_ms: 0,
        }
    }
}

impl SyncConfig {
    /// Parses and validates a TOML document. Absent fields take defaults.
    pub fn from_toml_str(contents: &str) -> SyncResult<Self> {
        let config: SyncConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, falling back to defaults when the
    /// file is missing, unreadable or invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No sync config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded sync config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Invalid sync config {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read sync config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Rejects names that would break the key layout.
    pub fn validate(&self) -> SyncResult<()> {
        for (field, value) in [
            ("namespace", &self.namespace),
            ("app_name", &self.app_name),
            ("core_plugin", &self.core_plugin),
        ] {
            if value.is_empty() {
                return Err(SyncError::Config(format!("{field} must not be empty")));
            }
            if value.contains('/') {
                return Err(SyncError::Config(format!(
                    "{field} must not contain '/': {value:?}"
                )));
            }
        }
        Ok(())
    }

    /// Store prefix covering every key of the application.
    pub fn watch_prefix(&self) -> String {
        format!("/{}/{}", self.namespace, self.app_name)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_compiz_layout() {
        let config = SyncConfig::default();
        assert_eq!(config.watch_prefix(), "/apps/compiz");
        assert_eq!(config.reload_delay(), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SyncConfig::from_toml_str("app_name = \"beryl\"\nreload_delay_ms = 25\n").unwrap();
        assert_eq!(config.app_name, "beryl");
        assert_eq!(config.namespace, "apps");
        assert_eq!(config.reload_delay(), Duration::from_millis(25));
    }

    #[test]
    fn rejects_slash_in_names() {
        let result = SyncConfig::from_toml_str("namespace = \"a/b\"");
        assert!(matches!(result, Err(SyncError::Config(_))));
    }

    #[test]
    fn rejects_empty_core_plugin() {
        let config = SyncConfig {
            core_plugin: String::new(),
            ..SyncConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            SyncConfig::from_toml_str("namespace = "),
            Err(SyncError::Toml(_))
        ));
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::load_from(dir.path().join("sync.toml"));
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.toml");
        std::fs::write(&path, "core_plugin = \"main\"\n").unwrap();

        let config = SyncConfig::load_from(&path);
        assert_eq!(config.core_plugin, "main");
        assert_eq!(config.app_name, "compiz");
    }

    #[test]
    fn load_from_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.toml");
        std::fs::write(&path, "app_name = \"\"\n").unwrap();

        assert_eq!(SyncConfig::load_from(&path), SyncConfig::default());
    }
}
