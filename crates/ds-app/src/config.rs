//! Application configuration.
//!
//! Read from `--config <path>` or `<config_dir>/depot-safety/config.json`.

use anyhow::{Context, Result};
use ds_core::report::{DevicePreference, Horizon, PredictionMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Rule tables document; built-in tables when unset.
    #[serde(default)]
    pub tables_path: Option<PathBuf>,

    /// Directory that relative export paths resolve against.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    #[serde(default)]
    pub device: DevicePreference,

    #[serde(default)]
    pub default_mode: PredictionMode,

    #[serde(default)]
    pub default_horizon: Horizon,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tables_path: None,
            export_dir: default_export_dir(),
            device: DevicePreference::default(),
            default_mode: PredictionMode::default(),
            default_horizon: Horizon::default(),
        }
    }
}

impl AppConfig {
    /// `<config_dir>/depot-safety/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("depot-safety").join("config.json"))
    }

    /// Load from the default location, or defaults when no file exists there.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Resolve an explicit `--config`, falling back to the default lookup.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load().or_else(|e| {
                tracing::warn!("ignoring unreadable default config: {e:#}");
                Ok(Self::default())
            }),
        }
    }

    /// Relative export paths land under `export_dir`.
    pub fn export_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.export_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_mode, PredictionMode::Integrated);
        assert_eq!(config.default_horizon, Horizon::Day);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "default_mode": "dl", "device": "gpu", "export_dir": "/tmp/reports" }"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_mode, PredictionMode::Dl);
        assert_eq!(config.device, DevicePreference::Gpu);
        assert_eq!(config.default_horizon, Horizon::Day);
        assert_eq!(
            config.export_path(Path::new("r.xlsx")),
            PathBuf::from("/tmp/reports/r.xlsx")
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(AppConfig::resolve(Some(&missing)).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ default_mode: ").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn absolute_export_path_is_kept() {
        let config = AppConfig::default();
        let abs = std::env::temp_dir().join("x.json");
        assert_eq!(config.export_path(&abs), abs);
    }
}
