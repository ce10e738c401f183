use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::preprocess::DegeneratePolicy;

/// Name of the optional settings file in the resource directory.
pub const CONFIG_FILE: &str = "hts_predictor.json";

/// Application settings. Every field is optional in the file.
///
/// ```json
/// { "weights_file": "10kx_weights.bin", "degenerate_policy": "zero" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Weights file, relative to the resource directory or absolute.
    /// `.pth`/`.pt` is read as a PyTorch state dict, anything else as a burn record.
    pub weights_file: String,
    /// Window icon, relative to the resource directory or absolute.
    pub icon_file: String,
    /// Handling of constant-intensity micrographs.
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            weights_file: "10kx_weights.pth".to_string(),
            icon_file: "icon.png".to_string(),
            degenerate_policy: DegeneratePolicy::Reject,
        }
    }
}

impl AppConfig {
    /// Read settings from `path`, or return the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            log::debug!("No settings file at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "degenerate_policy": "zero" }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.degenerate_policy, DegeneratePolicy::Zero);
        assert_eq!(config.weights_file, "10kx_weights.pth");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "weights_file": 12 }"#).unwrap();

        assert!(matches!(AppConfig::load(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "weights": "x.bin" }"#).unwrap();

        assert!(matches!(AppConfig::load(&path), Err(Error::Config { .. })));
    }
}
