use crate::error::{ConfigError, ConfigResult};
use crate::settings::{EncodingSettings, LoadSettings, SaveSettings};
use mdio_fs::{DetectionConfig, Encoding, LoadOptions, LoaderConfig, SaverConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for mdio
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub load: LoadSettings,
    #[serde(default)]
    pub encoding: EncodingSettings,
    #[serde(default)]
    pub save: SaveSettings,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get configuration file search paths, most specific last
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("mdio").join("config.toml"));
        }
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join("mdio.toml"));
        }

        paths
    }

    /// Load configuration with automatic path discovery
    pub fn load() -> ConfigResult<Self> {
        Self::load_with_paths(&Self::config_paths())
    }

    /// Load the first existing file among `paths`, or the defaults.
    pub fn load_with_paths(paths: &[PathBuf]) -> ConfigResult<Self> {
        for path in paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if Encoding::from_name(&self.encoding.default_encoding).is_none() {
            return Err(ConfigError::Validation(format!(
                "\"{}\" encoding is not supported",
                self.encoding.default_encoding
            )));
        }
        if self.encoding.sample_size == 0 {
            return Err(ConfigError::Validation(
                "sample_size must be greater than 0".to_string(),
            ));
        }
        if !self.save.default_extension.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "default_extension \"{}\" must start with '.'",
                self.save.default_extension
            )));
        }

        Ok(())
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            options: LoadOptions {
                preferred_eol: self.load.preferred_eol,
                auto_guess_encoding: self.load.auto_guess_encoding,
                trim_trailing_newline: self.load.trim_trailing_newline.to_hint(),
            },
            detection: DetectionConfig {
                sample_size: self.encoding.sample_size,
                ..DetectionConfig::default()
            },
            default_encoding: self.encoding.default_encoding.clone(),
        }
    }

    pub fn saver_config(&self) -> SaverConfig {
        SaverConfig {
            default_extension: self.save.default_extension.clone(),
            atomic_writes: self.save.atomic_writes,
            preserve_permissions: self.save.preserve_permissions,
        }
    }
}
