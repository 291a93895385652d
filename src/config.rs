use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file or subdirectory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# kycdash configuration
# All settings are optional; command-line arguments take precedence.

[data]
# Dataset to open when no path is given on the command line.
# path = "/path/to/kyc_data.csv"

[display]
# strftime format for datetime cells in the table.
# date_format = "%Y-%m-%d %H:%M"

[export]
# Directory that `filtered_data.csv` is written into. Defaults to the
# current working directory.
# directory = "/path/to/exports"
"#;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Dataset opened when no path is given on the command line
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime format for datetime cells in the table
    pub date_format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that exported files are written into
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration for the given app name. A missing config file is
    /// not an error; defaults are returned.
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        Self::load_from(&manager)
    }

    /// Load configuration from a specific config directory
    pub fn load_from(manager: &ConfigManager) -> Result<Self> {
        let config_path = manager.config_path("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let parsed: AppConfig = toml::from_str(&contents)
            .map_err(|e| eyre!("Invalid config file {}: {}", config_path.display(), e))?;

        let mut config = Self::default();
        config.merge(parsed);
        Ok(config)
    }

    /// Merge another config into this one. Set fields in `other` win.
    pub fn merge(&mut self, other: AppConfig) {
        self.data.merge(other.data);
        self.display.merge(other.display);
        self.export.merge(other.export);
    }
}

impl DataConfig {
    pub fn merge(&mut self, other: Self) {
        if other.path.is_some() {
            self.path = other.path;
        }
    }
}

impl DisplayConfig {
    pub fn merge(&mut self, other: Self) {
        if other.date_format.is_some() {
            self.date_format = other.date_format;
        }
    }
}

impl ExportConfig {
    pub fn merge(&mut self, other: Self) {
        if other.directory.is_some() {
            self.directory = other.directory;
        }
    }
}
