use crate::domain::{
    config::AppConfig,
    error::{ModemError, ModemResult},
};
use std::fs;
use std::path::{Path, PathBuf};

/// Locates, loads and writes the smsmodem configuration file
pub struct ConfigManager {
    global_config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for `~/.config/smsmodem/config.toml`
    pub fn new() -> ModemResult<Self> {
        Ok(Self {
            global_config_path: Self::get_global_config_path()?,
        })
    }

    /// Manager for an explicit configuration file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: path.into(),
        }
    }

    /// Load the configuration, or the defaults when the file does not exist
    pub fn load_config(&self) -> ModemResult<AppConfig> {
        if self.global_config_path.exists() {
            self.load_config_from_path(&self.global_config_path)
        } else {
            Ok(AppConfig::default())
        }
    }

    fn get_global_config_path() -> ModemResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| ModemError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home
            .join(".config")
            .join(env!("CARGO_PKG_NAME"))
            .join("config.toml"))
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> ModemResult<AppConfig> {
        let content = fs::read_to_string(path).map_err(|e| ModemError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| ModemError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path, creating parent directories
    pub fn save_config_to_path(&self, path: &Path, config: &AppConfig) -> ModemResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ModemError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| ModemError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| ModemError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Write a default configuration file, refusing to overwrite an existing one
    pub fn init_config(&self, path: Option<&Path>) -> ModemResult<PathBuf> {
        let path = path.unwrap_or(&self.global_config_path).to_path_buf();
        if path.exists() {
            return Err(ModemError::Config {
                message: format!("Configuration already exists at {}", path.display()),
            });
        }

        self.save_config_to_path(&path, &AppConfig::default())?;
        Ok(path)
    }

    pub fn config_path(&self) -> &Path {
        &self.global_config_path
    }
}
