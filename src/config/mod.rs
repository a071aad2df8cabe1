use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use toml;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding reference texts to browse
    pub library_dir: PathBuf,

    /// Where panel state (settings, selections, undo stacks) is persisted
    pub state_file: PathBuf,

    /// Terminal event polling interval in milliseconds
    pub tick_rate_ms: u64,

    /// Debounce interval for persisting panel state, in milliseconds
    pub persist_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Default to the current directory as the text library
            library_dir: PathBuf::from("."),

            // Panel state lands next to where magpie runs
            state_file: PathBuf::from("magpie_state.json"),

            tick_rate_ms: 100,

            // Coalesce state writes; the injection refresh is never delayed
            persist_interval_ms: 2000,
        }
    }
}

impl Config {
    /// Load configuration from the default locations
    ///
    /// Searches in the following order:
    /// 1. ./magpie.toml (current directory)
    /// 2. $XDG_CONFIG_HOME/magpie/config.toml (or equivalent on other platforms)
    /// 3. Falls back to default config if none found
    pub fn load() -> Result<Self> {
        // Try current directory first
        let local_config = Path::new("magpie.toml");
        if local_config.exists() {
            return Self::load_from_file(local_config)
                .context("Failed to load config from current directory");
        }

        // Try user config directory
        if let Some(project_dirs) = ProjectDirs::from("com", "magpie", "magpie") {
            let config_dir = project_dirs.config_dir();
            let user_config = config_dir.join("config.toml");

            if user_config.exists() {
                return Self::load_from_file(&user_config)
                    .context("Failed to load config from user config directory");
            }
        }

        // No config file found, return default
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML config from: {}", path.display()))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Serialize to TOML
        let toml_str = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        // Write to file
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;

        file.write_all(toml_str.as_bytes())
            .with_context(|| format!("Failed to write config to: {}", path.display()))?;

        Ok(())
    }

    /// Generate a default configuration file in the user's config directory
    pub fn create_default_config() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "magpie", "magpie")
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        let config_dir = project_dirs.config_dir();
        let config_path = config_dir.join("config.toml");

        let config = Config::default();
        config.save_to_file(&config_path)?;

        Ok(config_path)
    }

    /// Get the absolute path for the text library directory
    pub fn absolute_library_dir(&self) -> PathBuf {
        if self.library_dir.is_absolute() {
            self.library_dir.clone()
        } else {
            // Get the current directory and join with the relative path
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            current_dir.join(&self.library_dir)
        }
    }

    /// Get the absolute path for the state file
    pub fn absolute_state_file(&self) -> PathBuf {
        if self.state_file.is_absolute() {
            self.state_file.clone()
        } else {
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            current_dir.join(&self.state_file)
        }
    }
}
