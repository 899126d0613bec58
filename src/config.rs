// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{DEFAULT_MODULE, Provider};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub startup: StartupConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StartupFile")]
pub struct StartupConfig {
    /// Provider the session starts on
    pub provider: Provider,

    /// Module shown before the user picks one
    pub module: String,

    /// Unrecognised provider name that was replaced by the default
    #[serde(skip)]
    pub rejected_provider: Option<String>,
}

/// `[startup]` as written on disk. The provider stays a string so a bad
/// name falls back on its own instead of failing the whole file.
#[derive(Deserialize)]
struct StartupFile {
    #[serde(default)]
    provider: Option<String>,

    #[serde(default = "default_module")]
    module: String,
}

impl From<StartupFile> for StartupConfig {
    fn from(file: StartupFile) -> Self {
        let rejected_provider = file
            .provider
            .as_deref()
            .filter(|raw| raw.parse::<Provider>().is_err())
            .map(str::to_string);
        let provider = file
            .provider
            .as_deref()
            .map(Provider::resolve_or_default)
            .unwrap_or_default();

        Self {
            provider,
            module: file.module,
            rejected_provider,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Per-dispatch render budget in milliseconds (0 = wait indefinitely)
    #[serde(default = "default_dispatch_timeout_ms")]
    pub dispatch_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a log file (the terminal belongs to the TUI)
    #[serde(default)]
    pub enabled: bool,

    /// One of trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Relative paths resolve against the current directory
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

/// Region list overrides. Empty lists keep the built-in catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub aws_regions: Vec<String>,

    #[serde(default)]
    pub azure_locations: Vec<String>,

    #[serde(default)]
    pub gcp_regions: Vec<String>,
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}

fn default_dispatch_timeout_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("cloudidp.log")
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            module: default_module(),
            rejected_provider: None,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_ms: default_dispatch_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("cloudidp")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("cloudidp")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();

            // Not being able to write the default file is not fatal
            if let Err(e) = config.save_to(&config_path) {
                eprintln!("Warning: Could not create default config file: {:#}", e);
                eprintln!(
                    "Using built-in defaults. Run 'cloudidp init-config' to create a config file."
                );
            }

            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }
}
