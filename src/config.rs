use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::publish::OverwriteMode;

/// File name searched for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "buildinfo.toml";

/// File name searched for in the user config directory
pub const USER_CONFIG_FILE: &str = ".buildinfo.toml";

/// Represents the complete file configuration for push-build-info.
///
/// Every value may be overridden on the command line.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub push: PushConfig,

    #[serde(default)]
    pub git: GitConfig,
}

/// Returns the default HTTP timeout in seconds.
fn default_timeout_secs() -> u64 {
    30
}

/// Returns the default tag naming pattern.
fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

/// Deployment service connection settings.
///
/// The API key is only read from the command line or `OCTOPUS_API_KEY`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub space: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            url: None,
            space: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// What gets pushed and how.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PushConfig {
    #[serde(default)]
    pub packages: Vec<String>,

    #[serde(default)]
    pub overwrite_mode: OverwriteMode,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        PushConfig {
            packages: Vec::new(),
            overwrite_mode: OverwriteMode::default(),
            tag_pattern: default_tag_pattern(),
        }
    }
}

/// History backend selection.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GitBackend {
    /// In-process libgit2
    #[default]
    Libgit2,
    /// The `git` executable on PATH
    System,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct GitConfig {
    #[serde(default)]
    pub backend: GitBackend,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `buildinfo.toml` in current directory
/// 3. `.buildinfo.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
