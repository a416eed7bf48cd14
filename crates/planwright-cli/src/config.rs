//! Configuration file management for planwright.
//!
//! Provides a TOML-based config file at `~/.config/planwright/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use planwright_core::PlanningConfig;

/// Env var naming an alternative config file.
pub const CONFIG_ENV: &str = "PLANWRIGHT_CONFIG";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub planning: PlanningConfig,
    pub output: OutputSection,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSection {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self { pretty: true }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the planwright config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/planwright` or
/// `~/.config/planwright`, also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("planwright");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("planwright")
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse a config file. Returns an error if it does not exist.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Serialize and write a config file, creating parent dirs as needed.
pub fn save_config(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub planning: PlanningConfig,
    pub pretty: bool,
    /// File the settings came from, `None` for built-in defaults.
    pub source: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    ///
    /// A path given explicitly (flag or `PLANWRIGHT_CONFIG`) must exist. The
    /// default config file is optional.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        let explicit = match cli_path {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        };

        let (file, source) = match explicit {
            Some(path) => (load_config(&path)?, Some(path)),
            None => {
                let path = config_path();
                if path.exists() {
                    (load_config(&path)?, Some(path))
                } else {
                    (ConfigFile::default(), None)
                }
            }
        };

        Ok(Self {
            planning: file.planning,
            pretty: file.output.pretty,
            source,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
