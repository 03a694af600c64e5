//! Configuration management for the datapack validator.
//!
//! Handles:
//! - Remote data service locations
//! - Workspace placement
//! - Logging setup

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_MCMETA_URL: &str = "https://raw.githubusercontent.com/misode/mcmeta";
const DEFAULT_VANILLA_MCDOC_URL: &str = "https://raw.githubusercontent.com/SpyglassMC/vanilla-mcdoc";

/// Combined configuration from all sources
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the version manifest and per-version summaries
    pub mcmeta_url: String,
    /// Base URL of the generated vanilla schema symbols
    pub vanilla_mcdoc_url: String,
    /// Timeout for each remote fetch
    pub request_timeout_secs: u64,
    /// Pack format written into the project descriptor when the request
    /// selects a version directly
    pub default_pack_format: u32,
    /// Name prefix for per-request workspace directories
    pub workspace_prefix: String,
    /// Parent directory for workspaces, the system temp dir when unset
    pub workspace_dir: Option<PathBuf>,
    /// Categories whose documents get their own symbol pre-registered before binding
    pub parent_symbol_categories: Vec<String>,
    /// Log filter (trace, debug, info, warn, error, or an env_logger filter directive)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mcmeta_url: DEFAULT_MCMETA_URL.to_string(),
            vanilla_mcdoc_url: DEFAULT_VANILLA_MCDOC_URL.to_string(),
            request_timeout_secs: 30,
            default_pack_format: 48,
            workspace_prefix: "datapack-mcp-".to_string(),
            workspace_dir: None,
            parent_symbol_categories: vec!["advancement".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, overlaid with the user config file and then the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// `<user config dir>/datapack-validator/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("datapack-validator").join("config.toml"))
    }

    /// Apply `DATAPACK_VALIDATOR_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATAPACK_VALIDATOR_MCMETA_URL") {
            self.mcmeta_url = url;
        }
        if let Some(url) = lookup("DATAPACK_VALIDATOR_MCDOC_URL") {
            self.vanilla_mcdoc_url = url;
        }
        if let Some(secs) = lookup("DATAPACK_VALIDATOR_TIMEOUT_SECS") {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid DATAPACK_VALIDATOR_TIMEOUT_SECS: {}", secs))?;
        }
        if let Some(dir) = lookup("DATAPACK_VALIDATOR_WORKSPACE_DIR") {
            self.workspace_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = lookup("DATAPACK_VALIDATOR_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Install the env_logger backend with the configured filter.
    /// Does nothing if a logger is already installed.
    pub fn init_logging(&self) {
        let result = env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .try_init();
        if result.is_err() {
            log::debug!("Logger already initialized, keeping existing one");
        }
    }
}
