//! Configuration file handling.
//!
//! Loads modscan configuration from a TOML file under the platform config
//! directory:
//! - Linux: `~/.config/modscan/config.toml`
//! - macOS: `~/Library/Application Support/modscan/config.toml`
//! - Windows: `%APPDATA%\modscan\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! osv_api_base = "https://api.osv.dev/v1"
//! osv_list_base = "https://osv.dev/list"
//! nvd_api_base = "https://services.nvd.nist.gov/rest/json/cve/1.0"
//! default_branch = "master"
//! default_format = "text"
//! verbose = false
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration.
///
/// All endpoint bases are configurable so tests and air-gapped mirrors can
/// point the resolvers elsewhere. Missing keys fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the OSV vulnerability record API.
    pub osv_api_base: String,

    /// Base URL of the OSV listing page used for CVE -> GO-ID resolution.
    pub osv_list_base: String,

    /// Base URL of the NVD CVE lookup API.
    pub nvd_api_base: String,

    /// Branch to fetch raw go.mod / go.sum files from.
    ///
    /// Default: "master"
    pub default_branch: String,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "text", "json"
    pub default_format: String,

    /// Whether to enable verbose (debug-level) logging by default.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            osv_api_base: "https://api.osv.dev/v1".to_string(),
            osv_list_base: "https://osv.dev/list".to_string(),
            nvd_api_base: "https://services.nvd.nist.gov/rest/json/cve/1.0".to_string(),
            default_branch: "master".to_string(),
            default_format: "text".to_string(),
            verbose: false,
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub(crate) fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modscan")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}
