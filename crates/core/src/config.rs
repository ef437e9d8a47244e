//! Application configuration.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Directory name under the user's config dir holding settings and data.
pub const APP_DIR: &str = "swapthreads";

/// User-tunable settings with working defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the two store tables and the manifest.
    pub data_root: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
        }
    }
}

impl AppConfig {
    /// Load settings from, in increasing precedence: built-in defaults,
    /// the optional config file, and `SWAPTHREADS_*` environment
    /// variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default(
                "data_root",
                defaults.data_root.to_string_lossy().to_string(),
            )?
            .add_source(File::from(config_file_path()).required(false))
            .add_source(Environment::with_prefix("SWAPTHREADS"))
            .build()
            .context("failed to load configuration")?;
        settings
            .try_deserialize()
            .context("failed to interpret configuration")
    }
}

/// Write a default config file on first run so there is something to edit.
pub fn ensure_default_config() -> Result<()> {
    let path = config_file_path();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let defaults = AppConfig::default();
    let rendered = format!(
        "# Where the item and member tables are stored.\ndata_root = {:?}\n",
        defaults.data_root
    );
    fs::write(&path, rendered).with_context(|| format!("failed to write {}", path.display()))
}

/// Path of the optional TOML config file.
pub fn config_file_path() -> PathBuf {
    config_base().join(APP_DIR).join("config.toml")
}

fn default_data_root() -> PathBuf {
    config_base().join(APP_DIR)
}

fn config_base() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
}
