//! Command-line configuration file.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use gridcalc_core::SheetConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`.
///
/// ```toml
/// log_level = "debug"
///
/// [sheet]
/// rows = 100
/// cols = 10
/// undo_limit = 500
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub sheet: SheetConfig,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load an explicit config file, or the user's one if it exists, or the
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match user_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(AppConfig::default()),
            },
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<AppConfig> {
        let config: AppConfig = toml::from_str(content)?;
        config.sheet.validate()?;
        Ok(config)
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
