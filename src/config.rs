// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::converter::{DEFAULT_DAY_SUMMARY, DEFAULT_FALLBACK_SUMMARY, SummaryStyle};
use crate::export;
use crate::model::ICS_FILE_NAME;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_day_summary() -> String {
    DEFAULT_DAY_SUMMARY.to_string()
}
fn default_fallback_summary() -> String {
    DEFAULT_FALLBACK_SUMMARY.to_string()
}

fn default_output_file_name() -> String {
    ICS_FILE_NAME.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Title of each day's event; `{day}` becomes the day number.
    #[serde(default = "default_day_summary")]
    pub day_summary: String,
    /// Title of the single event used when the text has no day markers.
    #[serde(default = "default_fallback_summary")]
    pub fallback_summary: String,

    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,

    #[serde(default = "default_log_level")]
    pub log_level: String, // off, error, warn, info, debug, trace
}

impl Default for Config {
    fn default() -> Self {
        Self {
            day_summary: default_day_summary(),
            fallback_summary: default_fallback_summary(),
            output_file_name: default_output_file_name(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults. Broken files are
    /// still reported.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Whether an error from `load` means the config file does not exist.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        // Walk the error chain and look for an underlying IO NotFound.
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        export::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            export::atomic_write(&path, toml_str)?;
            Ok(())
        })
    }

    pub fn summaries(&self) -> SummaryStyle {
        SummaryStyle {
            day_template: self.day_summary.clone(),
            fallback: self.fallback_summary.clone(),
        }
    }
}
