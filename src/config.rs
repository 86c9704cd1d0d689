//! Configuration management
//!
//! Settings are layered in this order, later sources winning:
//! - built-in defaults
//! - an optional TOML file passed with `--config`
//! - environment variables prefixed with `IFACEPICKER_`
//!   (nested keys use `__`, e.g. `IFACEPICKER_LOGGING__LEVEL=debug`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PREFIX: &str = "IFACEPICKER";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Command that prints the interface listing
    pub listing: ListingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Program to run, looked up on `PATH`
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            program: "ip".to_string(),
            args: vec!["a".to_string()],
        }
    }
}

impl ListingConfig {
    /// The command line as a single string, for messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (pretty, compact, json)
    pub format: String,
    /// Log file path (None for stderr only)
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional file with environment variable overrides
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = config_path {
            // An explicitly requested file must exist
            settings = settings.add_source(config::File::from(path).required(true));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("listing.args"),
        );

        let config: AppConfig = settings
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.listing.program.trim().is_empty() {
            return Err(anyhow::anyhow!("listing.program must not be empty"));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow::anyhow!("Invalid logging level: {}", self.logging.level)),
        }

        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "compact" | "json" => {}
            _ => return Err(anyhow::anyhow!("Invalid logging format: {}", self.logging.format)),
        }

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Raise the logging level by `verbose` steps above the configured one
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        if verbose == 0 {
            return self;
        }
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
        let current = LEVELS
            .iter()
            .position(|l| l.eq_ignore_ascii_case(&self.logging.level))
            .unwrap_or(1);
        let raised = (current + verbose as usize).min(LEVELS.len() - 1);
        self.logging.level = LEVELS[raised].to_string();
        self
    }
}
