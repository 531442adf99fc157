//! Application settings loading from config.toml
//!
//! Every field has a default, so an empty or missing section is valid. The
//! database URL can additionally be overridden through `DATABASE_URL`, see
//! [`crate::config::database::get_database_url`].

use crate::core::analytics::DEFAULT_TOP_EXPENSES;
use crate::core::rollover::DedupStrategy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Database connection settings
    pub database: DatabaseSettings,
    /// Store behaviour
    pub store: StoreSettings,
    /// Analytics tuning
    pub analytics: AnalyticsSettings,
    /// Text output
    pub display: DisplaySettings,
}

/// `[database]` section
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL, e.g. `sqlite://data/household_budget.sqlite?mode=rwc`
    pub url: Option<String>,
}

/// Whether the budget belongs to one person or is shared by a household.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountMode {
    /// Single user, recurring expenses only count towards totals
    #[default]
    Personal,
    /// Shared account, new recurring expenses also post a dated expense
    Shared,
}

/// `[store]` section
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    /// Personal or shared account behaviour
    pub mode: AccountMode,
    /// How refresh recognises already materialized recurring incomes
    pub income_dedup: DedupStrategy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            mode: AccountMode::Personal,
            income_dedup: DedupStrategy::TemplateId,
        }
    }
}

/// `[analytics]` section
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Number of expenses listed in the top expenses view
    pub top_expenses_limit: usize,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            top_expenses_limit: DEFAULT_TOP_EXPENSES,
        }
    }
}

/// `[display]` section
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Symbol printed in front of amounts
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses settings from TOML text
pub fn parse_config(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from ./config.toml, falling back to defaults when the file
/// does not exist.
pub fn load_default_config() -> Result<Settings> {
    let path = Path::new("config.toml");
    if !path.exists() {
        tracing::info!("No config.toml found, using default settings");
        return Ok(Settings::default());
    }
    load_config(path)
}
