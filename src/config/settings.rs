//! User settings for Tally
//!
//! Display preferences, the name of the fallback category, and the default
//! log filter. Every field has a serde default so older config files keep
//! loading as fields are added.

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;
use crate::models::MoneyFormat;
use crate::services::aggregator::Granularity;
use crate::services::classifier::DEFAULT_OTHER_CATEGORY;

/// User settings for Tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Name of the bucket unmatched category labels are reported under
    #[serde(default = "default_other_category")]
    pub other_category: String,

    /// Bucket size used by trend and cash-flow reports
    #[serde(default)]
    pub default_granularity: Granularity,

    /// `tracing` filter directive used when `TALLY_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_other_category() -> String {
    DEFAULT_OTHER_CATEGORY.to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
            date_format: default_date_format(),
            other_category: default_other_category(),
            default_granularity: Granularity::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if no file exists
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TallyError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TallyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TallyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Formatting rules for money amounts
    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat {
            symbol: self.currency_symbol.clone(),
            thousands_separator: self.thousands_separator.clone(),
            decimal_separator: self.decimal_separator.clone(),
        }
    }

    /// Set a field by its config key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), TallyError> {
        match key {
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "thousands_separator" => self.thousands_separator = value.to_string(),
            "decimal_separator" => {
                if value.is_empty() {
                    return Err(TallyError::Config("Decimal separator cannot be empty".into()));
                }
                self.decimal_separator = value.to_string();
            }
            "date_format" => self.date_format = value.to_string(),
            "other_category" => {
                if value.trim().is_empty() {
                    return Err(TallyError::Config("Other category name cannot be empty".into()));
                }
                self.other_category = value.trim().to_string();
            }
            "default_granularity" => self.default_granularity = Granularity::parse(value)?,
            "log_filter" => self.log_filter = value.to_string(),
            other => {
                return Err(TallyError::Config(format!("Unknown setting: {}", other)));
            }
        }
        Ok(())
    }
}
