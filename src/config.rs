use crate::model::ConfigError;
use crate::normalizer::ALL_REGIONS;
use crate::winback::DEFAULT_EXPORT_FILE;
use serde::Deserialize;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::warn;

/// Usual operating ranges. Values outside are accepted with a warning.
pub const SUGGESTED_THRESHOLD_DAYS: RangeInclusive<i64> = 30..=180;
pub const SUGGESTED_LOYAL_ORDERS: RangeInclusive<usize> = 1..=10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local path or http(s) URL of the order table.
    pub dataset: String,
    pub churn_threshold_days: i64,
    pub min_orders_for_loyal: usize,
    /// One report segment per entry; `All` means the whole dataset.
    pub regions: Vec<String>,
    pub top_n: usize,
    /// Where to write the win-back CSV. `null` disables the export.
    pub export_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: "Nexus_Tech_dataset.csv".to_string(),
            churn_threshold_days: 90,
            min_orders_for_loyal: 3,
            regions: vec![ALL_REGIONS.to_string()],
            top_n: 20,
            export_path: Some(DEFAULT_EXPORT_FILE.to_string()),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.churn_threshold_days <= 0 {
            return Err(ConfigError::Invalid(format!(
                "churn_threshold_days must be positive, got {}",
                self.churn_threshold_days
            )));
        }
        if self.min_orders_for_loyal == 0 {
            return Err(ConfigError::Invalid("min_orders_for_loyal must be at least 1".into()));
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if self.regions.is_empty() {
            return Err(ConfigError::Invalid("regions must list at least one entry".into()));
        }
        if self.dataset.trim().is_empty() {
            return Err(ConfigError::Invalid("dataset must not be empty".into()));
        }

        if !SUGGESTED_THRESHOLD_DAYS.contains(&self.churn_threshold_days) {
            warn!(
                churn_threshold_days = self.churn_threshold_days,
                "Churn threshold outside the usual 30-180 day range"
            );
        }
        if !SUGGESTED_LOYAL_ORDERS.contains(&self.min_orders_for_loyal) {
            warn!(
                min_orders_for_loyal = self.min_orders_for_loyal,
                "Loyalty minimum outside the usual 1-10 order range"
            );
        }
        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}
