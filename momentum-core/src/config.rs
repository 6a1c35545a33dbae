//! Dashboard configuration.
//!
//! Stored as TOML. Every section has defaults, so an empty file (or no file)
//! is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::file::{DEFAULT_HISTORY_FILE, DEFAULT_PRICES_FILE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("parse config TOML: {0}")]
    Parse(String),

    #[error("serialize config: {0}")]
    Serialize(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where payloads come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// JSON files on disk.
    #[default]
    Static,
    /// Backend HTTP API.
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub mode: SourceMode,
    pub data_dir: PathBuf,
    pub history_file: String,
    pub prices_file: String,
    pub base_url: String,
    pub history_path: String,
    pub prices_path: Option<String>,
    pub stock_prices_path: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Static,
            data_dir: PathBuf::from("."),
            history_file: DEFAULT_HISTORY_FILE.into(),
            prices_file: DEFAULT_PRICES_FILE.into(),
            base_url: "http://127.0.0.1:8000".into(),
            history_path: "/api/data".into(),
            prices_path: None,
            stock_prices_path: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of weekday placeholder columns after the latest date.
    pub future_days: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { future_days: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub show_percent: bool,
    /// Ascending score thresholds for color levels.
    pub score_thresholds: Vec<f64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            show_percent: false,
            score_thresholds: vec![2.0, 5.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Look-back presets in days, bound to the number keys.
    pub periods: Vec<usize>,
    pub default_period: usize,
    /// Fraction of the figure height given to the K-line when any indicator
    /// panel is shown.
    pub kline_share: f64,
    pub show_volume: bool,
    pub macd: bool,
    pub rsi: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            periods: vec![30, 60, 90],
            default_period: 90,
            kline_share: 0.5,
            show_volume: false,
            macd: true,
            rsi: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub toast_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { toast_secs: 4 }
    }
}

/// The complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub grid: GridConfig,
    pub table: TableConfig,
    pub chart: ChartConfig,
    pub ui: UiConfig,
}

impl DashboardConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// `~/.config/momentum-board/config.toml` on Linux, the platform
    /// equivalent elsewhere.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("momentum-board").join("config.toml"))
    }

    /// Load from `path`, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chart = &self.chart;
        if chart.periods.is_empty() {
            return Err(ConfigError::Invalid("chart.periods must not be empty".into()));
        }
        if chart.periods.iter().any(|&p| p == 0) {
            return Err(ConfigError::Invalid("chart.periods must all be positive".into()));
        }
        if chart.default_period == 0 {
            return Err(ConfigError::Invalid("chart.default_period must be positive".into()));
        }
        if !(chart.kline_share > 0.0 && chart.kline_share < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "chart.kline_share must be in (0, 1), got {}",
                chart.kline_share
            )));
        }
        let thresholds = &self.table.score_thresholds;
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(ConfigError::Invalid("table.score_thresholds must be finite".into()));
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::Invalid(
                "table.score_thresholds must be strictly ascending".into(),
            ));
        }
        if self.source.mode == SourceMode::Http {
            if let Some(template) = &self.source.stock_prices_path {
                if !template.contains(crate::data::http::STOCK_ID_PLACEHOLDER) {
                    return Err(ConfigError::Invalid(
                        "source.stock_prices_path must contain {stock_id}".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.grid.future_days, 5);
        assert_eq!(config.table.score_thresholds, vec![2.0, 5.0]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            [source]
            mode = "http"
            base_url = "http://example.test"

            [table]
            score_thresholds = [5.0, 10.0, 20.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.source.mode, SourceMode::Http);
        assert_eq!(config.source.history_path, "/api/data");
        assert_eq!(config.table.score_thresholds.len(), 3);
        assert_eq!(config.chart.default_period, 90);
    }

    #[test]
    fn rejects_unsorted_thresholds() {
        let err = DashboardConfig::from_toml("[table]\nscore_thresholds = [5.0, 2.0]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_kline_share_out_of_range() {
        let err = DashboardConfig::from_toml("[chart]\nkline_share = 1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_stock_template_without_placeholder() {
        let err = DashboardConfig::from_toml(
            "[source]\nmode = \"http\"\nstock_prices_path = \"/api/prices\"",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let mut config = DashboardConfig::default();
        config.chart.periods = vec![20, 120];
        config.source.prices_path = Some("/api/prices".into());
        let text = config.to_toml().unwrap();
        assert_eq!(DashboardConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
