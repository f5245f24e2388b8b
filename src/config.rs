//! Dashboard configuration.
//!
//! Defaults reproduce the fixed report: the Wanliu station file, years 2013-2017,
//! PM2.5/PM10 trends, six-variable heatmap, five weather factors and PM2.5 by
//! wind direction. An `airq_dashboard.json` file in the working directory may
//! override any field.

use crate::data::{Category, Measure, DEFAULT_CSV_PATH};
use crate::report::ReportConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Optional override file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "airq_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    UnknownColumn(String),
    #[error("Year range {min}..={max} is empty")]
    InvalidYearRange { min: i32, max: i32 },
    #[error("Config list '{0}' must not be empty")]
    EmptyList(&'static str),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    pub year_min: i32,
    pub year_max: i32,
    pub trend_columns: Vec<String>,
    pub correlation_columns: Vec<String>,
    pub regression_target: String,
    pub regression_factors: Vec<String>,
    pub distribution_category: String,
    pub distribution_value: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let names = |cols: &[&str]| cols.iter().map(|c| c.to_string()).collect();
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            year_min: 2013,
            year_max: 2017,
            trend_columns: names(&["PM2.5", "PM10"]),
            correlation_columns: names(&["PM2.5", "TEMP", "PRES", "DEWP", "RAIN", "WSPM"]),
            regression_target: "PM2.5".to_string(),
            regression_factors: names(&["TEMP", "PRES", "DEWP", "RAIN", "WSPM"]),
            distribution_category: "wd".to_string(),
            distribution_value: "PM2.5".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read `path` when it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.year_min > self.year_max {
            return Err(ConfigError::InvalidYearRange {
                min: self.year_min,
                max: self.year_max,
            });
        }
        self.report_config().map(|_| ())
    }

    /// Typed column selection for report assembly.
    pub fn report_config(&self) -> Result<ReportConfig, ConfigError> {
        Ok(ReportConfig {
            trend_columns: Self::measures(&self.trend_columns, "trend_columns")?,
            correlation_columns: Self::measures(&self.correlation_columns, "correlation_columns")?,
            regression_target: Self::measure(&self.regression_target)?,
            regression_factors: Self::measures(&self.regression_factors, "regression_factors")?,
            distribution_category: self
                .distribution_category
                .parse::<Category>()
                .map_err(ConfigError::UnknownColumn)?,
            distribution_value: Self::measure(&self.distribution_value)?,
        })
    }

    fn measure(name: &str) -> Result<Measure, ConfigError> {
        name.parse::<Measure>().map_err(ConfigError::UnknownColumn)
    }

    fn measures(names: &[String], field: &'static str) -> Result<Vec<Measure>, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::EmptyList(field));
        }
        names.iter().map(|n| Self::measure(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_fixed_report() {
        let config = DashboardConfig::default();
        let report = config.report_config().unwrap();

        assert_eq!((config.year_min, config.year_max), (2013, 2017));
        assert_eq!(report.trend_columns, vec![Measure::Pm25, Measure::Pm10]);
        assert_eq!(report.correlation_columns.len(), 6);
        assert_eq!(
            report.regression_factors,
            vec![Measure::Temp, Measure::Pres, Measure::Dewp, Measure::Rain, Measure::Wspm]
        );
        assert_eq!(report.distribution_category, Category::WindDirection);
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let config = DashboardConfig::from_json(r#"{"year_min": 2014, "trend_columns": ["PM2.5", "O3"]}"#)
            .unwrap();
        assert_eq!(config.year_min, 2014);
        assert_eq!(config.year_max, 2017);
        assert_eq!(
            config.report_config().unwrap().trend_columns,
            vec![Measure::Pm25, Measure::O3]
        );
    }

    #[test]
    fn rejects_unknown_columns_and_bad_ranges() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{"regression_factors": ["HUMIDITY"]}"#),
            Err(ConfigError::UnknownColumn(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{"year_min": 2018, "year_max": 2013}"#),
            Err(ConfigError::InvalidYearRange { .. })
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{"correlation_columns": []}"#),
            Err(ConfigError::EmptyList("correlation_columns"))
        ));
        assert!(matches!(
            DashboardConfig::from_json(r#"{"colour": "red"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_means_defaults() {
        let config = DashboardConfig::load_or_default(Path::new("/nonexistent/airq.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
