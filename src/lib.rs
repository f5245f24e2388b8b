//! AirQ Dashboard - Beijing air-quality analysis
//!
//! Loads the hourly PRSA station file once, slices it by year range and derives
//! the data behind every chart of the report: yearly and monthly PM trends, a
//! weather correlation heatmap, PM2.5-vs-weather regressions and PM2.5 by wind
//! direction.

pub mod config;
pub mod data;
pub mod report;
pub mod stats;

pub use config::{ConfigError, DashboardConfig};
pub use data::{filter, DataLoader, Dataset, DatasetCache, FilteredView, LoadError};
pub use report::{DashboardReport, ReportConfig, CONCLUSION};
