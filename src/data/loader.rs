//! CSV Data Loader Module
//! Reads the station CSV with Polars and converts it into typed observations.

use super::dataset::{Dataset, TimeIndexed};
use super::schema::{
    Measure, Observation, DATE_COLUMNS, REQUIRED_COLUMNS, STATION_COLUMN, WIND_DIRECTION_COLUMN,
};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use thiserror::Error;

/// File read by [`DataLoader::load`].
pub const DEFAULT_CSV_PATH: &str = "PRSA_Data_Wanliu_20130301-20170228.csv";

/// Marker the PRSA files use for missing readings.
const NULL_MARKER: &str = "NA";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("CSV file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Column '{column}' has type {dtype}, expected numbers")]
    Schema { column: String, dtype: String },
    #[error("Row {row}: invalid timestamp {year:?}-{month:?}-{day:?} {hour:?}h")]
    InvalidTimestamp {
        row: usize,
        year: Option<i64>,
        month: Option<i64>,
        day: Option<i64>,
        hour: Option<i64>,
    },
}

/// Loads the station file into a [`Dataset`].
pub struct DataLoader;

impl DataLoader {
    /// Load the fixed station file from the working directory.
    pub fn load() -> Result<Dataset, LoadError> {
        Self::load_csv(Path::new(DEFAULT_CSV_PATH))
    }

    /// Load a CSV file with the station schema.
    pub fn load_csv(file_path: &Path) -> Result<Dataset, LoadError> {
        if !file_path.is_file() {
            return Err(LoadError::NotFound(file_path.to_path_buf()));
        }

        // Infer over every row so a late fractional reading widens the column to Float64.
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(None)
            .with_null_values(Some(NullValues::AllColumnsSingle(NULL_MARKER.into())))
            .finish()?
            .collect()?;

        Self::check_required_columns(&df)?;
        let observations = Self::to_observations(&df)?;
        let dataset = Dataset::from_observations(observations);

        match dataset.year_span() {
            Some((first, last)) => log::info!(
                "Loaded {} rows from {} ({}..={})",
                dataset.len(),
                file_path.display(),
                first,
                last
            ),
            None => log::info!("Loaded empty dataset from {}", file_path.display()),
        }

        Ok(dataset)
    }

    /// Fail before reading any row when the header lacks a required column.
    fn check_required_columns(df: &DataFrame) -> Result<(), LoadError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !present.iter().any(|p| p == *name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoadError::MissingColumns(missing))
        }
    }

    fn to_observations(df: &DataFrame) -> Result<Vec<Observation>, LoadError> {
        let height = df.height();

        let mut date_parts: Vec<Vec<Option<i64>>> = Vec::with_capacity(DATE_COLUMNS.len());
        for name in DATE_COLUMNS {
            date_parts.push(Self::int_column(df, name)?);
        }

        let mut measures: Vec<(Measure, Vec<Option<f64>>)> = Vec::new();
        for measure in Measure::ALL {
            if let Some(values) = Self::float_column(df, measure.column_name())? {
                measures.push((measure, values));
            }
        }

        let wind = Self::text_column(df, WIND_DIRECTION_COLUMN)?;
        let station = Self::text_column(df, STATION_COLUMN)?;

        let mut observations = Vec::with_capacity(height);
        for row in 0..height {
            let (year, month, day, hour) = (
                date_parts[0][row],
                date_parts[1][row],
                date_parts[2][row],
                date_parts[3][row],
            );
            let timestamp = Self::timestamp(year, month, day, hour).ok_or_else(|| {
                LoadError::InvalidTimestamp {
                    row,
                    year,
                    month,
                    day,
                    hour,
                }
            })?;

            let mut obs = Observation::new(timestamp);
            for (measure, values) in &measures {
                obs.set(*measure, values[row]);
            }
            obs.wind_direction = wind.as_ref().and_then(|w| w[row].clone());
            obs.station = station.as_ref().and_then(|s| s[row].clone());
            observations.push(obs);
        }

        Ok(observations)
    }

    fn timestamp(
        year: Option<i64>,
        month: Option<i64>,
        day: Option<i64>,
        hour: Option<i64>,
    ) -> Option<chrono::NaiveDateTime> {
        let year = i32::try_from(year?).ok()?;
        let month = u32::try_from(month?).ok()?;
        let day = u32::try_from(day?).ok()?;
        let hour = u32::try_from(hour?).ok()?;
        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)
    }

    fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// A numeric column, or an all-missing column (which Polars infers as text).
    fn numeric_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, LoadError> {
        let column = df.column(name)?;
        if Self::is_numeric(column.dtype()) || column.null_count() == column.len() {
            Ok(column)
        } else {
            Err(LoadError::Schema {
                column: name.to_string(),
                dtype: column.dtype().to_string(),
            })
        }
    }

    fn int_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, LoadError> {
        let column = Self::numeric_column(df, name)?;
        let as_int = column.cast(&DataType::Int64)?;
        let values: Vec<Option<i64>> = as_int.i64()?.into_iter().collect();
        Ok(values)
    }

    /// `None` when the column is absent; only optional columns can be absent here.
    fn float_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>, LoadError> {
        if df.column(name).is_err() {
            return Ok(None);
        }
        let column = Self::numeric_column(df, name)?;
        let as_float = column.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = as_float.f64()?.into_iter().collect();
        Ok(Some(values))
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>, LoadError> {
        let Ok(column) = df.column(name) else {
            return Ok(None);
        };
        let as_text = column.cast(&DataType::String)?;
        let values = as_text
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
            .collect();
        Ok(Some(values))
    }
}

/// Process-wide cache of loaded datasets, keyed by path.
///
/// The source file never changes while the process runs, so entries are never
/// invalidated. Failed loads are not cached.
#[derive(Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by the whole process.
    pub fn shared() -> &'static DatasetCache {
        static CACHE: OnceLock<DatasetCache> = OnceLock::new();
        CACHE.get_or_init(DatasetCache::new)
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        // The lock is held across the load so concurrent first calls read the file once.
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(dataset) = entries.get(path) {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(DataLoader::load_csv(path)?);
        entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
