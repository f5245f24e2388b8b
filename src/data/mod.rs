//! Data module - CSV loading, record schema and year-range views
//!
//! ```text
//!  PRSA_Data_*.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse CSV → Dataset (cached per path)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ dataset  │  filter(year_start, year_end) → FilteredView
//!   └──────────┘
//! ```

mod dataset;
mod loader;
mod schema;

pub use dataset::{filter, Dataset, FilteredView, TimeIndexed};
pub use loader::{DataLoader, DatasetCache, LoadError, DEFAULT_CSV_PATH};
pub use schema::{Category, Measure, Observation, REQUIRED_COLUMNS};
