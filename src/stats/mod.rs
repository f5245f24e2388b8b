//! Statistics module - pure aggregations over a filtered view

mod calculator;
mod correlation;
mod grouping;
mod regression;
mod resample;

pub use calculator::{BoxSummary, StatsCalculator};
pub use correlation::{correlate, CorrelationMatrix};
pub use grouping::{group_by, CategoryGroup, CategoryGroups};
pub use regression::{pairs, BandPoint, LinearFit, PairwiseRelation, DEFAULT_CONFIDENCE_LEVEL};
pub use resample::{resample, Bucket, Granularity, TimeSeries};
