//! Report Assembly Module
//! Runs every analysis of the dashboard on one filtered view.

use crate::data::{Category, FilteredView, Measure, TimeIndexed};
use crate::stats::{
    correlate, group_by, pairs, resample, BoxSummary, CategoryGroups, CorrelationMatrix,
    Granularity, PairwiseRelation, TimeSeries,
};
use rayon::prelude::*;
use std::time::Instant;

/// Closing notes shown under the charts.
pub const CONCLUSION: [&str; 3] = [
    "PM2.5 and PM10 concentrations decline from year to year, most clearly after 2014.",
    "Weather factors such as temperature (TEMP), air pressure (PRES) and wind speed (WSPM) \
     have a significant influence on pollution levels.",
    "PM2.5 concentrations are higher in the winter months, showing a clear seasonal pattern.",
];

/// Which columns feed which chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub trend_columns: Vec<Measure>,
    pub correlation_columns: Vec<Measure>,
    pub regression_target: Measure,
    pub regression_factors: Vec<Measure>,
    pub distribution_category: Category,
    pub distribution_value: Measure,
}

/// Everything the chart viewer draws for one year range.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub row_count: usize,
    pub year_span: Option<(i32, i32)>,
    pub yearly: TimeSeries,
    pub monthly: TimeSeries,
    pub correlation: CorrelationMatrix,
    pub relations: Vec<PairwiseRelation>,
    pub distribution: CategoryGroups,
    pub distribution_summaries: Vec<(String, BoxSummary)>,
}

impl DashboardReport {
    /// Compute all aggregates of `view`.
    ///
    /// An empty view yields an empty report; nothing here fails.
    pub fn build(view: FilteredView<'_>, config: &ReportConfig) -> Self {
        let started = Instant::now();

        let yearly = resample(view, Granularity::Year, &config.trend_columns);
        let monthly = resample(view, Granularity::Month, &config.trend_columns);
        let correlation = correlate(view, &config.correlation_columns);

        // Independent fits; collect keeps factor order.
        let relations: Vec<PairwiseRelation> = config
            .regression_factors
            .par_iter()
            .map(|&factor| pairs(view, factor, config.regression_target))
            .collect();

        let distribution = group_by(
            view,
            config.distribution_category,
            config.distribution_value,
        );
        let distribution_summaries = distribution.summaries();

        log::debug!(
            "Built report for {} rows in {:?}",
            view.len(),
            started.elapsed()
        );

        Self {
            row_count: view.len(),
            year_span: view.year_span(),
            yearly,
            monthly,
            correlation,
            relations,
            distribution,
            distribution_summaries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}
