//! Temporal Aggregator Module
//! Calendar-bucket means (yearly / monthly) over a filtered view.

use crate::data::{FilteredView, Measure};
use crate::stats::StatsCalculator;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Calendar bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Year,
    Month,
}

impl Granularity {
    fn key(self, date: NaiveDate) -> (i32, u32) {
        match self {
            Granularity::Year => (date.year(), 1),
            Granularity::Month => (date.year(), date.month()),
        }
    }

    /// Last day of the bucket, the label convention of the source charts.
    fn period_end(self, (year, month): (i32, u32)) -> Option<NaiveDate> {
        let (next_year, next_month) = match self {
            Granularity::Year => (year.checked_add(1)?, 1),
            Granularity::Month if month == 12 => (year.checked_add(1)?, 1),
            Granularity::Month => (year, month + 1),
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Year => f.write_str("yearly"),
            Granularity::Month => f.write_str("monthly"),
        }
    }
}

/// Means of one calendar bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub year: i32,
    /// Month number for monthly buckets.
    pub month: Option<u32>,
    pub label: NaiveDate,
    /// One entry per requested column; `None` when the column had no value here.
    pub means: Vec<Option<f64>>,
}

impl Bucket {
    /// Position on a continuous year axis (bucket start).
    pub fn axis_position(&self) -> f64 {
        let month_offset = self.month.map(|m| (m - 1) as f64 / 12.0).unwrap_or(0.0);
        self.year as f64 + month_offset
    }
}

/// Ordered buckets for a set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub granularity: Granularity,
    pub columns: Vec<Measure>,
    pub buckets: Vec<Bucket>,
}

impl TimeSeries {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// `(axis position, mean)` points of one column, skipping buckets without a mean.
    pub fn series(&self, measure: Measure) -> Vec<(f64, f64)> {
        let Some(idx) = self.columns.iter().position(|m| *m == measure) else {
            return Vec::new();
        };
        self.buckets
            .iter()
            .filter_map(|b| b.means[idx].map(|mean| (b.axis_position(), mean)))
            .collect()
    }
}

/// Bucket `view` by calendar year or month and average each column.
///
/// Missing values are skipped per column. Buckets where no column has a value
/// are left out rather than zero-filled.
pub fn resample(view: FilteredView<'_>, granularity: Granularity, columns: &[Measure]) -> TimeSeries {
    let mut buckets = Vec::new();
    let mut current: Option<((i32, u32), Vec<Vec<f64>>)> = None;

    for obs in view {
        let key = granularity.key(obs.timestamp.date());
        let same_bucket = matches!(&current, Some((k, _)) if *k == key);
        if !same_bucket {
            if let Some((k, values)) = current.take() {
                push_bucket(&mut buckets, granularity, k, values);
            }
            current = Some((key, vec![Vec::new(); columns.len()]));
        }
        if let Some((_, values)) = current.as_mut() {
            for (slot, measure) in values.iter_mut().zip(columns) {
                if let Some(v) = obs.get(*measure) {
                    slot.push(v);
                }
            }
        }
    }
    if let Some((k, values)) = current.take() {
        push_bucket(&mut buckets, granularity, k, values);
    }

    TimeSeries {
        granularity,
        columns: columns.to_vec(),
        buckets,
    }
}

fn push_bucket(
    buckets: &mut Vec<Bucket>,
    granularity: Granularity,
    key: (i32, u32),
    values: Vec<Vec<f64>>,
) {
    if values.iter().all(|v| v.is_empty()) {
        return;
    }
    let Some(label) = granularity.period_end(key) else {
        return;
    };
    buckets.push(Bucket {
        year: key.0,
        month: (granularity == Granularity::Month).then_some(key.1),
        label,
        means: values
            .iter()
            .map(|v| StatsCalculator::mean(v.iter().copied()))
            .collect(),
    });
}
