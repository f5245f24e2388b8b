//! Time-indexed dataset and year-range views.

use super::schema::Observation;
use chrono::Datelike;

/// All observations of the station, ordered by timestamp.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Observation>,
}

impl Dataset {
    /// Build the dataset, establishing timestamp order.
    ///
    /// The sort is stable, so rows sharing a timestamp keep their file order.
    pub fn from_observations(mut records: Vec<Observation>) -> Self {
        records.sort_by_key(|obs| obs.timestamp);

        let duplicates = records
            .windows(2)
            .filter(|pair| pair[0].timestamp == pair[1].timestamp)
            .count();
        if duplicates > 0 {
            log::warn!("{duplicates} observations share a timestamp with the previous row");
        }

        Self { records }
    }

    /// Whole dataset as a view.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView {
            records: &self.records,
        }
    }
}

/// A contiguous, timestamp-ordered run of observations.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    records: &'a [Observation],
}

impl<'a> FilteredView<'a> {
    /// Narrow this view to the years `start..=end`.
    pub fn filter_years(&self, start: i32, end: i32) -> FilteredView<'a> {
        FilteredView {
            records: year_slice(self.records, start, end),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Observation> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for FilteredView<'a> {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Shared read access for the dataset and its views.
pub trait TimeIndexed {
    fn records(&self) -> &[Observation];

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// First and last calendar year present.
    fn year_span(&self) -> Option<(i32, i32)> {
        let records = self.records();
        let first = records.first()?.timestamp.year();
        let last = records.last()?.timestamp.year();
        Some((first, last))
    }
}

impl TimeIndexed for Dataset {
    fn records(&self) -> &[Observation] {
        &self.records
    }
}

impl TimeIndexed for FilteredView<'_> {
    fn records(&self) -> &[Observation] {
        self.records
    }
}

/// Select the observations of `dataset` from Jan 1 of `start` through Dec 31 of `end`.
///
/// Out-of-range bounds clamp to the data; a reversed or disjoint range gives an
/// empty view.
pub fn filter(dataset: &Dataset, start: i32, end: i32) -> FilteredView<'_> {
    dataset.view().filter_years(start, end)
}

fn year_slice(records: &[Observation], start: i32, end: i32) -> &[Observation] {
    if start > end {
        return &records[0..0];
    }
    let lo = records.partition_point(|obs| obs.timestamp.year() < start);
    let hi = records.partition_point(|obs| obs.timestamp.year() <= end);
    &records[lo..hi.max(lo)]
}
