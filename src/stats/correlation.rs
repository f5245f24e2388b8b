//! Correlation Engine Module
//! Pairwise-complete Pearson correlation matrix.

use crate::data::{FilteredView, Measure, TimeIndexed};
use crate::stats::StatsCalculator;

/// Square, symmetric matrix of Pearson coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<Measure>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    fn empty() -> Self {
        Self {
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient at row `i`, column `j`; NaN when undefined, `None` out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let size = self.size();
        if i >= size || j >= size {
            return None;
        }
        self.values.get(i * size + j).copied()
    }

    /// Coefficient between two named columns.
    pub fn between(&self, a: Measure, b: Measure) -> Option<f64> {
        let i = self.columns.iter().position(|m| *m == a)?;
        let j = self.columns.iter().position(|m| *m == b)?;
        self.get(i, j)
    }

    /// Rows of the matrix, for table-style rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks(self.size().max(1))
    }
}

/// Pearson correlation between every pair of `columns` over `view`.
///
/// Each entry uses only rows where both columns are present. Entries are NaN
/// when a column has zero variance or fewer than two paired rows remain. An
/// empty view gives an empty matrix.
pub fn correlate(view: FilteredView<'_>, columns: &[Measure]) -> CorrelationMatrix {
    if view.is_empty() {
        return CorrelationMatrix::empty();
    }

    let n = columns.len();
    let mut values = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                diagonal(view, columns[i])
            } else {
                pearson(view, columns[i], columns[j])
            };
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }
}

/// 1.0 for a column with spread, NaN otherwise.
fn diagonal(view: FilteredView<'_>, measure: Measure) -> f64 {
    let r = pearson(view, measure, measure);
    if r.is_nan() {
        f64::NAN
    } else {
        1.0
    }
}

fn pearson(view: FilteredView<'_>, a: Measure, b: Measure) -> f64 {
    let pairs: Vec<(f64, f64)> = view
        .iter()
        .filter_map(|obs| Some((obs.get(a)?, obs.get(b)?)))
        .collect();
    pearson_pairs(&pairs)
}

/// Pearson coefficient of complete `(x, y)` pairs.
pub(crate) fn pearson_pairs(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < 2
        || !StatsCalculator::has_spread(pairs.iter().map(|p| p.0))
        || !StatsCalculator::has_spread(pairs.iter().map(|p| p.1))
    {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{filter, Dataset, Observation};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn dataset(rows: &[(Option<f64>, Option<f64>, Option<f64>)]) -> Dataset {
        let start = NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, &(pm, temp, rain))| {
                let mut obs = Observation::new(start + Duration::hours(i as i64));
                obs.set(Measure::Pm25, pm);
                obs.set(Measure::Temp, temp);
                obs.set(Measure::Rain, rain);
                obs
            })
            .collect();
        Dataset::from_observations(records)
    }

    const COLS: [Measure; 3] = [Measure::Pm25, Measure::Temp, Measure::Rain];

    fn at(m: &CorrelationMatrix, i: usize, j: usize) -> f64 {
        m.get(i, j).unwrap()
    }

    #[test]
    fn perfect_linear_relations() {
        let ds = dataset(&[
            (Some(1.0), Some(10.0), Some(3.0)),
            (Some(2.0), Some(8.0), Some(2.0)),
            (Some(3.0), Some(6.0), Some(1.0)),
        ]);
        let m = correlate(ds.view(), &COLS);

        assert_eq!(m.size(), 3);
        assert_eq!(at(&m, 0, 0), 1.0);
        assert!((at(&m, 0, 1) + 1.0).abs() < 1e-12);
        assert!((at(&m, 1, 2) - 1.0).abs() < 1e-12);
        assert_eq!(m.between(Measure::Temp, Measure::Pm25), m.get(0, 1));
        assert_eq!(m.between(Measure::Wspm, Measure::Pm25), None);
    }

    #[test]
    fn uses_pairwise_complete_rows() {
        let ds = dataset(&[
            (Some(1.0), Some(1.0), None),
            (Some(2.0), Some(2.0), Some(5.0)),
            (Some(3.0), None, Some(4.0)),
            (Some(4.0), Some(4.0), Some(3.0)),
        ]);
        let m = correlate(ds.view(), &COLS);

        // PM2.5/TEMP pairs: (1,1) (2,2) (4,4)
        assert!((at(&m, 0, 1) - 1.0).abs() < 1e-12);
        // PM2.5/RAIN pairs: (2,5) (3,4) (4,3)
        assert!((at(&m, 0, 2) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_and_too_few_pairs_are_nan() {
        let ds = dataset(&[
            (Some(1.0), Some(5.0), Some(0.0)),
            (Some(2.0), None, Some(0.0)),
            (Some(3.0), None, Some(0.0)),
        ]);
        let m = correlate(ds.view(), &COLS);

        assert!(at(&m, 2, 2).is_nan());
        assert!(at(&m, 0, 2).is_nan());
        assert!(at(&m, 1, 1).is_nan());
        assert!(at(&m, 0, 1).is_nan());
        assert_eq!(at(&m, 0, 0), 1.0);
    }

    #[test]
    fn constant_columns_without_exact_binary_form_are_nan() {
        for constant in [0.1, 1013.3] {
            let ds = dataset(&[
                (Some(10.0), Some(constant), Some(constant)),
                (Some(17.0), Some(constant), Some(constant)),
                (Some(24.0), Some(constant), Some(constant)),
            ]);
            let m = correlate(ds.view(), &COLS);

            assert_eq!(at(&m, 0, 0), 1.0);
            assert!(at(&m, 1, 1).is_nan(), "diagonal for {constant}");
            assert!(at(&m, 2, 2).is_nan(), "diagonal for {constant}");
            assert!(at(&m, 0, 2).is_nan(), "PM2.5 vs {constant}");
            assert!(at(&m, 1, 2).is_nan());
        }
    }

    #[test]
    fn out_of_range_index_is_none() {
        let ds = dataset(&[(Some(1.0), Some(2.0), Some(3.0)), (Some(2.0), Some(1.0), Some(5.0))]);
        let m = correlate(ds.view(), &COLS);
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.get(0, 3), None);

        let empty = correlate(filter(&ds, 1990, 1991), &COLS);
        assert_eq!(empty.get(0, 0), None);
    }

    #[test]
    fn empty_view_gives_empty_matrix() {
        let ds = dataset(&[(Some(1.0), Some(2.0), Some(3.0))]);
        let m = correlate(filter(&ds, 1990, 1991), &COLS);
        assert!(m.is_empty());
        assert_eq!(m.rows().count(), 0);
    }

    proptest! {
        #[test]
        fn matrix_is_symmetric_with_unit_diagonal(
            rows in prop::collection::vec(
                (
                    prop::option::of(-100.0f64..100.0),
                    prop::option::of(-30.0f64..40.0),
                    prop::option::of(0.0f64..50.0),
                ),
                0..40,
            )
        ) {
            let ds = dataset(&rows);
            let m = correlate(ds.view(), &COLS);
            for i in 0..m.size() {
                for j in 0..m.size() {
                    let (a, b) = (at(&m, i, j), at(&m, j, i));
                    prop_assert!(a == b || (a.is_nan() && b.is_nan()));
                    prop_assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
                }
                let own = at(&m, i, i);
                prop_assert!(own.is_nan() || own == 1.0);
            }
        }
    }
}
