//! Statistics Calculator Module
//! Descriptive statistics shared by the aggregators: means, percentiles and box summaries.

/// Whisker reach in multiples of the interquartile range.
const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Five-number summary plus whiskers and outliers, as drawn by a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Summarise `values`; `None` when there is nothing to summarise.
    ///
    /// NaN entries are ignored.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = StatsCalculator::sorted_finite(values);
        let n = sorted.len();
        if n == 0 {
            return None;
        }

        let q1 = StatsCalculator::percentile(&sorted, 25.0);
        let median = StatsCalculator::percentile(&sorted, 50.0);
        let q3 = StatsCalculator::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Some(Self {
            count: n,
            mean: sorted.iter().sum::<f64>() / n as f64,
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[n - 1],
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Stateless numeric helpers.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean over present values; `None` when there are none.
    pub fn mean<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, n) = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    /// True when at least two values differ; compared directly, not through moments.
    pub fn has_spread<I>(values: I) -> bool
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter();
        match values.next() {
            Some(first) => values.any(|v| v != first),
            None => false,
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    fn sorted_finite(values: &[f64]) -> Vec<f64> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }
}
