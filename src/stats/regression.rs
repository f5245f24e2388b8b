//! Pairwise Relationship Module
//! Scatter pairs with an ordinary-least-squares trend line for display.

use crate::data::{FilteredView, Measure};
use crate::stats::correlation::pearson_pairs;
use crate::stats::StatsCalculator;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Confidence level of the band drawn around the trend line.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation of the fitted pairs.
    pub r: f64,
    pub r_squared: f64,
    pub n: usize,
    /// Two-sided p-value of the slope; NaN with fewer than three points.
    pub p_value: f64,
    mean_x: f64,
    sxx: f64,
    /// Residual standard error; NaN with fewer than three points.
    residual_std: f64,
}

impl LinearFit {
    /// Fit complete `(x, y)` pairs; `None` for fewer than two pairs or constant x.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let n = points.len();
        if n < 2 || !StatsCalculator::has_spread(points.iter().map(|p| p.0)) {
            return None;
        }

        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n as f64;
        let (mut sxx, mut sxy) = (0.0, 0.0);
        for &(x, y) in points {
            sxx += (x - mean_x).powi(2);
            sxy += (x - mean_x) * (y - mean_y);
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let r = pearson_pairs(points);

        let residual_std = if n > 2 {
            let sse: f64 = points
                .iter()
                .map(|&(x, y)| (y - (slope * x + intercept)).powi(2))
                .sum();
            (sse / (n - 2) as f64).sqrt()
        } else {
            f64::NAN
        };

        let mut fit = Self {
            slope,
            intercept,
            r,
            r_squared: r * r,
            n,
            p_value: f64::NAN,
            mean_x,
            sxx,
            residual_std,
        };
        fit.p_value = fit.slope_p_value();
        Some(fit)
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    fn t_distribution(&self) -> Option<StudentsT> {
        if self.n < 3 {
            return None;
        }
        StudentsT::new(0.0, 1.0, (self.n - 2) as f64).ok()
    }

    fn slope_p_value(&self) -> f64 {
        let Some(dist) = self.t_distribution() else {
            return f64::NAN;
        };
        let se = self.residual_std / self.sxx.sqrt();
        if se == 0.0 {
            return 0.0;
        }
        let t = self.slope / se;
        2.0 * (1.0 - dist.cdf(t.abs()))
    }

    /// Confidence interval of the mean prediction at each `x`.
    ///
    /// Empty with fewer than three fitted points.
    pub fn confidence_band(&self, xs: &[f64], level: f64) -> Vec<BandPoint> {
        let Some(dist) = self.t_distribution() else {
            return Vec::new();
        };
        let t_crit = dist.inverse_cdf(1.0 - (1.0 - level) / 2.0);

        xs.iter()
            .map(|&x| {
                let fitted = self.predict(x);
                let se = self.residual_std
                    * (1.0 / self.n as f64 + (x - self.mean_x).powi(2) / self.sxx).sqrt();
                BandPoint {
                    x,
                    fitted,
                    lower: fitted - t_crit * se,
                    upper: fitted + t_crit * se,
                }
            })
            .collect()
    }
}

/// One point of a trend line with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub x: f64,
    pub fitted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Scatter data for `y` against `x` plus its trend.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseRelation {
    pub x: Measure,
    pub y: Measure,
    pub points: Vec<(f64, f64)>,
    pub fit: Option<LinearFit>,
}

impl PairwiseRelation {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Range of x covered by the scatter.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let mut xs = self.points.iter().map(|p| p.0);
        let first = xs.next()?;
        Some(xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
    }

    /// Trend line sampled at `steps` evenly spaced x values across the scatter.
    pub fn trend_band(&self, steps: usize, level: f64) -> Vec<BandPoint> {
        let (Some(fit), Some((lo, hi))) = (&self.fit, self.x_range()) else {
            return Vec::new();
        };
        let steps = steps.max(2);
        let xs: Vec<f64> = (0..steps)
            .map(|i| lo + (hi - lo) * i as f64 / (steps - 1) as f64)
            .collect();
        fit.confidence_band(&xs, level)
    }
}

/// Collect `(x, y)` pairs where both values are present and fit a line through them.
pub fn pairs(view: FilteredView<'_>, x: Measure, y: Measure) -> PairwiseRelation {
    let points: Vec<(f64, f64)> = view
        .iter()
        .filter_map(|obs| Some((obs.get(x)?, obs.get(y)?)))
        .collect();
    let fit = LinearFit::fit(&points);

    PairwiseRelation { x, y, points, fit }
}
