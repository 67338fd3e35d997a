//! Deterministic pseudo-random price walk.
//!
//! Prices are the cumulative sum of normally distributed steps offset by a
//! starting value. The random source is injectable so callers can pin it;
//! [`generate`] seeds a [`StdRng`] from an integer seed.

use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::debug;

/// Immutable sequence of synthetic prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    values: Vec<f64>,
}

impl PriceSeries {
    /// Wrap an existing price sequence, e.g. a recorded series to replay.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent price.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Successive price changes (`p[i] - p[i-1]`), one shorter than the series.
    pub fn steps(&self) -> Vec<f64> {
        self.values.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Descriptive statistics of the walk.
    pub fn summary(&self) -> SeriesSummary {
        let (min, max) = self
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            });

        let steps = self.steps();
        let (mean_step, step_std_dev) = if steps.len() >= 2 {
            (steps.iter().mean(), steps.iter().std_dev())
        } else {
            (steps.first().copied().unwrap_or(0.0), 0.0)
        };

        SeriesSummary {
            points: self.values.len(),
            first: self.values.first().copied().unwrap_or(0.0),
            last: self.last().unwrap_or(0.0),
            min: if self.values.is_empty() { 0.0 } else { min },
            max: if self.values.is_empty() { 0.0 } else { max },
            mean_step,
            step_std_dev,
        }
    }
}

/// Summary of a generated price series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub points: usize,
    pub first: f64,
    pub last: f64,
    pub min: f64,
    pub max: f64,
    pub mean_step: f64,
    pub step_std_dev: f64,
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Points:        {}", self.points)?;
        writeln!(f, "First:         {:.2}", self.first)?;
        writeln!(f, "Last:          {:.2}", self.last)?;
        writeln!(f, "Range:         {:.2} .. {:.2}", self.min, self.max)?;
        writeln!(f, "Mean Step:     {:.4}", self.mean_step)?;
        write!(f, "Step Std Dev:  {:.4}", self.step_std_dev)
    }
}

/// Generate `n` prices starting from `start` with N(0, `volatility`) steps,
/// seeded by `seed`.
///
/// Same `seed` and `n` always yield the same draws.
pub fn generate(n: usize, start: f64, volatility: f64, seed: u64) -> Result<PriceSeries> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_with(&mut rng, n, start, volatility)
}

/// Generate a walk drawing steps from the supplied random source.
///
/// The first price is `start + step[0]`.
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    start: f64,
    volatility: f64,
) -> Result<PriceSeries> {
    ensure!(n >= 1, "point count must be at least 1, got {}", n);
    ensure!(
        volatility.is_finite() && volatility >= 0.0,
        "step volatility must be a non-negative number, got {}",
        volatility
    );

    let normal = Normal::new(0.0, volatility)?;

    let mut price = start;
    let values: Vec<f64> = (0..n)
        .map(|_| {
            price += normal.sample(&mut *rng);
            price
        })
        .collect();

    debug!(points = n, start = start, volatility = volatility, "Generated price walk");

    Ok(PriceSeries { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_series() {
        let a = generate(800, 60000.0, 60.0, 42).unwrap();
        let b = generate(800, 60000.0, 60.0, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 800);
    }

    #[test]
    fn test_different_seed_differs() {
        let a = generate(100, 60000.0, 60.0, 1).unwrap();
        let b = generate(100, 60000.0, 60.0, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_first_price_is_start_plus_first_draw() {
        let mut rng = StdRng::seed_from_u64(7);
        let first_draw = Normal::new(0.0, 25.0).unwrap().sample(&mut rng);

        let series = generate(5, 100.0, 25.0, 7).unwrap();
        assert_eq!(series.values()[0], 100.0 + first_draw);
    }

    #[test]
    fn test_zero_volatility_is_flat() {
        let series = generate(10, 60000.0, 0.0, 42).unwrap();
        assert!(series.values().iter().all(|&p| p == 60000.0));

        let summary = series.summary();
        assert_eq!(summary.min, 60000.0);
        assert_eq!(summary.max, 60000.0);
        assert_eq!(summary.step_std_dev, 0.0);
    }

    #[test]
    fn test_injected_source_matches_seeded() {
        let mut rng = StdRng::seed_from_u64(99);
        let injected = generate_with(&mut rng, 50, 10.0, 1.0).unwrap();
        let seeded = generate(50, 10.0, 1.0, 99).unwrap();
        assert_eq!(injected, seeded);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(generate(0, 60000.0, 60.0, 42).is_err());
        assert!(generate(10, 60000.0, -1.0, 42).is_err());
        assert!(generate(10, 60000.0, f64::NAN, 42).is_err());
    }

    #[test]
    fn test_steps_and_summary() {
        let series = PriceSeries::from_values(vec![10.0, 12.0, 11.0, 15.0]);
        assert_eq!(series.steps(), vec![2.0, -1.0, 4.0]);

        let summary = series.summary();
        assert_eq!(summary.points, 4);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 15.0);
        assert!((summary.mean_step - 5.0 / 3.0).abs() < 1e-12);
    }
}
