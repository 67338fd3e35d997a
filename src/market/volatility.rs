//! ATR-like volatility: centered moving average of absolute price changes.

use anyhow::{ensure, Result};
use serde::Serialize;
use tracing::debug;

use super::PriceSeries;

/// Volatility values aligned 1:1 with the price series they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VolatilitySeries {
    values: Vec<f64>,
}

impl VolatilitySeries {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Volatility at the most recent price.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Estimate volatility over a centered window of `period` points.
///
/// The absolute first differences of the series (with the first difference
/// fixed at zero) are smoothed by a same-length centered convolution with a
/// `1/period` kernel. Output `i` averages the window starting at
/// `i - period/2`, and positions falling outside the series count as zero, so
/// edge values are always divided by the full period. A period longer than
/// the series follows the same rule.
pub fn estimate(series: &PriceSeries, period: usize) -> Result<VolatilitySeries> {
    ensure!(period >= 1, "volatility period must be at least 1, got {}", period);

    let prices = series.values();
    let n = prices.len();

    let diffs: Vec<f64> = std::iter::once(0.0)
        .chain(prices.windows(2).map(|w| (w[1] - w[0]).abs()))
        .take(n)
        .collect();

    let half = period / 2;
    let kernel = 1.0 / period as f64;

    let values = (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = i.saturating_add(period - half).min(n);
            diffs[lo..hi].iter().map(|d| d * kernel).sum::<f64>()
        })
        .collect();

    debug!(points = n, period = period, "Estimated volatility");

    Ok(VolatilitySeries { values })
}
