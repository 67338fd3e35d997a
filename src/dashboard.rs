//! One-shot view of the market, sizing and carry for a session config.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::market::{self, PriceSeries, VolatilitySeries};
use crate::trading::{CarryQuote, PositionSizer, SessionConfig, SizingResult};

/// Everything the metric panel shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub price: f64,
    pub atr: f64,
    pub atr_period: usize,
    pub sizing: SizingResult,
    pub daily_loss_lock: Decimal,
    pub quote: CarryQuote,
    #[serde(skip)]
    pub prices: PriceSeries,
    #[serde(skip)]
    pub atr_series: VolatilitySeries,
}

impl Dashboard {
    /// Generate the series and derive every metric from its latest point.
    pub fn build(config: &SessionConfig) -> Result<Self> {
        let data = &config.data;
        let prices = market::generate(data.points, data.start_price, data.step_volatility, data.seed)?;
        let atr_series = market::estimate(&prices, config.risk.atr_period)?;

        let price = prices.last().context("Price series is empty")?;
        let atr = atr_series.last().context("Volatility series is empty")?;

        let sizing = PositionSizer::new(&config.risk).size_at(price, atr);
        let quote = config.costs.costs().quote();

        info!(
            price = price,
            atr = atr,
            size = sizing.size,
            net_daily = %quote.net_daily_pct,
            "Dashboard built"
        );

        Ok(Self {
            price,
            atr,
            atr_period: config.risk.atr_period,
            sizing,
            daily_loss_lock: config.risk.daily_loss_lock(),
            quote,
            prices,
            atr_series,
        })
    }
}

impl std::fmt::Display for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n{:=^50}", " BTC CARRY + RISK ")?;
        writeln!(f, "BTC Price:        {:.2}", self.price)?;
        writeln!(f, "ATR({}) (USD):    {:.2}", self.atr_period, self.atr)?;
        writeln!(f, "Size (BTC):       {:.4}", self.sizing.size)?;
        writeln!(f, "Daily Loss Lock:  ${:.2}", self.daily_loss_lock)?;
        writeln!(f)?;
        writeln!(f, "Risk Budget:      ${:.2}", self.sizing.risk_usd)?;
        writeln!(f, "Stop Distance:    ${:.2}", self.sizing.stop_usd)?;
        writeln!(
            f,
            "Position Value:   ${:.2}{}",
            self.sizing.notional_usd,
            if self.sizing.leverage_capped { " (leverage capped)" } else { "" }
        )?;
        writeln!(f, "\n{:-^50}", " Funding Carry (1:1 Hedge) ")?;
        writeln!(f, "{}", self.quote)?;
        writeln!(f, "{:=^50}", "")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_build_defaults() {
        let config = SessionConfig::default();
        let dashboard = Dashboard::build(&config).unwrap();

        assert_eq!(dashboard.prices.len(), 800);
        assert_eq!(dashboard.atr_series.len(), 800);
        assert_eq!(Some(dashboard.price), dashboard.prices.last());
        assert_eq!(Some(dashboard.atr), dashboard.atr_series.last());
        assert_eq!(dashboard.daily_loss_lock, dec!(200));
        assert!(dashboard.sizing.size > 0.0);
        assert!((dashboard.sizing.risk_usd - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = SessionConfig::default();
        let a = Dashboard::build(&config).unwrap();
        let b = Dashboard::build(&config).unwrap();
        assert_eq!(a.price, b.price);
        assert_eq!(a.sizing, b.sizing);
    }

    #[test]
    fn test_json_omits_series() {
        let dashboard = Dashboard::build(&SessionConfig::default()).unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();
        assert!(json.get("prices").is_none());
        assert!(json.get("sizing").is_some());
        assert!(json["quote"].get("net_daily_pct").is_some());
    }
}
