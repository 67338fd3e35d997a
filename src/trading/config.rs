//! Session configuration: data, risk and cost parameters.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::CarryCosts;

/// Synthetic price series parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Seed for the random walk
    pub seed: u64,

    /// Number of generated prices
    pub points: usize,

    /// Price the walk starts from
    pub start_price: f64,

    /// Standard deviation of each price step
    pub step_volatility: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            points: 800,
            start_price: 60000.0,
            step_volatility: 60.0,
        }
    }
}

/// Risk budget and sizing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Account equity in USD, also the paper account's starting cash
    pub equity: Decimal,

    /// Fraction of equity risked per trade (0.003 = 0.3%)
    pub risk_pct: f64,

    /// Maximum gross leverage
    pub max_leverage: f64,

    /// Window of the ATR-like volatility estimate
    pub atr_period: usize,

    /// Stop distance as a multiple of ATR
    pub atr_multiple: f64,

    /// Fraction of equity that may be lost in one day before trading locks
    pub daily_loss_lock_pct: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            equity: dec!(10000),
            risk_pct: 0.003,                   // 0.3% per trade
            max_leverage: 2.0,
            atr_period: 14,
            atr_multiple: 1.5,
            daily_loss_lock_pct: dec!(0.02),   // 2% of equity
        }
    }
}

impl RiskConfig {
    /// Dollar loss that locks trading for the day.
    pub fn daily_loss_lock(&self) -> Decimal {
        self.equity * self.daily_loss_lock_pct
    }

    /// Largest hedge notional allowed by the leverage cap.
    pub fn max_notional(&self) -> Result<Decimal> {
        let leverage = Decimal::try_from(self.max_leverage)
            .with_context(|| format!("max_leverage {} is not a usable multiplier", self.max_leverage))?;
        Ok(self.equity * leverage)
    }

    /// Hedge notional offered when the user does not name one: half the
    /// equity, capped by leverage.
    pub fn default_notional(&self) -> Result<Decimal> {
        Ok((self.equity * dec!(0.5)).min(self.max_notional()?))
    }

    pub fn equity_f64(&self) -> f64 {
        self.equity.to_f64().unwrap_or(0.0)
    }
}

/// Trading cost and carry parameters. All rates are fractions, not percents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Maker fee paid on entry
    pub maker_fee: Decimal,

    /// Taker fee paid on exit
    pub taker_fee: Decimal,

    /// Slippage in basis points, charged on entry and exit
    pub slippage_bps: Decimal,

    /// Annualized funding rate received on the hedge
    pub funding_annual: Decimal,

    /// Daily borrow cost of the spot leg
    pub borrow_daily: Decimal,

    /// Minimum net daily return required to enter
    pub min_net_daily: Decimal,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            maker_fee: dec!(0.0002),
            taker_fee: dec!(0.0005),
            slippage_bps: dec!(1.0),
            funding_annual: dec!(0.10),       // 10% a year
            borrow_daily: dec!(0.0001),
            min_net_daily: dec!(0.0005),
        }
    }
}

impl CostConfig {
    /// Derive the daily rate set used by the carry math.
    pub fn costs(&self) -> CarryCosts {
        CarryCosts {
            funding_daily: self.funding_annual / dec!(365),
            borrow_daily: self.borrow_daily,
            maker_fee: self.maker_fee,
            taker_fee: self.taker_fee,
            slippage: self.slippage_bps / dec!(10000),
            threshold: self.min_net_daily,
        }
    }
}

/// Everything one session needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub data: DataConfig,
    pub risk: RiskConfig,
    pub costs: CostConfig,
}

impl SessionConfig {
    /// Load a JSON config file. Missing sections and fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Check every parameter against the ranges the simulator accepts.
    pub fn validate(&self) -> Result<()> {
        let d = &self.data;
        ensure!(d.seed <= 10_000, "seed must be in 0..=10000, got {}", d.seed);
        ensure!(
            (300..=2000).contains(&d.points),
            "points must be in 300..=2000, got {}",
            d.points
        );
        ensure!(
            d.start_price.is_finite() && d.start_price > 0.0,
            "start_price must be positive, got {}",
            d.start_price
        );
        ensure!(
            d.step_volatility.is_finite() && d.step_volatility >= 0.0,
            "step_volatility must be non-negative, got {}",
            d.step_volatility
        );

        let r = &self.risk;
        check_decimal("equity", r.equity, dec!(1000), dec!(1000000))?;
        check_f64("risk_pct", r.risk_pct, 0.0005, 0.02)?;
        check_f64("max_leverage", r.max_leverage, 1.0, 5.0)?;
        ensure!(
            (5..=50).contains(&r.atr_period),
            "atr_period must be in 5..=50, got {}",
            r.atr_period
        );
        check_f64("atr_multiple", r.atr_multiple, 0.5, 5.0)?;
        check_decimal("daily_loss_lock_pct", r.daily_loss_lock_pct, Decimal::ZERO, Decimal::ONE)?;

        let c = &self.costs;
        check_decimal("maker_fee", c.maker_fee, Decimal::ZERO, dec!(0.01))?;
        check_decimal("taker_fee", c.taker_fee, Decimal::ZERO, dec!(0.01))?;
        check_decimal("slippage_bps", c.slippage_bps, Decimal::ZERO, dec!(20))?;
        check_decimal("funding_annual", c.funding_annual, Decimal::ZERO, dec!(0.5))?;
        check_decimal("borrow_daily", c.borrow_daily, Decimal::ZERO, dec!(0.01))?;
        check_decimal("min_net_daily", c.min_net_daily, Decimal::ZERO, dec!(0.01))?;

        Ok(())
    }
}

fn check_f64(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= min && value <= max,
        "{} must be in {}..={}, got {}",
        name,
        min,
        max,
        value
    );
    Ok(())
}

fn check_decimal(name: &str, value: Decimal, min: Decimal, max: Decimal) -> Result<()> {
    ensure!(
        value >= min && value <= max,
        "{} must be in {}..={}, got {}",
        name,
        min,
        max,
        value
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.risk.daily_loss_lock(), dec!(200));
        assert_eq!(config.risk.max_notional().unwrap(), dec!(20000));
        assert_eq!(config.risk.default_notional().unwrap(), dec!(5000));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut config = SessionConfig::default();
        config.risk.risk_pct = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("risk_pct"));

        let mut config = SessionConfig::default();
        config.costs.slippage_bps = dec!(25);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("slippage_bps"));

        let mut config = SessionConfig::default();
        config.data.points = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_costs_derivation() {
        let costs = CostConfig::default().costs();
        assert_eq!(costs.slippage, dec!(0.0001));
        assert_eq!(costs.funding_daily, dec!(0.10) / dec!(365));
        assert_eq!(costs.threshold, dec!(0.0005));
    }

    #[test]
    fn test_default_notional_capped_by_leverage() {
        let risk = RiskConfig {
            max_leverage: 0.25,
            ..Default::default()
        };
        assert_eq!(risk.default_notional().unwrap(), dec!(2500));
    }

    #[test]
    fn test_unusable_leverage_is_an_error() {
        let risk = RiskConfig {
            max_leverage: f64::NAN,
            ..Default::default()
        };
        let err = risk.max_notional().unwrap_err();
        assert!(err.to_string().contains("max_leverage"));
        assert!(risk.default_notional().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "data": {{ "seed": 7 }}, "costs": {{ "maker_fee": "0.0003" }} }}"#
        )
        .unwrap();

        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.data.seed, 7);
        assert_eq!(config.data.points, 800);
        assert_eq!(config.costs.maker_fee, dec!(0.0003));
        assert_eq!(config.risk.atr_period, 14);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SessionConfig::load("/nonexistent/carrybot.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
