//! Funding carry profitability after costs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Net daily return of a 1:1 funding carry after borrow, fees and slippage.
///
/// All rates are fractions per day (or per fill for fees and slippage).
pub fn net_daily_pct(
    funding_daily: Decimal,
    borrow_daily: Decimal,
    maker_fee: Decimal,
    taker_fee: Decimal,
    slippage: Decimal,
) -> Decimal {
    funding_daily - borrow_daily - maker_fee - taker_fee - slippage
}

/// Daily rate set derived from a session's cost configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarryCosts {
    pub funding_daily: Decimal,
    pub borrow_daily: Decimal,
    pub maker_fee: Decimal,
    pub taker_fee: Decimal,
    pub slippage: Decimal,
    /// Minimum net daily return to enter
    pub threshold: Decimal,
}

impl CarryCosts {
    pub fn quote(&self) -> CarryQuote {
        CarryQuote {
            funding_daily_pct: self.funding_daily,
            net_daily_pct: net_daily_pct(
                self.funding_daily,
                self.borrow_daily,
                self.maker_fee,
                self.taker_fee,
                self.slippage,
            ),
            threshold_pct: self.threshold,
        }
    }

    /// Carry earned per day per dollar of notional, before fees.
    pub fn daily_carry_rate(&self) -> Decimal {
        self.funding_daily - self.borrow_daily
    }

    /// Cost per dollar of notional to open.
    pub fn entry_cost_rate(&self) -> Decimal {
        self.maker_fee + self.slippage
    }

    /// Cost per dollar of notional to close.
    pub fn exit_cost_rate(&self) -> Decimal {
        self.taker_fee + self.slippage
    }
}

/// Current carry economics compared to the entry threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarryQuote {
    pub funding_daily_pct: Decimal,
    pub net_daily_pct: Decimal,
    pub threshold_pct: Decimal,
}

impl CarryQuote {
    pub fn clears_threshold(&self) -> bool {
        self.net_daily_pct >= self.threshold_pct
    }
}

impl std::fmt::Display for CarryQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Funding Daily:    {:.3}%", self.funding_daily_pct * dec!(100))?;
        writeln!(f, "Net Daily:        {:.3}%", self.net_daily_pct * dec!(100))?;
        writeln!(f, "Threshold:        {:.3}%", self.threshold_pct * dec!(100))?;
        write!(
            f,
            "Entry Allowed:    {}",
            if self.clears_threshold() { "Yes" } else { "No" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_is_funding_minus_costs() {
        let net = net_daily_pct(dec!(0.000274), dec!(0.0001), dec!(0.0002), dec!(0.0005), dec!(0.0001));
        assert_eq!(net, dec!(-0.000626));
    }

    #[test]
    fn test_net_accepts_negative_inputs() {
        let cases = [
            (dec!(-0.001), dec!(0.0002), dec!(-0.0001), dec!(0.0003), dec!(-0.00005)),
            (dec!(0.5), dec!(-0.2), dec!(0), dec!(0), dec!(0)),
            (dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)),
        ];
        for (f, b, m, t, s) in cases {
            assert_eq!(net_daily_pct(f, b, m, t, s), f - b - m - t - s);
        }
        assert_eq!(net_daily_pct(dec!(0.5), dec!(-0.2), dec!(0), dec!(0), dec!(0)), dec!(0.7));
    }

    #[test]
    fn test_quote_threshold() {
        let costs = CarryCosts {
            funding_daily: dec!(0.002),
            borrow_daily: dec!(0.0001),
            maker_fee: dec!(0.0002),
            taker_fee: dec!(0.0005),
            slippage: dec!(0.0001),
            threshold: dec!(0.0005),
        };
        let quote = costs.quote();
        assert_eq!(quote.net_daily_pct, dec!(0.0011));
        assert!(quote.clears_threshold());

        let strict = CarryCosts { threshold: dec!(0.0011), ..costs.clone() };
        assert!(strict.quote().clears_threshold());

        let stricter = CarryCosts { threshold: dec!(0.0012), ..costs };
        assert!(!stricter.quote().clears_threshold());
    }

    #[test]
    fn test_cost_rates() {
        let costs = crate::trading::CostConfig::default().costs();
        assert_eq!(costs.entry_cost_rate(), dec!(0.0003));
        assert_eq!(costs.exit_cost_rate(), dec!(0.0006));
        // Default funding is 10% a year, below the default threshold after costs
        assert!(!costs.quote().clears_threshold());
    }
}
