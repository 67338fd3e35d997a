//! ATR-based position sizing with a leverage cap.

use serde::Serialize;
use tracing::debug;

use super::RiskConfig;

/// Output of a sizing calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizingResult {
    /// Quantity of the hedged asset
    pub size: f64,

    /// Dollar risk budget (equity * risk fraction)
    pub risk_usd: f64,

    /// Dollar distance to the stop (ATR * multiple)
    pub stop_usd: f64,

    /// Notional value of `size` at the sizing price
    pub notional_usd: f64,

    /// True when the leverage cap, not the risk budget, set the size
    pub leverage_capped: bool,
}

/// Size a position by the tighter of the risk budget and the leverage cap.
///
/// `risk_usd / stop_usd` is the size whose stop-out loses exactly the risk
/// budget; `equity * max_leverage / price` is the most the leverage cap
/// allows. A non-positive stop distance or price yields size 0 with the risk
/// and stop figures still reported.
pub fn size(
    equity: f64,
    risk_pct: f64,
    atr_usd: f64,
    atr_multiple: f64,
    price: f64,
    max_leverage: f64,
) -> SizingResult {
    let stop_usd = atr_usd * atr_multiple;
    let risk_usd = equity * risk_pct;

    if stop_usd <= 0.0 || price <= 0.0 {
        debug!(stop_usd = stop_usd, price = price, "Degenerate sizing inputs, size 0");
        return SizingResult {
            size: 0.0,
            risk_usd,
            stop_usd,
            notional_usd: 0.0,
            leverage_capped: false,
        };
    }

    let size_raw = risk_usd / stop_usd;
    let max_notional = equity * max_leverage;
    let size_cap = max_notional / price;

    let size = size_raw.min(size_cap);

    SizingResult {
        size,
        risk_usd,
        stop_usd,
        notional_usd: size * price,
        leverage_capped: size_cap < size_raw,
    }
}

/// Sizer bound to a session's risk parameters.
pub struct PositionSizer {
    equity: f64,
    risk_pct: f64,
    atr_multiple: f64,
    max_leverage: f64,
}

impl PositionSizer {
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            equity: config.equity_f64(),
            risk_pct: config.risk_pct,
            atr_multiple: config.atr_multiple,
            max_leverage: config.max_leverage,
        }
    }

    /// Size a position at `price` given the current ATR.
    pub fn size_at(&self, price: f64, atr_usd: f64) -> SizingResult {
        size(
            self.equity,
            self.risk_pct,
            atr_usd,
            self.atr_multiple,
            price,
            self.max_leverage,
        )
    }
}
