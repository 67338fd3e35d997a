//! Trading logic: configuration, position sizing, carry evaluation.

mod carry;
mod config;
mod position_sizer;

pub use carry::{net_daily_pct, CarryCosts, CarryQuote};
pub use config::{CostConfig, DataConfig, RiskConfig, SessionConfig};
pub use position_sizer::{size, PositionSizer, SizingResult};
