//! BTC Funding Carry Paper Trader
//!
//! Synthetic price walk, ATR-like volatility, risk-budget position sizing,
//! funding carry evaluation and a paper account that opens, accrues and
//! closes one carry position.

pub mod dashboard;
pub mod market;
pub mod paper;
pub mod session;
pub mod trading;
