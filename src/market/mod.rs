//! Synthetic market data: price random walk and ATR-like volatility.

mod generator;
mod volatility;

pub use generator::{generate, generate_with, PriceSeries, SeriesSummary};
pub use volatility::{estimate, VolatilitySeries};
