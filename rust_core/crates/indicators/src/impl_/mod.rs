//! Indicator implementations
//!
//! Series primitives shared by the windowed calculators.

pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod rsi;
pub mod sma;
