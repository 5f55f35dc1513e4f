//! Stockscope Indicators
//!
//! Technical indicator engine for daily stock analysis.
//!
//! # Layers
//! - Series primitives ([`impl_`]): SMA, EMA, Wilder RSI, Bollinger Bands,
//!   MACD and KDJ as aligned value vectors
//! - Window extractor ([`window`]): short/medium/long trailing slices
//! - Calculators ([`calculators`]): one per indicator family, summarizing
//!   latest values, per-window events and trends
//! - Registry ([`registry`]): builds the calculators from an
//!   [`AnalysisConfig`](stockscope_types::AnalysisConfig)
//!
//! # Indicator families
//! - MA: moving-average ladder with crossovers, alignment, support, turning
//!   points and convergence-zone breakouts
//! - MACD: 12/26/9 with signal and zero-line crossovers and price divergence
//! - KDJ: 9-bar stochastic with zone hits, K/D crossovers, price divergence
//!   and deviation strength
//! - RSI: Wilder RSI with zone hits and price divergence
//! - BOLL: 20-bar, 2-sigma bands with band hits and squeeze/expansion
//! - Candlestick: one- to five-bar pattern catalog

pub mod calculators;
pub mod error;
pub mod impl_;
pub mod registry;
pub mod report;
pub mod signals;
pub mod traits;
pub mod window;

// Re-export main types
pub use error::IndicatorError;
pub use registry::IndicatorRegistry;
pub use report::{
    Direction, IndicatorKind, IndicatorOutcome, IndicatorReport, IndicatorSummary, SignalEvent,
    SignalKind, WindowTrend,
};
pub use traits::{MultiOutputIndicator, WindowedIndicator};
pub use window::{Window, WindowSet};

// Re-export calculators and their reports
pub use calculators::{
    BollCalculator, CandlestickCalculator, KdjCalculator, MaSystem, MacdCalculator,
    RsiCalculator,
    boll::{BandPosition, BandwidthTrend, BollReport},
    candlestick::{CandlePattern, CandleStance, CandleWindowSummary, CandlestickReport},
    kdj::{KdjArrangement, KdjReport, KdjStrength},
    ma_system::{
        MaAlignment, MaBreakout, MaConvergence, MaDeviation, MaReport, MaTurn, MaTurnKind,
        MaValue,
    },
    macd::{HistogramPhase, MacdReport, MacdStrength},
    rsi::{RsiReport, RsiValue},
};

// Re-export indicator implementations
pub use impl_::{
    bollinger::{BollingerBands, BollingerResult, bollinger_values},
    ema::ema_values,
    kdj::{KDJ, KdjResult},
    macd::{MACD, MacdResult},
    rsi::rsi_values,
    sma::sma_values,
};
