//! Stockscope Types
//!
//! Core data structures shared by the stockscope crates.
//! This crate provides daily price bars, analysis windows tags,
//! configuration, and the core error type.

#![deny(clippy::all)]

pub mod bar;
pub mod config;
pub mod error;
pub mod window;

// Re-export main types for convenience
pub use bar::{PriceBar, PriceSeries};
pub use config::{
    AnalysisConfig, BollConfig, CandlestickConfig, KdjConfig, LoggingConfig, MacdConfig, MaConfig,
    RsiConfig, WindowConfig,
};
pub use error::CoreError;
pub use window::{Bias, ParseWindowTagError, WindowTag};
