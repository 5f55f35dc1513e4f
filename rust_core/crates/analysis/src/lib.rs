//! Stockscope Analysis
//!
//! Aggregates the indicator calculators over one daily series and wraps
//! the outcomes into the report handed to downstream consumers. Also hosts
//! the JSON runner and the `stockscope` command-line entry point.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]

pub mod aggregator;
pub mod error;
pub mod runner;
pub mod snapshot;

pub use aggregator::{Aggregator, aggregate};
pub use error::AnalysisError;
pub use runner::{AnalysisRequest, analyze_request, analyze_symbol, run_analysis_from_json};
pub use snapshot::{AnalysisReport, MarketSnapshot};
