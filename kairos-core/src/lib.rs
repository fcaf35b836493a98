//! Kairos core: market-context indicator engine.
//!
//! - Domain types (daily bars)
//! - Technical indicators (RSI, MACD, SMA, Bollinger Bands, Williams Alligator)
//! - Market data providers and the ordered fetch chain
//! - Optional headline enrichment
//! - The analysis engine and its plain-text report

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod news;

pub use config::AnalysisConfig;
pub use engine::{AnalysisSummary, EngineError, IndicatorEngine};
