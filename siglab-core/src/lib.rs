//! SigLab Core — streaming computation over time-ordered market bars.
//!
//! This crate contains the heart of the signal/backtest engine:
//! - Numeric value type with two backends (f64 and arbitrary precision) and
//!   NaN propagation
//! - Indicator evaluation contract: at most one state update per distinct
//!   timestamp, with stability and lag metadata
//! - Uncached operator combinators for arithmetic/comparison composition
//! - Windowed incremental algorithms (rolling extremum, variance,
//!   correlation/regression, running total) at O(1) amortized per step
//! - Trade/position/trading-record model with transaction and holding costs

pub mod domain;
pub mod indicators;
pub mod num;
