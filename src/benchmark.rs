//! Benchmark module - Derived metrics and their charts

pub mod analysis;
pub mod metrics;
