//! # Configuration Module
//!
//! This module provides the run configuration for the benchmark harness.

pub mod config;

pub use config::BenchConfig;
