//! # Benchmark Driver
//!
//! Times the standard scenarios and renders the results.
//!
//! - `suite`: [`Suite`], the [`Scenario`] trait and timing statistics
//! - `scenarios`: image and deflate scenario sets, plus the single-image [`cycle`]
//! - `report`: table and JSON output

pub mod report;
pub mod scenarios;
pub mod suite;

pub use report::{Report, ReportFormat};
pub use scenarios::{CycleOutcome, cycle, deflate_suite, image_suite};
pub use suite::{Scenario, ScenarioResult, Stats, Suite, SuiteOptions};
