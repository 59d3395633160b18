//! # Configuration Module
//!
//! Run configuration shared by the CLI and the library: how many images to
//! load and from where, pool sizes, suite sampling, and compression limits.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `images` | `usize` | ≥ 1 | Images loaded for the "N images" scenarios |
//! | `workers` | `Option<usize>` | ≥ 1 | Pool size; defaults per suite |
//! | `samples` | `usize` | ≥ 1 | Timed runs per scenario |
//! | `warmup` | `usize` | any | Untimed runs per scenario |
//! | `level` | `u32` | 0-9 | DEFLATE level |
//! | `max_size_mb` | `f64` | > 0 | Target output size for image compression |
//! | `max_width_or_height` | `Option<u32>` | ≥ 1 | Longest side clamp |
//!
//! ## Examples
//!
//! ```rust
//! use offload_bench::config::BenchConfig;
//!
//! let mut config = BenchConfig::default();
//! config.images = 5;
//! config.max_size_mb = 0.5;
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.image_workers(), 1);
//! assert_eq!(config.deflate_workers(), 4);
//! ```

use std::path::PathBuf;

use img_squeeze::CompressOptions;

use crate::bench::{ReportFormat, SuiteOptions};
use crate::codec;
use crate::error::{BenchError, BenchResult};
use crate::source::ImageSource;

pub const DEFAULT_IMAGES: usize = 20;
pub const DEFAULT_IMAGE_WORKERS: usize = crate::offload::DEFAULT_IMAGE_WORKERS;
pub const DEFAULT_DEFLATE_WORKERS: usize = 4;

/// Everything one benchmark run needs.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    /// Number of images loaded for the batch scenarios.
    pub images: usize,

    /// Worker count; `None` uses [`DEFAULT_IMAGE_WORKERS`] for image runs
    /// and [`DEFAULT_DEFLATE_WORKERS`] for deflate runs.
    pub workers: Option<usize>,

    pub samples: usize,
    pub warmup: usize,

    /// DEFLATE compression level, 0 to 9.
    pub level: u32,

    /// Target output size in megabytes. `f64::INFINITY` means unlimited.
    pub max_size_mb: f64,

    pub max_width_or_height: Option<u32>,

    pub source: ImageSource,
    pub format: ReportFormat,

    /// Where `cycle` writes its files.
    pub out: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        let suite = SuiteOptions::default();
        Self {
            images: DEFAULT_IMAGES,
            workers: None,
            samples: suite.samples,
            warmup: suite.warmup,
            level: codec::DEFAULT_LEVEL,
            max_size_mb: f64::INFINITY,
            max_width_or_height: None,
            source: ImageSource::default(),
            format: ReportFormat::default(),
            out: PathBuf::from("cycle-output"),
        }
    }
}

impl BenchConfig {
    /// Check every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] naming the first offending field.
    pub fn validate(&self) -> BenchResult<()> {
        if self.images == 0 {
            return Err(invalid("images", self.images, "must be at least 1"));
        }
        if self.workers == Some(0) {
            return Err(invalid("workers", 0, "must be at least 1"));
        }
        if self.samples == 0 {
            return Err(invalid("samples", self.samples, "must be at least 1"));
        }
        if self.level > codec::MAX_LEVEL {
            return Err(invalid(
                "level",
                self.level,
                &format!("must be between 0 and {}", codec::MAX_LEVEL),
            ));
        }
        if self.max_size_mb.is_nan() || self.max_size_mb <= 0.0 {
            return Err(invalid("max_size_mb", self.max_size_mb, "must be greater than 0"));
        }
        if self.max_width_or_height == Some(0) {
            return Err(invalid("max_width_or_height", 0, "must be at least 1"));
        }
        Ok(())
    }

    pub fn image_workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_IMAGE_WORKERS)
    }

    pub fn deflate_workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_DEFLATE_WORKERS)
    }

    pub fn to_compress_options(&self) -> CompressOptions {
        CompressOptions {
            max_size_mb: self.max_size_mb,
            max_width_or_height: self.max_width_or_height,
            ..CompressOptions::default()
        }
    }

    pub fn to_suite_options(&self) -> SuiteOptions {
        SuiteOptions {
            warmup: self.warmup,
            samples: self.samples,
        }
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> BenchError {
    BenchError::config(field, value.to_string(), reason)
        .with_recovery_suggestion(format!("fix the {field} setting and try again"))
}
