//! # Offload Benchmark Library
//!
//! Measures what it costs to run image compression and DEFLATE round trips
//! on the caller versus on a pool of worker threads, with payloads either
//! moved to the worker or copied.
//!
//! ## Architecture
//!
//! - `core`: correlation ids and the pending-request table
//! - `pool`: the round-robin [`WorkerPool`] and the deflate/image jobs it runs
//! - `codec`: DEFLATE compress/decompress
//! - `offload`: [`ImageCompression`], inline or pooled image compression
//! - `source`: loading benchmark images from a URL, a directory or a generator
//! - `bench`: the scenario suite, standard scenario sets and reports
//! - `config`: run configuration and validation
//! - `error`: the [`BenchError`] taxonomy
//! - `telemetry`: logging setup
//!
//! Image work itself lives in the `img-squeeze` workspace crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use offload_bench::pool::CompressPool;
//!
//! # async fn example() -> offload_bench::BenchResult<()> {
//! let pool = CompressPool::with_level(4, 3)?;
//! let done = pool.compress(Bytes::from(vec![0u8; 100]), true).await?;
//! assert_eq!(done.result.len(), 100);
//! pool.destroy();
//! # Ok(())
//! # }
//! ```

pub mod bench;
pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod offload;
pub mod pool;
pub mod source;
pub mod telemetry;

pub use error::{BenchError, BenchResult, HasRecoverySuggestion};
pub use offload::ImageCompression;
pub use pool::{Completion, CompressPool, ImagePool, Job, Ticket, WorkerPool};
