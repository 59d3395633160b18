//! The standard scenario sets and the single-image cycle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::join_all;
use img_squeeze::{CompressOptions, ImageFile};

use super::suite::{Scenario, Suite, SuiteOptions};
use crate::codec;
use crate::error::{BenchError, BenchResult};
use crate::offload::{ImageCompression, mode_label};
use crate::pool::CompressPool;
use crate::source::{self, ImageSource};

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn compress_images(
    compression: &Arc<ImageCompression>,
    files: Arc<Vec<ImageFile>>,
    options: CompressOptions,
    use_web_worker: bool,
) -> impl Scenario + 'static {
    let compression = Arc::clone(compression);
    move || {
        let compression = Arc::clone(&compression);
        let files = Arc::clone(&files);
        async move {
            compression
                .compress_files(&files, &options, use_web_worker)
                .await
                .map(|_| ())
        }
    }
}

/// Image compression on the caller vs on workers, for one and all files.
pub fn image_suite(
    compression: Arc<ImageCompression>,
    files: Vec<ImageFile>,
    options: CompressOptions,
    suite_options: SuiteOptions,
) -> Suite {
    let first = Arc::new(files.iter().take(1).cloned().collect::<Vec<_>>());
    let all = Arc::new(files);
    let count = all.len();

    let mut suite = Suite::new("image compression", suite_options);
    for (set, size) in [(&first, 1), (&all, count)] {
        for use_web_worker in [false, true] {
            let name = format!("compress {} in {}", plural(size, "image"), mode_label(use_web_worker));
            suite = suite.add(
                name,
                compress_images(&compression, Arc::clone(set), options, use_web_worker),
            );
        }
    }
    suite
}

/// How a deflate scenario runs its payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeflateMode {
    MainThread,
    Worker { transferable: bool },
}

impl DeflateMode {
    fn label(self) -> &'static str {
        match self {
            DeflateMode::MainThread => "main thread",
            DeflateMode::Worker { transferable: true } => "worker with transfer",
            DeflateMode::Worker { transferable: false } => "worker without transfer",
        }
    }
}

fn deflate_payloads(
    pool: &Arc<CompressPool>,
    payloads: Arc<Vec<Bytes>>,
    level: u32,
    mode: DeflateMode,
) -> impl Scenario + 'static {
    let pool = Arc::clone(pool);
    move || {
        let pool = Arc::clone(&pool);
        let payloads = Arc::clone(&payloads);
        async move {
            match mode {
                DeflateMode::MainThread => {
                    for payload in payloads.iter() {
                        codec::round_trip(payload, level)?;
                    }
                }
                DeflateMode::Worker { transferable } => {
                    let replies =
                        join_all(payloads.iter().map(|p| pool.compress(p.clone(), transferable))).await;
                    for reply in replies {
                        reply?;
                    }
                }
            }
            Ok::<(), BenchError>(())
        }
    }
}

/// DEFLATE round trips inline vs on workers, with and without transfer.
///
/// The inline scenarios compress at `level`; worker scenarios use the level
/// the pool was built with.
pub fn deflate_suite(
    pool: Arc<CompressPool>,
    payloads: Vec<Bytes>,
    level: u32,
    suite_options: SuiteOptions,
) -> Suite {
    let first = Arc::new(payloads.iter().take(1).cloned().collect::<Vec<_>>());
    let all = Arc::new(payloads);
    let count = all.len();

    let modes = [
        DeflateMode::MainThread,
        DeflateMode::Worker { transferable: true },
        DeflateMode::Worker { transferable: false },
    ];

    let mut suite = Suite::new("deflate round trip", suite_options);
    for (set, size) in [(&first, 1), (&all, count)] {
        for mode in modes {
            let name = format!("deflate {} in {}", plural(size, "payload"), mode.label());
            suite = suite.add(name, deflate_payloads(&pool, Arc::clone(set), level, mode));
        }
    }
    suite
}

/// Files written by [`cycle`].
#[derive(Clone, Debug)]
pub struct CycleOutcome {
    pub original_size: usize,
    pub compressed_size: usize,
    pub written: Vec<PathBuf>,
}

/// Load one image, compress it on a worker, decode the result back through
/// its data URL and write all three stages to `out_dir`.
pub async fn cycle(
    compression: &ImageCompression,
    source: &ImageSource,
    options: &CompressOptions,
    out_dir: &Path,
) -> BenchResult<CycleOutcome> {
    let files = source::get_image_files(source, 1).await?;
    let compressed = compression.compress_files(&files, options, true).await?;
    let images = source::get_images_from_files(&compressed)?;

    std::fs::create_dir_all(out_dir)
        .map_err(|e| BenchError::io("create output directory", e).with_path(out_dir.display().to_string()))?;

    let mut written = Vec::new();
    for ((original, small), decoded) in files.iter().zip(&compressed).zip(&images) {
        for (prefix, file) in [("original", original), ("compressed", small)] {
            let path = out_dir.join(format!("{prefix}-{}", file.name));
            std::fs::write(&path, &file.data)
                .map_err(|e| BenchError::io("write image", e).with_path(path.display().to_string()))?;
            written.push(path);
        }

        let stem = small.name.rsplit_once('.').map_or(small.name.as_str(), |(stem, _)| stem);
        let path = out_dir.join(format!("decoded-{stem}.png"));
        decoded.save(&path).map_err(|e| {
            BenchError::image("save decoded image", img_squeeze::SqueezeError::Encode(e))
                .with_context(path.display().to_string())
        })?;
        written.push(path);
    }

    let outcome = CycleOutcome {
        original_size: files.iter().map(ImageFile::size).sum(),
        compressed_size: compressed.iter().map(ImageFile::size).sum(),
        written,
    };
    tracing::info!(
        "cycle done: {} -> {} bytes, {} files written to {}",
        outcome.original_size,
        outcome.compressed_size,
        outcome.written.len(),
        out_dir.display()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_names() {
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(20, "image"), "20 images");
    }

    #[tokio::test]
    async fn deflate_suite_has_six_scenarios() {
        let pool = Arc::new(CompressPool::with_level(2, 3).unwrap());
        let payloads = vec![Bytes::from(vec![1u8; 256]), Bytes::from(vec![2u8; 512])];
        let suite = deflate_suite(pool, payloads, 3, SuiteOptions { warmup: 0, samples: 1 });
        assert_eq!(suite.len(), 6);

        let report = suite.run().await;
        let names: Vec<_> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names[0], "deflate 1 payload in main thread");
        assert_eq!(names[5], "deflate 2 payloads in worker without transfer");
        assert!(report.results.iter().all(|r| r.error.is_none()));
    }
}
