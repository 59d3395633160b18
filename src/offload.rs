//! Image compression on the caller's thread or on a worker pool.

use futures_util::future::join_all;
use img_squeeze::{CompressOptions, ImageFile};

use crate::error::{BenchError, BenchResult};
use crate::pool::ImagePool;

/// Workers an [`ImageCompression`] spawns by default.
pub const DEFAULT_IMAGE_WORKERS: usize = 1;

/// Front door for image compression.
///
/// Owns the image worker pool; the pool is torn down when this is dropped.
pub struct ImageCompression {
    pool: ImagePool,
}

impl ImageCompression {
    pub fn new() -> BenchResult<Self> {
        Self::with_workers(DEFAULT_IMAGE_WORKERS)
    }

    pub fn with_workers(workers: usize) -> BenchResult<Self> {
        Ok(Self {
            pool: ImagePool::spawn(workers)?,
        })
    }

    pub fn pool(&self) -> &ImagePool {
        &self.pool
    }

    /// Compress one file.
    ///
    /// With `use_web_worker` the file is moved to the next pool worker;
    /// otherwise the work runs inline on the calling task.
    pub async fn compress(
        &self,
        file: ImageFile,
        options: &CompressOptions,
        use_web_worker: bool,
    ) -> BenchResult<ImageFile> {
        if use_web_worker {
            self.pool.compress_file(file, *options).await
        } else {
            img_squeeze::compress(&file, options)
                .map_err(|e| BenchError::image("compress", e).with_context(file.name.clone()))
        }
    }

    /// Compress a batch concurrently. Fails with the first error in input order.
    pub async fn compress_files(
        &self,
        files: &[ImageFile],
        options: &CompressOptions,
        use_web_worker: bool,
    ) -> BenchResult<Vec<ImageFile>> {
        let mode = mode_label(use_web_worker);
        tracing::info!("start compressing {} image in {mode}", files.len());

        let compressed = join_all(
            files
                .iter()
                .map(|file| self.compress(file.clone(), options, use_web_worker)),
        )
        .await
        .into_iter()
        .collect::<BenchResult<Vec<_>>>()?;

        tracing::info!("finish compressing {} image in {mode}", files.len());
        Ok(compressed)
    }

    /// Tear down the worker pool; later worker compressions fail.
    pub fn destroy(&self) {
        self.pool.destroy();
    }
}

pub(crate) fn mode_label(use_web_worker: bool) -> &'static str {
    if use_web_worker { "worker" } else { "main thread" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use img_squeeze::{Canvas, MIME_JPEG, canvas_to_file};
    use std::time::SystemTime;

    fn sample_file() -> ImageFile {
        let canvas = Canvas::new(64, 48);
        canvas_to_file(&canvas, MIME_JPEG, "0.jpeg", SystemTime::now(), 0.9).unwrap()
    }

    #[tokio::test]
    async fn both_paths_produce_a_jpeg() {
        let compression = ImageCompression::new().unwrap();
        let options = CompressOptions::default();
        for use_web_worker in [false, true] {
            let out = compression
                .compress(sample_file(), &options, use_web_worker)
                .await
                .unwrap();
            assert!(out.is_jpeg());
            assert_eq!(out.name, "0.jpeg");
        }
    }

    #[tokio::test]
    async fn worker_failure_is_reported() {
        let compression = ImageCompression::new().unwrap();
        let broken = ImageFile::new("broken.jpeg", MIME_JPEG, vec![1, 2, 3]);
        let err = compression
            .compress(broken.clone(), &CompressOptions::default(), true)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "worker");

        let err = compression
            .compress(broken, &CompressOptions::default(), false)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "image");
    }

    #[tokio::test]
    async fn failures_name_the_file() {
        let compression = ImageCompression::new().unwrap();
        let broken = ImageFile::new("kitten-7.jpeg", MIME_JPEG, vec![1, 2, 3]);
        for use_web_worker in [false, true] {
            let err = compression
                .compress(broken.clone(), &CompressOptions::default(), use_web_worker)
                .await
                .unwrap_err();
            assert!(err.to_string().contains("kitten-7.jpeg"), "{err}");
        }
    }
}
