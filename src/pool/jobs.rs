//! The two jobs the benchmark runs on workers.
//!
//! - [`DeflateJob`]: deflate then inflate a byte buffer ([`CompressPool`])
//! - [`ImageJob`]: re-compress an image file ([`ImagePool`])

use bytes::Bytes;
use fast_image_resize::Resizer;
use img_squeeze::{CompressOptions, ImageFile};

use super::job::Job;
use super::manager::{Ticket, WorkerPool};
use super::message::Completion;
use crate::codec;
use crate::error::{BenchError, BenchResult};

/// Deflate/inflate round trip at a fixed level.
pub struct DeflateJob {
    level: u32,
}

impl DeflateJob {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl Job for DeflateJob {
    type Input = Bytes;
    type Output = Bytes;
    const NAME: &'static str = "deflate";

    fn run(&mut self, data: Bytes, transferable: bool) -> BenchResult<Bytes> {
        let restored = codec::round_trip(&data, self.level)?;
        // Copied payloads get a copied reply.
        Ok(if transferable {
            Bytes::from(restored)
        } else {
            Bytes::copy_from_slice(&restored)
        })
    }
}

pub type CompressPool = WorkerPool<DeflateJob>;

impl CompressPool {
    /// Spawn `size` deflate workers compressing at `level`.
    pub fn with_level(size: usize, level: u32) -> BenchResult<Self> {
        if level > codec::MAX_LEVEL {
            return Err(BenchError::config(
                "level",
                level.to_string(),
                format!("must be between 0 and {}", codec::MAX_LEVEL),
            ));
        }
        WorkerPool::new(size, |_| DeflateJob::new(level))
    }

    /// Dispatch a round trip of `data`.
    ///
    /// With `transferable` the buffer handle is moved to the worker as is;
    /// otherwise the worker receives a deep copy.
    pub fn submit_bytes(&self, data: Bytes, transferable: bool) -> BenchResult<Ticket<Bytes>> {
        let payload = if transferable {
            data
        } else {
            Bytes::copy_from_slice(&data)
        };
        self.submit(payload, transferable)
    }

    pub async fn compress(&self, data: Bytes, transferable: bool) -> BenchResult<Completion<Bytes>> {
        self.submit_bytes(data, transferable)?.await
    }
}

/// One image plus the options to compress it with.
#[derive(Clone, Debug)]
pub struct ImageTask {
    pub file: ImageFile,
    pub options: CompressOptions,
}

/// Image re-compression; each worker keeps its own resizer scratch space.
pub struct ImageJob {
    resizer: Resizer,
}

impl ImageJob {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }
}

impl Default for ImageJob {
    fn default() -> Self {
        Self::new()
    }
}

impl Job for ImageJob {
    type Input = ImageTask;
    type Output = ImageFile;
    const NAME: &'static str = "image";

    fn run(&mut self, task: ImageTask, _transferable: bool) -> BenchResult<ImageFile> {
        img_squeeze::compress_with(&mut self.resizer, &task.file, &task.options)
            .map_err(|e| BenchError::image("compress", e).with_context(task.file.name.clone()))
    }
}

pub type ImagePool = WorkerPool<ImageJob>;

impl ImagePool {
    pub fn spawn(size: usize) -> BenchResult<Self> {
        WorkerPool::new(size, |_| ImageJob::new())
    }

    /// Compress `file` on the next worker. Files are always moved.
    pub async fn compress_file(&self, file: ImageFile, options: CompressOptions) -> BenchResult<ImageFile> {
        let completion = self.submit(ImageTask { file, options }, true)?.await?;
        Ok(completion.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflate_job_restores_payload() {
        let mut job = DeflateJob::new(3);
        let data = Bytes::from_static(b"aaaaaaaaaabbbbbbbbbbaaaaaaaaaa");
        assert_eq!(job.run(data.clone(), true).unwrap(), data);
        assert_eq!(job.run(data.clone(), false).unwrap(), data);
    }

    #[test]
    fn invalid_level_is_rejected_before_spawning() {
        let err = CompressPool::with_level(2, 42).err().unwrap();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn copy_submission_does_not_share_memory() {
        let pool = CompressPool::with_level(1, 3).unwrap();
        let data = Bytes::from(vec![7u8; 100]);
        let done = pool.submit_bytes(data.clone(), false).unwrap().wait().unwrap();
        assert_eq!(done.result, data);
        assert_ne!(done.result.as_ptr(), data.as_ptr());
        assert_eq!(done.transferable, Some(false));
    }
}
