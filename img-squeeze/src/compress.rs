// SPDX-License-Identifier: MIT
//! # Iterative Compression
//!
//! Draw the file, clamp its longest side, fix its orientation, then encode.
//! While the encoded file is larger than the budget, shrink the canvas by 10%
//! per side and lower JPEG quality by 10% and encode again, up to
//! `max_iteration` extra attempts. The last attempt is returned even if it is
//! still over budget.

use fast_image_resize::Resizer;

use crate::canvas::{draw_file_in_canvas, Canvas};
use crate::error::SqueezeError;
use crate::file::{canvas_to_file, ImageFile};
use crate::orientation::{follow_exif_orientation, get_exif_orientation, Orientation};
use crate::presets::{AspectMode, ScaleTarget};

const SHRINK_FACTOR: f64 = 0.9;
const QUALITY_FACTOR: f32 = 0.9;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Options accepted by [`compress`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressOptions {
    /// Target upper bound of the output in megabytes. `f64::INFINITY` disables it.
    pub max_size_mb: f64,
    /// Clamp the longest side to this many pixels.
    pub max_width_or_height: Option<u32>,
    /// Extra encode attempts allowed when the first one is over budget.
    pub max_iteration: u32,
    /// Orientation to apply instead of the one stored in the file.
    pub exif_orientation: Option<Orientation>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_size_mb: f64::INFINITY,
            max_width_or_height: None,
            max_iteration: 10,
            exif_orientation: None,
        }
    }
}

impl CompressOptions {
    pub fn max_size_bytes(&self) -> f64 {
        self.max_size_mb * BYTES_PER_MB
    }
}

/// Clamp the canvas' longest side to `options.max_width_or_height`.
pub fn handle_max_width_or_height(
    resizer: &mut Resizer,
    canvas: Canvas,
    options: &CompressOptions,
) -> Result<Canvas, SqueezeError> {
    match options.max_width_or_height {
        Some(max_side) if canvas.size().long_side() > max_side => {
            canvas.apply_plan(resizer, ScaleTarget::MaxLongSide(max_side), AspectMode::Preserve)
        }
        _ => Ok(canvas),
    }
}

/// Compress `file` with a fresh resizer.
pub fn compress(file: &ImageFile, options: &CompressOptions) -> Result<ImageFile, SqueezeError> {
    let mut resizer = Resizer::new();
    compress_with(&mut resizer, file, options)
}

/// Compress `file`, reusing `resizer` scratch buffers across calls.
pub fn compress_with(
    resizer: &mut Resizer,
    file: &ImageFile,
    options: &CompressOptions,
) -> Result<ImageFile, SqueezeError> {
    let max_size = options.max_size_bytes();

    let (_, canvas) = draw_file_in_canvas(file)?;
    let canvas = handle_max_width_or_height(resizer, canvas, options)?;
    let orientation = options
        .exif_orientation
        .or_else(|| get_exif_orientation(file))
        .unwrap_or(Orientation::NoTransforms);
    let mut canvas = follow_exif_orientation(canvas, orientation);

    let mut quality = 1.0f32;
    let mut encoded = canvas_to_file(&canvas, &file.mime, file.name.clone(), file.last_modified, quality)?;
    let exceeded_at_first = encoded.size() as f64 > max_size;

    let mut remaining = options.max_iteration;
    while remaining > 0 && encoded.size() as f64 > max_size {
        remaining -= 1;
        if exceeded_at_first {
            canvas = canvas.apply_plan(resizer, ScaleTarget::Factor(SHRINK_FACTOR), AspectMode::Preserve)?;
        }
        if file.is_jpeg() {
            quality *= QUALITY_FACTOR;
        }
        encoded = canvas_to_file(&canvas, &file.mime, file.name.clone(), file.last_modified, quality)?;
    }

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::MIME_JPEG;
    use crate::orientation::tests::jpeg_with_orientation;
    use image::{Rgba, RgbaImage};
    use std::time::SystemTime;

    fn noisy_jpeg(w: u32, h: u32) -> ImageFile {
        let mut seed = 0x2545_F491u32;
        let pixels = RgbaImage::from_fn(w, h, |_, _| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let [r, g, b, _] = seed.to_le_bytes();
            Rgba([r, g, b, 255])
        });
        canvas_to_file(&Canvas::from_rgba(pixels), MIME_JPEG, "noise.jpeg", SystemTime::now(), 1.0).unwrap()
    }

    #[test]
    fn clamps_longest_side() {
        let file = noisy_jpeg(200, 100);
        let options = CompressOptions {
            max_width_or_height: Some(50),
            ..CompressOptions::default()
        };
        let out = compress(&file, &options).unwrap();
        let (_, canvas) = draw_file_in_canvas(&out).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (50, 25));
        assert_eq!(out.name, "noise.jpeg");
        assert_eq!(out.mime, MIME_JPEG);
    }

    #[test]
    fn shrinks_until_under_budget() {
        let file = noisy_jpeg(256, 256);
        let budget = file.size() / 4;
        let options = CompressOptions {
            max_size_mb: budget as f64 / BYTES_PER_MB,
            max_iteration: 30,
            ..CompressOptions::default()
        };
        let out = compress(&file, &options).unwrap();
        assert!(out.size() <= budget, "{} > {}", out.size(), budget);
    }

    #[test]
    fn zero_iterations_returns_first_encode() {
        let file = noisy_jpeg(64, 64);
        let options = CompressOptions {
            max_size_mb: 1.0 / BYTES_PER_MB,
            max_iteration: 0,
            ..CompressOptions::default()
        };
        let out = compress(&file, &options).unwrap();
        let (_, canvas) = draw_file_in_canvas(&out).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (64, 64));
    }

    #[test]
    fn explicit_orientation_rotates() {
        let file = noisy_jpeg(40, 20);
        let options = CompressOptions {
            exif_orientation: Some(Orientation::Rotate270),
            ..CompressOptions::default()
        };
        let out = compress(&file, &options).unwrap();
        let (_, canvas) = draw_file_in_canvas(&out).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (20, 40));
    }

    #[test]
    fn stored_orientation_rotates() {
        let file = ImageFile::new("x.jpeg", MIME_JPEG, jpeg_with_orientation(40, 20, 6, true));
        let out = compress(&file, &CompressOptions::default()).unwrap();
        let (_, canvas) = draw_file_in_canvas(&out).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (20, 40));
    }

    #[test]
    fn header_only_jpeg_fails_to_decode() {
        let file = ImageFile::new("x.jpeg", MIME_JPEG, vec![0xFF, 0xD8, 0xFF, 0xD9]);
        assert!(matches!(compress(&file, &CompressOptions::default()), Err(SqueezeError::Decode(_))));
    }
}
