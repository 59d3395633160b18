// SPDX-License-Identifier: MIT
//! # Image Files
//!
//! Encoded images plus the metadata a browser `File` carries (name, MIME type,
//! modification time), canvas encoding, and `data:` URL conversion.

use std::time::SystemTime;

use base64::{engine::general_purpose, Engine as _};
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::canvas::Canvas;
use crate::error::SqueezeError;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";

/// Quality used when the requested one is outside `0.0..=1.0`.
const DEFAULT_JPEG_QUALITY: f32 = 0.92;

/// An encoded image with file metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub last_modified: SystemTime,
    pub data: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            last_modified: SystemTime::now(),
            data,
        }
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_jpeg(&self) -> bool {
        self.mime.eq_ignore_ascii_case(MIME_JPEG)
    }
}

/// Encode `canvas` into a file of type `mime`.
///
/// JPEG honors `quality` in `0.0..=1.0` (out-of-range values use 0.92) and
/// drops alpha. Any type other than JPEG is written as lossless PNG and the
/// returned file reports `image/png`.
pub fn canvas_to_file(
    canvas: &Canvas,
    mime: &str,
    name: impl Into<String>,
    last_modified: SystemTime,
    quality: f32,
) -> Result<ImageFile, SqueezeError> {
    let mut data = Vec::new();
    let mime = if mime.eq_ignore_ascii_case(MIME_JPEG) {
        let rgb: RgbImage = canvas.as_rgba().convert();
        let mut encoder = JpegEncoder::new_with_quality(&mut data, jpeg_quality(quality));
        encoder.encode_image(&rgb).map_err(SqueezeError::Encode)?;
        MIME_JPEG
    } else {
        PngEncoder::new(&mut data)
            .write_image(
                canvas.as_rgba().as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(SqueezeError::Encode)?;
        MIME_PNG
    };

    Ok(ImageFile {
        name: name.into(),
        mime: mime.to_string(),
        last_modified,
        data,
    })
}

fn jpeg_quality(quality: f32) -> u8 {
    let quality = if (0.0..=1.0).contains(&quality) { quality } else { DEFAULT_JPEG_QUALITY };
    ((quality * 100.0).round() as u8).clamp(1, 100)
}

/// Render `file` as `data:<mime>;base64,<payload>`.
pub fn get_data_url_from_file(file: &ImageFile) -> String {
    format!(
        "data:{};base64,{}",
        file.mime,
        general_purpose::STANDARD.encode(&file.data)
    )
}

/// Parse a base64 `data:` URL back into a file.
pub fn get_file_from_data_url(
    url: &str,
    name: impl Into<String>,
    last_modified: SystemTime,
) -> Result<ImageFile, SqueezeError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| SqueezeError::DataUrl("missing 'data:' scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SqueezeError::DataUrl("missing ',' separator".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| SqueezeError::DataUrl("only base64 payloads are supported".to_string()))?;

    let data = general_purpose::STANDARD.decode(payload.trim())?;
    Ok(ImageFile {
        name: name.into(),
        mime: if mime.is_empty() { "text/plain".to_string() } else { mime.to_string() },
        last_modified,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(w: u32, h: u32) -> Canvas {
        Canvas::from_rgba(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x * 255 / w) as u8, (y * 255 / h) as u8, 128, 255])
        }))
    }

    #[test]
    fn jpeg_quality_changes_size() {
        let canvas = gradient(128, 96);
        let now = SystemTime::now();
        let high = canvas_to_file(&canvas, MIME_JPEG, "a.jpeg", now, 1.0).unwrap();
        let low = canvas_to_file(&canvas, MIME_JPEG, "a.jpeg", now, 0.1).unwrap();

        assert_eq!(high.mime, MIME_JPEG);
        assert!(low.size() < high.size());
        assert_eq!(&high.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn unknown_mime_falls_back_to_png() {
        let canvas = gradient(8, 8);
        let file = canvas_to_file(&canvas, "image/webp", "a.webp", SystemTime::now(), 0.5).unwrap();
        assert_eq!(file.mime, MIME_PNG);
        assert_eq!(&file.data[1..4], b"PNG");
    }

    #[test]
    fn out_of_range_quality_uses_default() {
        assert_eq!(jpeg_quality(7.0), 92);
        assert_eq!(jpeg_quality(-1.0), 92);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.5), 50);
    }

    #[test]
    fn data_url_keeps_bytes_and_type() {
        let file = ImageFile::new("x.png", MIME_PNG, vec![1, 2, 3, 250]);
        let url = get_data_url_from_file(&file);
        assert!(url.starts_with("data:image/png;base64,"));

        let back = get_file_from_data_url(&url, "x.png", file.last_modified).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn malformed_data_urls_are_rejected() {
        let now = SystemTime::now();
        assert!(matches!(
            get_file_from_data_url("http://x", "a", now),
            Err(SqueezeError::DataUrl(_))
        ));
        assert!(matches!(
            get_file_from_data_url("data:image/png,abc", "a", now),
            Err(SqueezeError::DataUrl(_))
        ));
        assert!(matches!(
            get_file_from_data_url("data:image/png;base64,@@@", "a", now),
            Err(SqueezeError::Base64(_))
        ));
    }
}
