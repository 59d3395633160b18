// SPDX-License-Identifier: MIT
//! # EXIF Orientation
//!
//! Cameras store pixels in sensor order and record how to display them in the
//! EXIF `Orientation` tag. Decoding through `image` does not apply it, so the
//! compressor asks the decoder for the tag and rotates the canvas itself.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader};
pub use image::metadata::Orientation;

use crate::canvas::Canvas;
use crate::file::ImageFile;

/// Read the EXIF orientation stored in an image file.
///
/// Returns `None` when the data is not a recognizable image. Files without
/// EXIF, or with a tag value outside 1..=8, report `NoTransforms`.
pub fn get_exif_orientation(file: &ImageFile) -> Option<Orientation> {
    ImageReader::new(Cursor::new(&file.data))
        .with_guessed_format()
        .ok()?
        .into_decoder()
        .ok()?
        .orientation()
        .ok()
}

/// Rotate/flip the canvas so its pixels display upright.
pub fn follow_exif_orientation(canvas: Canvas, orientation: Orientation) -> Canvas {
    if orientation == Orientation::NoTransforms {
        return canvas;
    }
    let mut image = DynamicImage::ImageRgba8(canvas.into_rgba());
    image.apply_orientation(orientation);
    Canvas::from_rgba(image.into_rgba8())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbImage, RgbaImage};

    /// A `width`×`height` JPEG carrying an EXIF block with one orientation entry.
    pub(crate) fn jpeg_with_orientation(width: u32, height: u32, value: u16, little: bool) -> Vec<u8> {
        let mut tiff = Vec::new();
        let (w16, w32): (fn(u16) -> [u8; 2], fn(u32) -> [u8; 4]) = if little {
            (u16::to_le_bytes, u32::to_le_bytes)
        } else {
            (u16::to_be_bytes, u32::to_be_bytes)
        };
        tiff.extend_from_slice(if little { b"II" } else { b"MM" });
        tiff.extend_from_slice(&w16(42));
        tiff.extend_from_slice(&w32(8));
        tiff.extend_from_slice(&w16(1));
        tiff.extend_from_slice(&w16(0x0112));
        tiff.extend_from_slice(&w16(3));
        tiff.extend_from_slice(&w32(1));
        tiff.extend_from_slice(&w16(value));
        tiff.extend_from_slice(&[0, 0]);
        tiff.extend_from_slice(&w32(0));

        let mut segment = b"Exif\0\0".to_vec();
        segment.extend_from_slice(&tiff);

        let mut encoded = Vec::new();
        RgbImage::from_pixel(width, height, image::Rgb([90, 140, 200]))
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Jpeg)
            .unwrap();

        // SOI, then the EXIF APP1 segment, then the rest of the encoded file.
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&((segment.len() + 2) as u16).to_be_bytes());
        jpeg.extend_from_slice(&segment);
        jpeg.extend_from_slice(&encoded[2..]);
        jpeg
    }

    #[test]
    fn reads_both_byte_orders() {
        let file = ImageFile::new("a.jpeg", "image/jpeg", jpeg_with_orientation(8, 8, 6, true));
        assert_eq!(get_exif_orientation(&file), Some(Orientation::Rotate90));

        let file = ImageFile::new("a.jpeg", "image/jpeg", jpeg_with_orientation(8, 8, 3, false));
        assert_eq!(get_exif_orientation(&file), Some(Orientation::Rotate180));
    }

    #[test]
    fn missing_or_invalid_tag_needs_no_transform() {
        let file = ImageFile::new("a.jpeg", "image/jpeg", jpeg_with_orientation(8, 8, 9, true));
        assert_eq!(get_exif_orientation(&file), Some(Orientation::NoTransforms));

        let mut plain = Vec::new();
        RgbImage::new(8, 8)
            .write_to(&mut Cursor::new(&mut plain), ImageFormat::Jpeg)
            .unwrap();
        let file = ImageFile::new("a.jpeg", "image/jpeg", plain);
        assert_eq!(get_exif_orientation(&file), Some(Orientation::NoTransforms));
    }

    #[test]
    fn unrecognized_data_is_none() {
        let file = ImageFile::new("a.png", "image/png", vec![0x89, b'P', b'N', b'G']);
        assert_eq!(get_exif_orientation(&file), None);

        let file = ImageFile::new("a.jpeg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xD9]);
        assert_eq!(get_exif_orientation(&file), None);
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let mut pixels = RgbaImage::new(4, 2);
        pixels.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let canvas = follow_exif_orientation(Canvas::from_rgba(pixels), Orientation::Rotate90);

        assert_eq!((canvas.width(), canvas.height()), (2, 4));
        // Top-left moves to top-right after a clockwise quarter turn.
        assert_eq!(canvas.as_rgba().get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
