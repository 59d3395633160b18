//! Common test utilities shared by the integration tests.
#![allow(dead_code)]

use std::time::SystemTime;

use bytes::Bytes;
use image::{Rgba, RgbaImage};
use img_squeeze::{Canvas, ImageFile, MIME_JPEG, canvas_to_file};

/// Build a payload of `len` bytes whose content depends on `seed`.
pub fn payload(len: usize, seed: u8) -> Bytes {
    Bytes::from(
        (0..len)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect::<Vec<_>>(),
    )
}

/// A noisy RGBA image; noise keeps JPEG output large.
pub fn noisy_image(width: u32, height: u32, seed: u32) -> RgbaImage {
    let mut state = seed | 1;
    RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgba([r, g, b, 255])
    })
}

/// A JPEG file named `"{index}.jpeg"`.
pub fn jpeg_file(index: usize, width: u32, height: u32) -> ImageFile {
    let canvas = Canvas::from_rgba(noisy_image(width, height, index as u32 + 7));
    canvas_to_file(&canvas, MIME_JPEG, format!("{index}.jpeg"), SystemTime::now(), 0.92)
        .expect("encode test jpeg")
}

/// `count` JPEG files of the given size.
pub fn jpeg_files(count: usize, width: u32, height: u32) -> Vec<ImageFile> {
    (0..count).map(|i| jpeg_file(i, width, height)).collect()
}
