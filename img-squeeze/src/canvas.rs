// SPDX-License-Identifier: MIT
//! # Canvas
//!
//! An RGBA8 drawing surface. Decoded images are drawn onto a canvas before
//! they are resized, rotated and encoded back into a file.

use std::path::Path;

use fast_image_resize::Resizer;
use image::{DynamicImage, RgbaImage};

use crate::cpu::scale_rgba_cpu;
use crate::error::SqueezeError;
use crate::file::ImageFile;
use crate::presets::{build_plan, AspectMode, ScaleTarget, Size};

/// Tightly packed RGBA8 pixels with known dimensions.
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Blank, fully transparent canvas. Zero dimensions are clamped to 1px.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }

    /// Draw this canvas scaled into a new canvas of `size` (stretching if needed).
    pub fn draw_scaled(&self, resizer: &mut Resizer, size: Size) -> Result<Canvas, SqueezeError> {
        self.apply_plan(resizer, ScaleTarget::Exact(size), AspectMode::Distort)
    }

    pub(crate) fn apply_plan(
        &self,
        resizer: &mut Resizer,
        target: ScaleTarget,
        aspect: AspectMode,
    ) -> Result<Canvas, SqueezeError> {
        let plan = build_plan(self.size(), target, aspect);
        if plan.is_identity() {
            return Ok(self.clone());
        }

        let mut out = vec![0u8; plan.out.rgba_len()];
        scale_rgba_cpu(resizer, self.pixels.as_raw(), self.size(), &plan, &mut out)?;
        let pixels = RgbaImage::from_raw(plan.out.w, plan.out.h, out).ok_or(SqueezeError::BufferTooSmall)?;
        Ok(Canvas { pixels })
    }
}

/// Decode an encoded image (JPEG, PNG, ...) from memory.
pub fn load_image(bytes: &[u8]) -> Result<DynamicImage, SqueezeError> {
    image::load_from_memory(bytes).map_err(SqueezeError::Decode)
}

/// Read and decode an image file from disk.
pub fn load_image_from_path(path: impl AsRef<Path>) -> Result<DynamicImage, SqueezeError> {
    let bytes = std::fs::read(path)?;
    load_image(&bytes)
}

/// Draw a decoded image at its natural size.
pub fn draw_image_in_canvas(image: &DynamicImage) -> Canvas {
    Canvas::from_rgba(image.to_rgba8())
}

/// Decode `file` and draw it; returns both the decoded image and its canvas.
pub fn draw_file_in_canvas(file: &ImageFile) -> Result<(DynamicImage, Canvas), SqueezeError> {
    let image = load_image(&file.data)?;
    let canvas = draw_image_in_canvas(&image);
    Ok((image, canvas))
}
