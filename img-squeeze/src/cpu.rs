// SPDX-License-Identifier: MIT
// CPU scaler built on fast_image_resize (SIMD-accelerated).
// RGBA8 in → RGBA8 out, direct write into caller-provided dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{ResizeOptions, Resizer};

use crate::error::SqueezeError;
use crate::presets::{ScalePlan, Size};

/// Resize a tightly packed RGBA buffer according to `plan`.
/// `dst` must hold at least `plan.out.w * plan.out.h * 4` bytes.
pub fn scale_rgba_cpu(
    resizer: &mut Resizer,
    src_rgba: &[u8],
    src: Size,
    plan: &ScalePlan,
    dst: &mut [u8],
) -> Result<(), SqueezeError> {
    let dst_len = plan.out.rgba_len();
    if dst.len() < dst_len {
        return Err(SqueezeError::BufferTooSmall);
    }

    if plan.is_identity() {
        dst[..dst_len].copy_from_slice(&src_rgba[..dst_len]);
        return Ok(());
    }

    let src_view = TypedImageRef::<U8x4>::from_buffer(src.w, src.h, src_rgba)?;
    let mut dst_image = TypedImage::<U8x4>::from_buffer(plan.out.w, plan.out.h, &mut dst[..dst_len])?;

    // Canvas pixels are straight (not premultiplied) alpha.
    let opts = ResizeOptions::new().use_alpha(true);
    resizer.resize_typed::<U8x4>(&src_view, &mut dst_image, &opts)?;

    Ok(())
}
