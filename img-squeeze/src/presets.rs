// SPDX-License-Identifier: MIT
//! # Resize Plans
//!
//! Computes output dimensions for a canvas before any pixels are touched.
//!
//! ## Design Philosophy
//!
//! Resizing is split in two steps:
//! 1. **ScaleTarget**: what size constraint to apply (max side, exact size, or a factor)
//! 2. **AspectMode**: whether the aspect ratio is kept or the image is stretched
//!
//! The resulting [`ScalePlan`] is what [`crate::cpu`] executes.
//!
//! ## Rules
//!
//! - Max-side clamping never upscales: smaller images keep their size
//! - Every dimension is clamped to at least 1px
//! - Factor shrinking truncates like a canvas assigned a fractional width

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Length of the longest side.
    pub fn long_side(&self) -> u32 {
        self.w.max(self.h)
    }

    /// Number of bytes for a tightly packed RGBA buffer of this size.
    pub fn rgba_len(&self) -> usize {
        (self.w as usize) * (self.h as usize) * 4
    }
}

/// Defines how aspect ratio differences are handled during scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AspectMode {
    /// Keep original aspect ratio; output fits entirely within target bounds.
    Preserve,
    /// Stretch/squeeze image to exactly match target dimensions.
    Distort,
}

/// Defines the target size constraint for scaling operations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleTarget {
    /// Clamp the longest side to a maximum value, derive the other side proportionally.
    MaxLongSide(u32),
    /// Force output to exact dimensions (fit inside them with `AspectMode::Preserve`).
    Exact(Size),
    /// Multiply both sides by a factor in (0, 1], truncating to whole pixels.
    Factor(f64),
}

/// Complete scaling plan computed from input parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Target size constraint used for planning
    pub target: ScaleTarget,
    /// Aspect ratio handling strategy
    pub aspect: AspectMode,
    /// Final computed output dimensions
    pub out: Size,
}

impl ScalePlan {
    /// True when the plan leaves the canvas untouched.
    pub fn is_identity(&self) -> bool {
        self.input == self.out
    }
}

/// Compute a scaling plan from input parameters.
///
/// # Arguments
/// * `input` - Source image dimensions
/// * `target` - Size constraint to apply
/// * `aspect` - How to handle aspect ratio differences
///
/// # Performance
/// O(1) computation with minimal floating-point operations
pub fn build_plan(input: Size, target: ScaleTarget, aspect: AspectMode) -> ScalePlan {
    let out = match (target, aspect) {
        (ScaleTarget::MaxLongSide(max_side), AspectMode::Preserve) => {
            let (w, h) = fit_preserve(input, max_side);
            Size { w, h }
        }
        (ScaleTarget::MaxLongSide(max_side), AspectMode::Distort) => Size {
            w: max_side.max(1),
            h: max_side.max(1),
        },
        (ScaleTarget::Exact(out), AspectMode::Distort) => Size {
            w: out.w.max(1),
            h: out.h.max(1),
        },
        (ScaleTarget::Exact(out), AspectMode::Preserve) => {
            let (w, h) = fit_within(input, out);
            Size { w, h }
        }
        // A uniform factor keeps the ratio either way.
        (ScaleTarget::Factor(factor), _) => scale_by(input, factor),
    };

    ScalePlan {
        input,
        target,
        aspect,
        out,
    }
}

/// Fit image within max_side constraint while preserving aspect ratio.
/// Never upscales - returns original dimensions if already smaller than max_side.
fn fit_preserve(input: Size, max_long: u32) -> (u32, u32) {
    let (w, h) = (input.w as f64, input.h as f64);
    let long = w.max(h).max(1.0);
    let s = (max_long as f64 / long).min(1.0);
    (
        ((w * s).round() as u32).max(1),
        ((h * s).round() as u32).max(1),
    )
}

/// Fit image within a bounding box while preserving aspect ratio.
fn fit_within(input: Size, box_: Size) -> (u32, u32) {
    let (w, h) = (input.w.max(1) as f64, input.h.max(1) as f64);
    let (bw, bh) = (box_.w as f64, box_.h as f64);
    let s = (bw / w).min(bh / h).min(1.0);
    (
        ((w * s).round() as u32).max(1),
        ((h * s).round() as u32).max(1),
    )
}

fn scale_by(input: Size, factor: f64) -> Size {
    let factor = if factor.is_finite() && factor > 0.0 { factor.min(1.0) } else { 1.0 };
    Size {
        w: ((input.w as f64 * factor) as u32).max(1),
        h: ((input.h as f64 * factor) as u32).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_long_side_preserves_ratio() {
        let plan = build_plan(Size::new(1280, 960), ScaleTarget::MaxLongSide(640), AspectMode::Preserve);
        assert_eq!(plan.out, Size::new(640, 480));
        assert!(!plan.is_identity());
    }

    #[test]
    fn max_long_side_never_upscales() {
        let plan = build_plan(Size::new(300, 200), ScaleTarget::MaxLongSide(640), AspectMode::Preserve);
        assert_eq!(plan.out, Size::new(300, 200));
        assert!(plan.is_identity());
    }

    #[test]
    fn portrait_input_clamps_height() {
        let plan = build_plan(Size::new(960, 1280), ScaleTarget::MaxLongSide(320), AspectMode::Preserve);
        assert_eq!(plan.out, Size::new(240, 320));
    }

    #[test]
    fn factor_truncates_like_canvas() {
        let plan = build_plan(Size::new(1001, 15), ScaleTarget::Factor(0.9), AspectMode::Preserve);
        assert_eq!(plan.out, Size::new(900, 13));
    }

    #[test]
    fn degenerate_sizes_stay_positive() {
        let plan = build_plan(Size::new(1, 1), ScaleTarget::Factor(0.1), AspectMode::Preserve);
        assert_eq!(plan.out, Size::new(1, 1));

        let plan = build_plan(Size::new(4000, 10), ScaleTarget::MaxLongSide(100), AspectMode::Preserve);
        assert_eq!(plan.out, Size::new(100, 1));
    }

    #[test]
    fn exact_modes() {
        let input = Size::new(800, 400);
        let plan = build_plan(input, ScaleTarget::Exact(Size::new(200, 200)), AspectMode::Distort);
        assert_eq!(plan.out, Size::new(200, 200));

        let plan = build_plan(input, ScaleTarget::Exact(Size::new(200, 200)), AspectMode::Preserve);
        assert_eq!(plan.out, Size::new(200, 100));
    }
}
