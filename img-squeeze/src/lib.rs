// SPDX-License-Identifier: MIT
//! # img-squeeze: Image Re-Compression on the CPU
//!
//! This crate re-encodes images so they fit a byte budget and a maximum
//! resolution. It is the image half of the offload benchmark: the same calls run
//! on the caller's thread or inside a background worker.
//!
//! ## Pipeline
//!
//! ```text
//! ImageFile ──decode──▶ Canvas ──clamp side──▶ Canvas ──orientation──▶ Canvas
//!                                                                   │
//!            ◀──── shrink ×0.9, quality ×0.9 while over budget ◀── encode
//! ```
//!
//! ## Key Components
//!
//! - [`presets`]: resize plan computation (max-side clamping, exact sizes)
//! - [`cpu`]: SIMD resize of RGBA canvases built on fast_image_resize
//! - [`canvas`]: decoding and the RGBA drawing surface
//! - [`file`]: encoded image files, JPEG/PNG encoding and data URLs
//! - [`orientation`]: EXIF orientation lookup and correction
//! - [`compress`]: the iterative compression entry point
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use img_squeeze::{compress, CompressOptions, ImageFile};
//!
//! # fn run(file: ImageFile) -> Result<(), img_squeeze::SqueezeError> {
//! let options = CompressOptions {
//!     max_size_mb: 0.5,
//!     max_width_or_height: Some(1024),
//!     ..CompressOptions::default()
//! };
//! let smaller = compress(&file, &options)?;
//! assert!(smaller.size() <= file.size() || options.max_iteration == 0);
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod compress;
pub mod cpu;
pub mod error;
pub mod file;
pub mod orientation;
pub mod presets;

pub use canvas::{draw_file_in_canvas, draw_image_in_canvas, load_image, load_image_from_path, Canvas};
pub use compress::{compress, compress_with, handle_max_width_or_height, CompressOptions};
pub use error::SqueezeError;
pub use file::{canvas_to_file, get_data_url_from_file, get_file_from_data_url, ImageFile, MIME_JPEG, MIME_PNG};
pub use orientation::{follow_exif_orientation, get_exif_orientation, Orientation};
