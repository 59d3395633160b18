//! # Image Sources
//!
//! Where benchmark images come from, and how they are turned into the JPEG
//! files the scenarios compress.
//!
//! Every source image is decoded, drawn on a canvas and re-encoded as
//! `"{index}.jpeg"`, so all sources feed the benchmark the same kind of input.
//! Loading is blocking work (HTTP, disk, decode) and runs on tokio's blocking
//! pool, one task per image.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use futures_util::future::join_all;
use image::{DynamicImage, Rgba, RgbaImage};
use img_squeeze::{ImageFile, MIME_JPEG};
use tokio::task::spawn_blocking;

use crate::error::{BenchError, BenchResult};

/// Default remote template; `{index}` is replaced by the image index.
pub const DEFAULT_URL_TEMPLATE: &str = "https://loremflickr.com/1280/960/kitten?random={index}";

/// Size of generated images.
pub const SYNTHETIC_WIDTH: u32 = 1280;
pub const SYNTHETIC_HEIGHT: u32 = 960;

/// Quality used when re-encoding source images.
const SOURCE_QUALITY: f32 = 0.92;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Fetch over HTTP from a URL template containing `{index}`.
    Url(String),
    /// Read `*.jpg`, `*.jpeg` and `*.png` files from a directory, cycling
    /// through them when fewer exist than requested.
    Dir(PathBuf),
    /// Generate gradients locally.
    Synthetic,
}

impl Default for ImageSource {
    fn default() -> Self {
        ImageSource::Url(DEFAULT_URL_TEMPLATE.to_string())
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Url(template) => write!(f, "url {template}"),
            ImageSource::Dir(path) => write!(f, "dir {}", path.display()),
            ImageSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// A single image to load.
#[derive(Clone, Debug)]
enum Origin {
    Url(String),
    Path(PathBuf),
    Synthetic(usize),
}

impl Origin {
    fn name(&self) -> String {
        match self {
            Origin::Url(url) => url.clone(),
            Origin::Path(path) => path.display().to_string(),
            Origin::Synthetic(index) => format!("synthetic #{index}"),
        }
    }
}

/// Load `count` images from `source` and re-encode each as `"{index}.jpeg"`.
///
/// # Errors
///
/// Fails with [`BenchError::ImageLoad`] when an image cannot be read or
/// decoded, or [`BenchError::Network`] when a fetch fails.
pub async fn get_image_files(source: &ImageSource, count: usize) -> BenchResult<Vec<ImageFile>> {
    let origins = resolve_origins(source, count)?;
    tracing::info!("loading {count} images from {source}");

    let tasks = origins.into_iter().enumerate().map(|(index, origin)| {
        spawn_blocking(move || {
            let image = load_origin(&origin)?;
            let canvas = img_squeeze::draw_image_in_canvas(&image);
            img_squeeze::canvas_to_file(
                &canvas,
                MIME_JPEG,
                format!("{index}.jpeg"),
                SystemTime::now(),
                SOURCE_QUALITY,
            )
            .map_err(|e| BenchError::image("encode source image", e).with_context(origin.name()))
        })
    });

    join_all(tasks)
        .await
        .into_iter()
        .map(|joined| {
            joined.map_err(|e| BenchError::image_load("loader task", e.to_string()))?
        })
        .collect()
}

/// Decode files back into images through their `data:` URLs.
pub fn get_images_from_files(files: &[ImageFile]) -> BenchResult<Vec<DynamicImage>> {
    files
        .iter()
        .map(|file| {
            let url = img_squeeze::get_data_url_from_file(file);
            let decoded = img_squeeze::get_file_from_data_url(&url, file.name.clone(), file.last_modified)
                .map_err(|e| BenchError::image("parse data url", e).with_context(file.name.clone()))?;
            img_squeeze::load_image(&decoded.data)
                .map_err(|e| BenchError::image_load(file.name.clone(), e.to_string()))
        })
        .collect()
}

fn resolve_origins(source: &ImageSource, count: usize) -> BenchResult<Vec<Origin>> {
    match source {
        ImageSource::Url(template) => Ok((0..count)
            .map(|index| Origin::Url(template.replace("{index}", &index.to_string())))
            .collect()),
        ImageSource::Dir(dir) => {
            let paths = list_images(dir)?;
            Ok((0..count)
                .map(|index| Origin::Path(paths[index % paths.len()].clone()))
                .collect())
        }
        ImageSource::Synthetic => Ok((0..count).map(Origin::Synthetic).collect()),
    }
}

/// Sorted image paths in `dir`; errors when there are none.
fn list_images(dir: &Path) -> BenchResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        BenchError::io("read image directory", e).with_path(dir.display().to_string())
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(BenchError::image_load(
            dir.display().to_string(),
            "directory contains no .jpg, .jpeg or .png files",
        )
        .with_recovery_suggestion("point --dir at a folder with images or use --source synthetic"));
    }
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn load_origin(origin: &Origin) -> BenchResult<DynamicImage> {
    let bytes = match origin {
        Origin::Url(url) => fetch(url)?,
        Origin::Path(path) => std::fs::read(path).map_err(|e| {
            BenchError::image_load(origin.name(), e.to_string())
        })?,
        Origin::Synthetic(index) => return Ok(DynamicImage::ImageRgba8(gradient(*index))),
    };
    img_squeeze::load_image(&bytes).map_err(|e| BenchError::image_load(origin.name(), e.to_string()))
}

fn fetch(url: &str) -> BenchResult<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| BenchError::network(url, e))?;
    let body = response.bytes().map_err(|e| BenchError::network(url, e))?;
    tracing::debug!("fetched {} bytes from {url}", body.len());
    Ok(body.to_vec())
}

/// A diagonal gradient, tinted per index so images differ.
pub fn gradient(index: usize) -> RgbaImage {
    let tint = (index as u32).wrapping_mul(37) % 256;
    RgbaImage::from_fn(SYNTHETIC_WIDTH, SYNTHETIC_HEIGHT, |x, y| {
        let r = x * 255 / SYNTHETIC_WIDTH;
        let g = y * 255 / SYNTHETIC_HEIGHT;
        let b = (tint + (x + y) / 8) % 256;
        Rgba([r as u8, g as u8, b as u8, 255])
    })
}
