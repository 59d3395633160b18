// SPDX-License-Identifier: MIT
// Errors produced while decoding, resizing or re-encoding an image.

use fast_image_resize as fir;

#[derive(Debug)]
pub enum SqueezeError {
    BufferTooSmall,
    Decode(image::ImageError),
    Encode(image::ImageError),
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
    DataUrl(String),
    Base64(base64::DecodeError),
    Io(std::io::Error),
}

impl From<fir::ResizeError> for SqueezeError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for SqueezeError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }
impl From<base64::DecodeError> for SqueezeError { fn from(e: base64::DecodeError) -> Self { Self::Base64(e) } }
impl From<std::io::Error> for SqueezeError { fn from(e: std::io::Error) -> Self { Self::Io(e) } }

impl std::fmt::Display for SqueezeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqueezeError::BufferTooSmall => write!(f, "Output buffer too small"),
            SqueezeError::Decode(e) => write!(f, "Image decode error: {}", e),
            SqueezeError::Encode(e) => write!(f, "Image encode error: {}", e),
            SqueezeError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            SqueezeError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
            SqueezeError::DataUrl(reason) => write!(f, "Invalid data URL: {}", reason),
            SqueezeError::Base64(e) => write!(f, "Base64 error: {}", e),
            SqueezeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for SqueezeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SqueezeError::Decode(e) | SqueezeError::Encode(e) => Some(e),
            SqueezeError::Fir(e) => Some(e),
            SqueezeError::ImageBuf(e) => Some(e),
            SqueezeError::Base64(e) => Some(e),
            SqueezeError::Io(e) => Some(e),
            _ => None,
        }
    }
}
