//! Decoded sticker images.

use crate::error::TextureError;

/// RGBA8 pixels of a sticker image, rows bottom to top (v = 0 is the first row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    /// Color data is sRGB encoded
    pub srgb: bool,
}

impl TextureData {
    /// Decode PNG, JPEG, or WebP bytes, flipping rows so v runs upward.
    pub fn decode(bytes: &[u8]) -> Result<Self, TextureError> {
        if bytes.is_empty() {
            return Err(TextureError::Empty);
        }
        let image = image::load_from_memory(bytes)?.flipv().to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.into_raw())
    }

    /// Wrap raw RGBA8 pixels, checking the buffer length.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(TextureError::Unavailable(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
            srgb: true,
        })
    }

    /// Single opaque pixel, handy as a placeholder.
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: color.to_vec(),
            srgb: true,
        }
    }

    /// True if any pixel is not fully opaque
    pub fn has_transparency(&self) -> bool {
        self.rgba.chunks_exact(4).any(|px| px[3] < 255)
    }
}
