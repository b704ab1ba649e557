//! Row-major RGB pixel grid shared by extraction and replacement.

use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use palette::Srgb;

use crate::color::Color;
use crate::error::{Error, Result};

/// A `width × height` grid of colors, stored row by row.
///
/// A buffer is never empty: both dimensions are at least one and the pixel
/// count always equals `width * height`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Build a buffer from row-major pixels.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidImage`] if either dimension is zero or
    /// `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_image(format!(
                "zero dimension {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::invalid_image(format!(
                "{} pixels for a {width}x{height} image (expected {expected})",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode any image format the `image` crate understands. Alpha is dropped.
    pub fn from_bytes(input: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(input).map_err(Error::Decode)?;
        Self::from_dynamic(&img)
    }

    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        let (w, h) = img.dimensions();
        tracing::trace!(width = w, height = h, color = ?img.color(), "converting image to RGB");
        Self::from_rgb_image(&img.to_rgb8())
    }

    pub fn from_rgb_image(img: &RgbImage) -> Result<Self> {
        let pixels = img
            .pixels()
            .map(|p| Srgb::new(p[0], p[1], p[2]))
            .collect();
        Self::new(img.width(), img.height(), pixels)
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let raw: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|c| [c.red, c.green, c.blue])
            .collect();
        RgbImage::from_raw(self.width, self.height, raw)
            .ok_or_else(|| Error::invalid_image("failed to rebuild image buffer"))
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let img = DynamicImage::ImageRgb8(self.to_rgb_image()?);
        let mut buf = Vec::new();
        {
            let mut cursor = std::io::Cursor::new(&mut buf);
            img.write_to(&mut cursor, ImageFormat::Png)
                .map_err(Error::Encode)?;
        }
        Ok(buf)
    }

    /// PNG bytes as standard base64 text.
    pub fn to_png_base64(&self) -> Result<String> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.to_png()?))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Pixel at column `x`, row `y`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[pixel_index(self.width, x, y)])
    }
}

/// Row-major offset, computed in `usize` so large images do not wrap.
#[inline(always)]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}
