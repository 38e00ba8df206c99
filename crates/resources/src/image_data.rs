//! Texture image decoding.

use std::path::Path;

use tracing::info;

use crate::error::ResourceResult;

/// Decoded image: tightly-packed RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel bytes, row-major, no padding.
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Bytes per pixel.
    pub const ELEMENT_SIZE: usize = 4;

    /// Decodes an image file into RGBA8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: &Path) -> ResourceResult<Self> {
        let decoded = image::open(path)?.into_rgba8();
        let (width, height) = decoded.dimensions();

        info!("Loaded image {}: {}x{}", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels: decoded.into_raw(),
        })
    }

    /// Decodes image bytes from memory into RGBA8.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be decoded.
    pub fn from_bytes(bytes: &[u8]) -> ResourceResult<Self> {
        let decoded = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = decoded.dimensions();

        Ok(Self {
            width,
            height,
            pixels: decoded.into_raw(),
        })
    }

    /// Total byte length of the pixel data.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        // A 2x2 image encoded in-process so the test needs no files
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, image::Rgba([255, 255, 255, 255]));

        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    #[test]
    fn test_decode_round_trip() {
        let data = ImageData::from_bytes(&tiny_png()).unwrap();
        assert_eq!(data.width, 2);
        assert_eq!(data.height, 2);
        assert_eq!(data.byte_len(), 2 * 2 * ImageData::ELEMENT_SIZE);
        // First pixel survives the encode/decode round trip exactly
        assert_eq!(&data.pixels[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_invalid_bytes_error() {
        assert!(ImageData::from_bytes(b"not an image").is_err());
    }
}
