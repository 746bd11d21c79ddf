use std::io::Cursor;

use image::{ImageFormat, ImageReader, RgbaImage};

/// Longest edge of the preview buffer kept for terminal rendering.
pub const PREVIEW_SIZE: u32 = 96;

/// A decoded gallery photo. Only the preview pixels are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct DishImage {
    pub source_url: String,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub preview: RgbaImage,
}

impl DishImage {
    /// Sniffs the format from magic bytes and decodes the whole image.
    pub fn decode(source_url: &str, bytes: &[u8]) -> Result<Self, String> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| format!("Failed to read image: {e}"))?;

        let format = reader
            .format()
            .ok_or_else(|| "Could not detect image format".to_string())?;

        let decoded = reader
            .decode()
            .map_err(|e| format!("Failed to decode image: {e}"))?;

        let (width, height) = (decoded.width(), decoded.height());
        let preview = if width > PREVIEW_SIZE || height > PREVIEW_SIZE {
            decoded.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE).to_rgba8()
        } else {
            decoded.to_rgba8()
        };

        Ok(Self {
            source_url: source_url.to_string(),
            format,
            width,
            height,
            preview,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn label(&self) -> String {
        let (width, height) = self.dimensions();
        format!(
            "{} {width}x{height}",
            self.format.extensions_str().first().unwrap_or(&"img")
        )
    }
}

/// One position of the gallery. Failed retrievals keep their index.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSlot {
    Loaded(DishImage),
    Missing { url: Option<String>, reason: String },
}

impl ImageSlot {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageSlot::Loaded(_))
    }
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("encode png fixture");
    buf.into_inner()
}
