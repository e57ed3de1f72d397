use std::fs;
use std::io;
use std::path::Path;

use image::RgbaImage;
use pdf_core::ImageData;

use crate::error::AssetLoadError;

/// A decoded logo with its alpha channel.
#[derive(Debug, Clone)]
pub struct Logo {
    image: RgbaImage,
}

impl Logo {
    /// Decode PNG or JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetLoadError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Logo { image })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AssetLoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| AssetLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Logo { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// RGB samples plus an alpha soft mask for PDF embedding.
    pub fn to_image_data(&self) -> io::Result<ImageData> {
        let (width, height) = self.image.dimensions();
        ImageData::from_rgba(width, height, self.image.as_raw())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
