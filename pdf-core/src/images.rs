/// Opaque handle to an image embedded in a PdfDocument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// PDF color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }

    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceGray => 1,
        }
    }
}

/// Decoded 8-bit image data ready for embedding into a PDF.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    /// Raw pixel samples (RGB or Gray), row-major.
    pub data: Vec<u8>,
    /// Separate alpha channel (grayscale), if present.
    pub smask_data: Option<Vec<u8>>,
}

impl ImageData {
    /// Split interleaved RGBA samples into RGB data and an alpha
    /// soft mask. The mask is dropped when every pixel is opaque.
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Self, String> {
        let pixel_count = width as usize * height as usize;
        if rgba.len() != pixel_count * 4 {
            return Err(format!(
                "RGBA buffer holds {} bytes, expected {} for {}x{}",
                rgba.len(),
                pixel_count * 4,
                width,
                height
            ));
        }
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for chunk in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
            alpha.push(chunk[3]);
        }
        let smask_data = if alpha.iter().all(|&a| a == 255) {
            None
        } else {
            Some(alpha)
        };
        Ok(ImageData {
            width,
            height,
            color_space: ColorSpace::DeviceRGB,
            data: rgb,
            smask_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_split_keeps_alpha() {
        let rgba = [10, 20, 30, 0, 40, 50, 60, 255];
        let img = ImageData::from_rgba(2, 1, &rgba).unwrap();
        assert_eq!(img.data, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(img.smask_data, Some(vec![0, 255]));
    }

    #[test]
    fn opaque_rgba_has_no_mask() {
        let rgba = [1, 2, 3, 255];
        let img = ImageData::from_rgba(1, 1, &rgba).unwrap();
        assert!(img.smask_data.is_none());
    }

    #[test]
    fn wrong_buffer_length_is_rejected() {
        assert!(ImageData::from_rgba(2, 2, &[0; 4]).is_err());
    }
}
