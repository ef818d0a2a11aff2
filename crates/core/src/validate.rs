//! Input validation, applied before any processing begins.

use crate::PipelineError;
use image::{DynamicImage, ImageFormat};

/// Upper bound on the input image size.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Validate and decode the input image.
///
/// Rejections create no partial state: empty input, oversized input and
/// anything that is not PNG, JPEG or WebP fail here.
pub fn validate_image(bytes: &[u8]) -> crate::Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(PipelineError::Validation("image data is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(PipelineError::Validation(
            "image exceeds the 10 MiB limit".to_string(),
        ));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| PipelineError::Validation("unrecognized image format".to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => {}
        _ => {
            return Err(PipelineError::Validation(
                "unsupported image format, use JPG, PNG or WebP".to_string(),
            ))
        }
    }

    image::load_from_memory_with_format(bytes, format)
        .map_err(|_| PipelineError::Validation("image data could not be decoded".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn accepts_png() {
        let img = validate_image(&png_bytes(4, 4)).unwrap();
        assert_eq!(img.width(), 4);
    }

    #[test]
    fn rejects_empty_input() {
        let err = validate_image(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn rejects_oversized_input() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = validate_image(&bytes).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
        assert!(err.to_string().contains("10 MiB"));
    }

    #[test]
    fn rejects_non_image_data() {
        let err = validate_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn rejects_unsupported_formats() {
        // A valid BMP header decodes with `image` but is not an accepted
        // upload format.
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)
            .unwrap();
        let err = validate_image(&bytes).unwrap_err();
        assert!(err.to_string().contains("unsupported image format"));
    }
}
