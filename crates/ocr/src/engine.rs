//! Recognition engine trait.

use crate::error::OcrError;
use crate::types::OcrOutput;
use image::DynamicImage;

/// Unified recognition engine interface.
///
/// `on_progress` receives a fraction in [0,1] during recognition. Callbacks
/// are best-effort hints at the engine's own cadence; callers must treat the
/// last received value as current and never rely on them for correctness.
pub trait OcrEngine: Send {
    /// Recognize text in an in-memory image.
    fn recognize_image(
        &mut self,
        img: &DynamicImage,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<OcrOutput, OcrError>;

    /// Recognize text in an image file.
    fn recognize_file(
        &mut self,
        image_path: &str,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<OcrOutput, OcrError> {
        let img = image::open(image_path)
            .map_err(|e| OcrError::ImageProcess(format!("failed to open image: {}", e)))?;
        self.recognize_image(&img, on_progress)
    }
}
