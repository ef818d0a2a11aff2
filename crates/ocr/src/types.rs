//! Shared recognition types.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in image pixel coordinates.
///
/// Invariant: `x1 >= x0` and `y1 >= y0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBox {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl WordBox {
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i64 {
        self.y1 - self.y0
    }
}

/// A single recognized text fragment with its location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub bbox: WordBox,
}

/// Result of one recognition call: ordered words plus the raw full text.
#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    pub words: Vec<RecognizedWord>,
    pub text: String,
}

/// Tesseract CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TesseractConfig {
    /// Path to the tesseract executable.
    pub binary_path: Option<String>,
    /// tessdata directory.
    pub tessdata_path: Option<String>,
    /// Language hint, e.g. "hin+eng" for simultaneous Hindi and English.
    pub lang: Option<String>,
    /// Page segmentation mode (0-13).
    pub psm: Option<u8>,
    /// OCR engine mode (0-3).
    pub oem: Option<u8>,
}

impl TesseractConfig {
    pub fn lang_or_default(&self) -> &str {
        self.lang.as_deref().unwrap_or("hin+eng")
    }

    pub fn psm_or_default(&self) -> u8 {
        self.psm.unwrap_or(6)
    }

    pub fn oem_or_default(&self) -> u8 {
        self.oem.unwrap_or(1)
    }
}

/// Installation status of the Tesseract engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TesseractStatus {
    pub installed: bool,
    pub version: Option<String>,
    pub binary_path: Option<String>,
    pub available_langs: Vec<String>,
    pub error: Option<String>,
}
