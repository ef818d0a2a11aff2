//! Shared pipeline types.

use docmask_pii::PiiMatch;
use image::RgbaImage;
use serde::Serialize;

/// Progress notification, percentage in [0,100] plus a phase label.
///
/// Emissions are transient UI hints: zero or more per request, "last
/// received wins", never a correctness signal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub percent: f32,
    pub status: String,
}

impl ProgressEvent {
    pub fn new(percent: f32, status: impl Into<String>) -> Self {
        Self {
            percent,
            status: status.into(),
        }
    }

    /// Neutral event emitted when a failed request resets its progress.
    pub fn neutral() -> Self {
        Self {
            percent: 0.0,
            status: String::new(),
        }
    }
}

/// Per-request state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Recognizing,
    Classifying,
    Redacting,
    Complete,
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Recognizing => "recognizing",
            PipelineState::Classifying => "classifying",
            PipelineState::Redacting => "redacting",
            PipelineState::Complete => "complete",
            PipelineState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Masked image handle: a raster produced locally, or the reference the
/// remote backend returned.
pub enum ImageHandle {
    Raster(RgbaImage),
    Remote(String),
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageHandle::Raster(img) => {
                write!(f, "Raster({}x{})", img.width(), img.height())
            }
            ImageHandle::Remote(reference) => write!(f, "Remote({})", reference),
        }
    }
}

/// Terminal output of one request.
#[derive(Debug)]
pub struct ProcessingResult {
    pub image: ImageHandle,
    /// Matches in recognition order; empty when the fallback masking ran.
    pub detected_pii: Vec<PiiMatch>,
    /// Raw recognized text, when the provider produced it.
    pub text: Option<String>,
}
