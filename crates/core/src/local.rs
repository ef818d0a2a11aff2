//! Local redaction pipeline: recognize, classify, redact.

use crate::types::{ImageHandle, PipelineState, ProcessingResult, ProgressEvent};
use crate::validate::validate_image;
use crate::{PipelineError, RedactionProvider, Result};
use docmask_ocr::{OcrEngine, TesseractConfig, TesseractEngine};
use docmask_pii::classify;
use docmask_redact::{apply_fallback_masks, redact_image};

/// Share of the visible [0,100] range covered by the recognition phase.
const RECOGNITION_SPAN: f32 = 90.0;

/// The local provider. Owns its engine; one request runs end-to-end, no
/// state crosses requests.
pub struct LocalPipeline {
    engine: Box<dyn OcrEngine>,
}

impl LocalPipeline {
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    /// Build a pipeline around the Tesseract CLI engine.
    pub fn with_tesseract(config: TesseractConfig) -> Result<Self> {
        let engine = TesseractEngine::new(config).map_err(PipelineError::Recognition)?;
        Ok(Self::new(Box::new(engine)))
    }

    fn run(
        &mut self,
        state: &mut PipelineState,
        image: &[u8],
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<ProcessingResult> {
        let source = validate_image(image)?;

        transition(state, PipelineState::Recognizing);

        let ocr = self.engine.recognize_image(&source, &mut |fraction| {
            let percent = fraction.clamp(0.0, 1.0) * RECOGNITION_SPAN;
            on_progress(ProgressEvent::new(percent, "Recognizing text"));
        })?;

        transition(state, PipelineState::Classifying);
        on_progress(ProgressEvent::new(92.0, "Classifying recognized text"));
        let matches = classify(&ocr.words);

        transition(state, PipelineState::Redacting);
        let masked = if matches.is_empty() {
            on_progress(ProgressEvent::new(96.0, "Applying fallback masks"));
            apply_fallback_masks(&source)
        } else {
            on_progress(ProgressEvent::new(96.0, "Redacting detected regions"));
            redact_image(&source, &matches)
        };

        transition(state, PipelineState::Complete);
        on_progress(ProgressEvent::new(100.0, "Complete"));

        Ok(ProcessingResult {
            image: ImageHandle::Raster(masked),
            detected_pii: matches,
            text: if ocr.text.is_empty() {
                None
            } else {
                Some(ocr.text)
            },
        })
    }
}

impl RedactionProvider for LocalPipeline {
    fn process(
        &mut self,
        image: &[u8],
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<ProcessingResult> {
        let mut state = PipelineState::Idle;
        match self.run(&mut state, image, on_progress) {
            Ok(result) => Ok(result),
            Err(e) => {
                log::warn!("[Pipeline] request failed, discarding partial work: {}", e);
                transition(&mut state, PipelineState::Failed);
                on_progress(ProgressEvent::neutral());
                Err(e)
            }
        }
    }
}

fn transition(state: &mut PipelineState, next: PipelineState) {
    log::debug!("[Pipeline] {} -> {}", state, next);
    *state = next;
}
