//! Pipeline orchestration for document PII redaction.
//!
//! Two interchangeable providers implement the same contract: a local
//! pipeline (recognize, classify, redact) and a remote backend that
//! delegates the whole request to a server.

pub mod config;
mod local;
mod remote;
mod types;
mod validate;

pub use config::{load_config, save_config, AppConfig, ConfigError, ProviderKind};
pub use local::LocalPipeline;
pub use remote::{RemoteBackend, DEFAULT_API_BASE_URL};
pub use types::{ImageHandle, PipelineState, ProcessingResult, ProgressEvent};
pub use validate::{validate_image, MAX_IMAGE_BYTES};

use docmask_ocr::OcrError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Request-level failures.
///
/// Any failure aborts the whole request; no partial result survives.
/// Messages stay generic and never embed recognized text or PII values.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input rejected before any processing began.
    #[error("invalid input image: {0}")]
    Validation(String),

    /// The recognition engine could not process the image.
    #[error("text recognition failed ({0}); ensure the image is clear and try again")]
    Recognition(#[from] OcrError),

    /// Remote mode only: network failure or non-success response.
    #[error("server processing failed: {0}")]
    Transport(String),
}

/// One asynchronous redaction request: image in, masked result out, with
/// best-effort progress notifications along the way.
pub trait RedactionProvider: Send {
    fn process(
        &mut self,
        image: &[u8],
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<ProcessingResult>;
}

/// Build the provider selected by the configuration.
pub fn build_provider(config: &AppConfig) -> Result<Box<dyn RedactionProvider>> {
    match config.provider {
        ProviderKind::Local => {
            let tesseract = config.tesseract.clone().unwrap_or_default();
            Ok(Box::new(LocalPipeline::with_tesseract(tesseract)?))
        }
        ProviderKind::Remote => {
            let base_url = config
                .api_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
            Ok(Box::new(RemoteBackend::new(base_url)))
        }
    }
}
