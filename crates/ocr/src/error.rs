//! Recognition error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("recognition engine failed: {0}")]
    Engine(String),

    #[error("image processing failed: {0}")]
    ImageProcess(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
