//! Text recognition for photographed identity documents.
//!
//! Wraps the Tesseract CLI behind the [`OcrEngine`] trait and produces
//! word-level fragments with pixel bounding boxes.

mod engine;
mod error;
mod tesseract;
mod types;

pub use engine::OcrEngine;
pub use error::OcrError;
pub use tesseract::{detect_tesseract_status, get_tesseract_langs, get_tesseract_version, TesseractEngine};
pub use types::{OcrOutput, RecognizedWord, TesseractConfig, TesseractStatus, WordBox};
