//! Remote backend provider.
//!
//! Delegates the whole request to a server with a single multipart
//! exchange and relays its JSON result; the local classifier and redaction
//! never run in this mode.

use crate::types::{ImageHandle, ProcessingResult, ProgressEvent};
use crate::validate::validate_image;
use crate::{PipelineError, RedactionProvider, Result};
use docmask_pii::PiiMatch;
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";

const GENERIC_FAILURE: &str = "failed to process image on server";

/// Response envelope of the processing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendResponse {
    success: bool,
    #[serde(default)]
    data: Option<BackendData>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendData {
    masked_image: String,
    // The server spells this key "detectedPII", not camel-case "detectedPii".
    #[serde(default, rename = "detectedPII")]
    detected_pii: Vec<PiiMatch>,
    #[serde(default)]
    original_image: Option<String>,
}

pub struct RemoteBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn upload(&self, image: &[u8]) -> Result<BackendData> {
        let part = reqwest::blocking::multipart::Part::bytes(image.to_vec())
            .file_name("document.png")
            .mime_str("application/octet-stream")
            .map_err(|e| PipelineError::Transport(e.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new().part("image", part);

        let url = format!("{}/image", self.base_url);
        log::info!("[Remote] uploading image to {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(PipelineError::Transport(extract_error_message(
                status.as_u16(),
                &body,
            )));
        }

        parse_success_body(&body)
    }
}

impl RedactionProvider for RemoteBackend {
    fn process(
        &mut self,
        image: &[u8],
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<ProcessingResult> {
        // Same input gate as the local pipeline; the decoded image is
        // discarded, only the bytes travel.
        validate_image(image)?;

        on_progress(ProgressEvent::new(10.0, "Uploading image"));
        on_progress(ProgressEvent::new(30.0, "Processing image on server"));

        let data = match self.upload(image) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("[Remote] request failed: {}", e);
                on_progress(ProgressEvent::neutral());
                return Err(e);
            }
        };

        on_progress(ProgressEvent::new(70.0, "Finalizing results"));

        log::info!(
            "[Remote] server reported {} detected PII entries",
            data.detected_pii.len()
        );
        if let Some(original) = &data.original_image {
            log::debug!("[Remote] original image reference: {}", original);
        }

        on_progress(ProgressEvent::new(100.0, "Complete"));

        Ok(ProcessingResult {
            image: ImageHandle::Remote(data.masked_image),
            detected_pii: data.detected_pii,
            text: None,
        })
    }
}

/// Decode a success-status body, honoring the `success: false` envelope.
fn parse_success_body(body: &str) -> Result<BackendData> {
    let envelope: BackendResponse = serde_json::from_str(body)
        .map_err(|_| PipelineError::Transport(GENERIC_FAILURE.to_string()))?;

    if !envelope.success {
        return Err(PipelineError::Transport(
            envelope.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| PipelineError::Transport(GENERIC_FAILURE.to_string()))
}

/// Pull the server's message out of an error body, falling back to a
/// generic HTTP error string.
fn extract_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<BackendResponse>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| format!("HTTP error, status: {}", status))
}
