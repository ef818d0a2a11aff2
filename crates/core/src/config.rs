//! JSON configuration for provider selection and engine settings.

use docmask_ocr::TesseractConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which redaction provider handles requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Recognize, classify and redact in-process.
    #[default]
    Local,
    /// Delegate the whole request to the processing server.
    Remote,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Local => write!(f, "local"),
            ProviderKind::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Selected provider.
    pub provider: ProviderKind,
    /// Tesseract settings for the local provider.
    pub tesseract: Option<TesseractConfig>,
    /// Base URL of the remote provider.
    pub api_base_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load the configuration; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let raw = serde_json::to_string_pretty(config)?;
    fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/docmask.json")).unwrap();
        assert_eq!(config.provider, ProviderKind::Local);
        assert!(config.tesseract.is_none());
    }

    #[test]
    fn round_trip() {
        let path = std::env::temp_dir().join(format!("docmask_config_{}.json", std::process::id()));

        let config = AppConfig {
            provider: ProviderKind::Remote,
            tesseract: Some(TesseractConfig {
                lang: Some("hin+eng".to_string()),
                ..Default::default()
            }),
            api_base_url: Some("http://localhost:3000/api/v1".to_string()),
        };
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.provider, ProviderKind::Remote);
        assert_eq!(loaded.tesseract.unwrap().lang.as_deref(), Some("hin+eng"));
        assert_eq!(loaded.api_base_url.as_deref(), Some("http://localhost:3000/api/v1"));
    }

    #[test]
    fn provider_field_uses_lowercase_tags() {
        let json = serde_json::to_value(AppConfig {
            provider: ProviderKind::Remote,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["provider"], "remote");
    }
}
