//! Tesseract OCR engine (CLI wrapper).

use image::DynamicImage;
use std::process::Command;
use std::time::Instant;

use crate::engine::OcrEngine;
use crate::error::OcrError;
use crate::types::{OcrOutput, RecognizedWord, TesseractConfig, TesseractStatus, WordBox};

/// Tesseract CLI engine.
///
/// Shells out to the `tesseract` binary and parses its word-level TSV
/// output. The CLI gives no incremental progress, so recognition emits a
/// few coarse checkpoints around the blocking call.
pub struct TesseractEngine {
    config: TesseractConfig,
    version: String,
}

impl TesseractEngine {
    /// Create an engine, probing the binary for availability.
    pub fn new(config: TesseractConfig) -> Result<Self, OcrError> {
        let binary = config.binary_path.as_deref().unwrap_or("tesseract");
        let version = get_tesseract_version(binary)?;

        log::info!("[Tesseract] initialized, version: {}", version);

        Ok(Self { config, version })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn binary_path(&self) -> &str {
        self.config.binary_path.as_deref().unwrap_or("tesseract")
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize_image(
        &mut self,
        img: &DynamicImage,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<OcrOutput, OcrError> {
        let start = Instant::now();

        let temp_dir = std::env::temp_dir();
        let temp_input = temp_dir.join(format!("docmask_input_{}.png", std::process::id()));

        img.save(&temp_input)
            .map_err(|e| OcrError::ImageProcess(format!("failed to save temp image: {}", e)))?;
        on_progress(0.1);

        let result = self.recognize_file(temp_input.to_string_lossy().as_ref(), on_progress);

        let _ = std::fs::remove_file(&temp_input);

        if let Ok(output) = &result {
            log::info!(
                "[Tesseract] recognition done in {} ms, {} words",
                start.elapsed().as_millis(),
                output.words.len()
            );
        }

        result
    }

    fn recognize_file(
        &mut self,
        image_path: &str,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<OcrOutput, OcrError> {
        let mut cmd = Command::new(self.binary_path());

        cmd.arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(self.config.lang_or_default())
            .arg("--psm")
            .arg(self.config.psm_or_default().to_string())
            .arg("--oem")
            .arg(self.config.oem_or_default().to_string())
            .arg("tsv");

        if let Some(tessdata_path) = &self.config.tessdata_path {
            cmd.env("TESSDATA_PREFIX", tessdata_path);
        }

        log::info!(
            "[Tesseract] running: {} {} -l {} --psm {} --oem {} tsv",
            self.binary_path(),
            image_path,
            self.config.lang_or_default(),
            self.config.psm_or_default(),
            self.config.oem_or_default()
        );

        on_progress(0.3);

        let output = cmd
            .output()
            .map_err(|e| OcrError::Engine(format!("failed to launch tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!("tesseract exited with error: {}", stderr)));
        }

        on_progress(0.9);

        let tsv_output = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_tesseract_tsv(&tsv_output);

        on_progress(1.0);

        Ok(parsed)
    }
}

/// Parse word-level Tesseract TSV output.
///
/// TSV columns:
/// level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
///
/// Keeps only word rows (level 5) with non-empty text and non-negative
/// confidence. Bounding boxes stay in pixel coordinates so downstream
/// masking maps 1:1 onto the source raster. The full text is rebuilt from
/// the word rows, one output line per TSV line.
fn parse_tesseract_tsv(tsv: &str) -> OcrOutput {
    let mut words = Vec::new();
    let mut text = String::new();
    let mut last_line: Option<(i32, i32, i32)> = None;

    for line in tsv.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }

        let level: i32 = cols[0].parse().unwrap_or(-1);
        let block: i32 = cols[2].parse().unwrap_or(0);
        let par: i32 = cols[3].parse().unwrap_or(0);
        let line_num: i32 = cols[4].parse().unwrap_or(0);
        let left: i64 = cols[6].parse().unwrap_or(0);
        let top: i64 = cols[7].parse().unwrap_or(0);
        let width: i64 = cols[8].parse().unwrap_or(0);
        let height: i64 = cols[9].parse().unwrap_or(0);
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        let word_text = cols[11].trim();

        if level != 5 || word_text.is_empty() || conf < 0.0 {
            continue;
        }

        let line_key = (block, par, line_num);
        match last_line {
            Some(prev) if prev == line_key => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        last_line = Some(line_key);
        text.push_str(word_text);

        words.push(RecognizedWord {
            text: word_text.to_string(),
            // Tesseract reports confidence as 0-100.
            confidence: Some(conf / 100.0),
            bbox: WordBox::new(left, top, left + width, top + height),
        });
    }

    OcrOutput { words, text }
}

/// Query the installed Tesseract version.
pub fn get_tesseract_version(binary_path: &str) -> Result<String, OcrError> {
    let output = Command::new(binary_path)
        .arg("--version")
        .output()
        .map_err(|e| OcrError::Engine(format!("cannot execute tesseract: {}", e)))?;

    if !output.status.success() {
        return Err(OcrError::Engine("tesseract --version failed".to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{}{}", stdout, stderr);

    // Version is usually on the first line: "tesseract 5.3.0" or "tesseract v5.3.0".
    for line in combined.lines() {
        if line.contains("tesseract") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 2 {
                return Ok(parts[1].trim_start_matches('v').to_string());
            }
        }
    }

    Ok("unknown".to_string())
}

/// List the languages the installed Tesseract supports.
pub fn get_tesseract_langs(
    binary_path: &str,
    tessdata_path: Option<&str>,
) -> Result<Vec<String>, OcrError> {
    let mut cmd = Command::new(binary_path);
    cmd.arg("--list-langs");

    if let Some(path) = tessdata_path {
        cmd.env("TESSDATA_PREFIX", path);
    }

    let output = cmd
        .output()
        .map_err(|e| OcrError::Engine(format!("cannot execute tesseract: {}", e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{}{}", stdout, stderr);

    let mut langs = Vec::new();
    let mut found_list = false;

    for line in combined.lines() {
        let line = line.trim();
        if line.contains("List of available languages") || line.contains("traineddata") {
            found_list = true;
            continue;
        }
        if found_list && !line.is_empty() && !line.contains(':') {
            langs.push(line.to_string());
        }
    }

    Ok(langs)
}

/// Probe the Tesseract installation.
pub fn detect_tesseract_status(config: &TesseractConfig) -> TesseractStatus {
    let binary_path = config.binary_path.as_deref().unwrap_or("tesseract");

    if let Ok(version) = get_tesseract_version(binary_path) {
        let langs =
            get_tesseract_langs(binary_path, config.tessdata_path.as_deref()).unwrap_or_default();
        return TesseractStatus {
            installed: true,
            version: Some(version),
            binary_path: which_tesseract(binary_path),
            available_langs: langs,
            error: None,
        };
    }

    TesseractStatus {
        installed: false,
        version: None,
        binary_path: None,
        available_langs: Vec::new(),
        error: Some("tesseract not found; install it and make sure it is on PATH".to_string()),
    }
}

/// Resolve the full path of the tesseract executable.
fn which_tesseract(binary: &str) -> Option<String> {
    #[cfg(target_os = "windows")]
    let finder = "where";
    #[cfg(not(target_os = "windows"))]
    let finder = "which";

    let cmd = Command::new(finder).arg(binary).output();
    cmd.ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_string()
        })
        .filter(|s| !s.is_empty())
}
