//! Command-line surface for the docmask pipeline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docmask_core::{build_provider, load_config, ImageHandle, ProviderKind};
use docmask_ocr::detect_tesseract_status;
use docmask_pii::mask_snippet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docmask", about = "Redact PII from photographed identity documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect and mask PII in a document photo.
    Process {
        /// Input image (JPG, PNG or WebP).
        input: PathBuf,
        /// Output path for the masked image; defaults to <input>_masked.png.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration file.
        #[arg(long, default_value = "docmask.json")]
        config: PathBuf,
        /// Override the configured provider.
        #[arg(long)]
        provider: Option<ProviderArg>,
        /// Override the recognition language hint, e.g. "hin+eng".
        #[arg(long)]
        lang: Option<String>,
        /// Also print the raw recognized text.
        #[arg(long)]
        text: bool,
    },
    /// Report recognition engine availability.
    Status {
        /// Configuration file.
        #[arg(long, default_value = "docmask.json")]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Local,
    Remote,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Local => ProviderKind::Local,
            ProviderArg::Remote => ProviderKind::Remote,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Process {
            input,
            output,
            config,
            provider,
            lang,
            text,
        } => process(&input, output, &config, provider, lang, text),
        Command::Status { config } => status(&config),
    }
}

fn process(
    input: &Path,
    output: Option<PathBuf>,
    config_path: &Path,
    provider: Option<ProviderArg>,
    lang: Option<String>,
    print_text: bool,
) -> Result<()> {
    let mut config = load_config(config_path).context("failed to load configuration")?;
    if let Some(provider) = provider {
        config.provider = provider.into();
    }
    if let Some(lang) = lang {
        config.tesseract.get_or_insert_with(Default::default).lang = Some(lang);
    }

    let image = fs::read(input)
        .with_context(|| format!("failed to read input image {}", input.display()))?;

    log::info!("[Cli] processing {} with the {} provider", input.display(), config.provider);

    let mut provider = build_provider(&config)?;
    let result = provider.process(&image, &mut |event| {
        log::info!("[Progress] {:>3.0}% {}", event.percent, event.status);
    })?;

    match result.image {
        ImageHandle::Raster(masked) => {
            let output = output.unwrap_or_else(|| default_output_path(input));
            masked
                .save(&output)
                .with_context(|| format!("failed to write masked image {}", output.display()))?;
            println!("masked image written to {}", output.display());
        }
        ImageHandle::Remote(reference) => {
            println!("masked image available at {}", reference);
        }
    }

    let summary: Vec<serde_json::Value> = result
        .detected_pii
        .iter()
        .map(|m| {
            serde_json::json!({
                "type": m.pii_type.to_string(),
                "text": mask_snippet(&m.text),
                "bbox": m.bbox,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if print_text {
        if let Some(text) = &result.text {
            println!("{}", text);
        }
    }

    Ok(())
}

fn status(config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("failed to load configuration")?;
    let tesseract = config.tesseract.unwrap_or_default();
    let status = detect_tesseract_status(&tesseract);
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{}_masked.png", stem))
}
