//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod formats;
pub mod process;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use rcpt_core::models::config::RcptConfig;

/// Load the configuration named by `--config`, else the default file if it
/// exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RcptConfig> {
    if let Some(path) = config_path {
        return Ok(RcptConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(RcptConfig::from_file(&default_path)?)
    } else {
        Ok(RcptConfig::default())
    }
}

/// Upload payload as posted by the mobile client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadPayload {
    #[serde(default)]
    image_id: Option<String>,
    ocr_text: String,
}

/// Whether `path` is an input the CLI can read.
pub fn is_supported_input(path: &Path) -> bool {
    matches!(extension(path).as_str(), "txt" | "text" | "json")
}

/// Read OCR text from a `.txt` dump, a `.json` upload payload, or stdin (`-`).
pub fn read_ocr_text(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    match extension(input).as_str() {
        "txt" | "text" => Ok(fs::read_to_string(input)?),
        "json" => {
            let payload: UploadPayload = serde_json::from_str(&fs::read_to_string(input)?)?;
            if let Some(image_id) = &payload.image_id {
                debug!("Upload payload for image {}", image_id);
            }
            Ok(payload.ocr_text)
        }
        other => anyhow::bail!("Unsupported file format: {}", other),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Output path for `input` inside `output_dir`.
pub fn output_path_for(input: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");

    output_dir.join(format!("{}.{}", stem, extension))
}
