//! Output reporters for analysis outcomes
//!
//! Supports two output formats:
//! - `text` - Terminal table plus the complexity/technique summary
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::engine::Outcome;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Warning for an empty snippet
pub const NO_CODE_WARNING: &str = "No code supplied. Pass a file or pipe a snippet to analyze.";

/// Warning when no trial produced a textual result
pub const NO_RESULT_WARNING: &str =
    "The code produced no result. Supply code whose functions return something.";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render options shared by all formats
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Include every candidate model's score
    pub explain: bool,
}

/// Render an outcome in the specified format
pub fn render(outcome: &Outcome, format: OutputFormat, options: RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render(outcome, options)),
        OutputFormat::Json => json::render(outcome, options),
    }
}
