//! Classify command: technique labels from source text only

use super::read_input;
use anyhow::Result;
use asymptote::config::Language;
use asymptote::reporters::OutputFormat;
use asymptote::technique;
use serde_json::json;
use std::path::Path;

pub fn run(file: Option<&Path>, format: &str, language: Language) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let source = read_input(file)?;
    let techniques = technique::classify(&source);

    match format {
        OutputFormat::Text => println!("Technique: {}", techniques.render(language)),
        OutputFormat::Json => {
            let labels: Vec<&str> = techniques.iter().map(|t| t.label(language)).collect();
            let value = json!({
                "technique": techniques.render(language),
                "techniques": labels,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
