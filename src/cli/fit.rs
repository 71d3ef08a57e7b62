//! Fit command: fit externally measured timings

use super::read_input;
use anyhow::{bail, Context, Result};
use asymptote::config::AnalysisConfig;
use asymptote::fit::{self, format_general, FitOptions};
use asymptote::reporters::OutputFormat;
use console::style;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum TimingPoint {
    Object { size: u64, elapsed: f64 },
    Pair(u64, f64),
}

impl From<TimingPoint> for (u64, f64) {
    fn from(point: TimingPoint) -> Self {
        match point {
            TimingPoint::Object { size, elapsed } => (size, elapsed),
            TimingPoint::Pair(size, elapsed) => (size, elapsed),
        }
    }
}

/// Parse a JSON array of points, or `size,elapsed` CSV lines
fn parse_points(content: &str) -> Result<Vec<(u64, f64)>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        let points: Vec<TimingPoint> =
            serde_json::from_str(trimmed).context("Invalid JSON timings")?;
        return Ok(points.into_iter().map(Into::into).collect());
    }

    let mut points = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((size, elapsed)) = line.split_once(',') else {
            bail!("line {}: expected 'size,elapsed', got '{}'", i + 1, line);
        };
        let (size, elapsed) = (size.trim(), elapsed.trim());
        match (size.parse::<u64>(), elapsed.parse::<f64>()) {
            (Ok(n), Ok(t)) => points.push((n, t)),
            // header row
            (Err(_), _) if points.is_empty() && size.parse::<f64>().is_err() => continue,
            _ => bail!("line {}: cannot parse '{}'", i + 1, line),
        }
    }
    Ok(points)
}

pub fn run(file: &Path, format: &str, explain: bool, config: &AnalysisConfig) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let content = read_input(Some(file))?;
    let points = parse_points(&content)?;
    if points.is_empty() {
        bail!("No timings found in {}", file.display());
    }

    let result = fit::fit(&points, &FitOptions::from(config));
    let language = config.language;

    match format {
        OutputFormat::Json => {
            let value = json!({
                "complexity": result.summary(language),
                "name": result.model_name(language),
                "fit": result,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            if explain {
                println!("{}", style("MODEL SCORES").bold());
                for score in &result.candidates {
                    let marker = if Some(score.model) == result.model { "*" } else { " " };
                    println!(
                        " {} {:<11} MAPE: {:>10.3}  a: {}",
                        marker,
                        score.model.notation(),
                        score.mape,
                        format_general(score.coefficient, 3)
                    );
                }
                println!();
            }
            println!(
                "{} {}",
                style("Complexity:").bold(),
                result.summary(language)
            );
            if result.is_undetermined() {
                eprintln!(
                    "{} {} of {} points above the noise floor",
                    style("note:").dim(),
                    result.points_used,
                    points.len()
                );
            }
        }
    }
    Ok(())
}
