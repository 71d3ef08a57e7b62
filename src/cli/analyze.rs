//! Analyze command: profile a snippet and report its complexity

use super::{read_input, write_output, AnalyzeArgs};
use anyhow::{bail, Result};
use asymptote::config::AnalysisConfig;
use asymptote::engine::{Analyzer, EngineError, Outcome, Progress};
use asymptote::reporters::{self, OutputFormat, RenderOptions};
use asymptote::runtime::PythonRuntime;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub fn run(file: Option<&Path>, config_path: Option<&Path>, args: &AnalyzeArgs) -> Result<()> {
    let start = Instant::now();
    let format: OutputFormat = args.format.parse()?;
    let mut config = AnalysisConfig::load(config_path)?;
    args.apply(&mut config)?;

    let source = read_input(file)?;
    let mut runtime = PythonRuntime::new(config.python.clone());
    if !source.trim().is_empty() && !runtime.is_available() {
        bail!(
            "Python interpreter '{}' not found. Install Python 3 or pass --python <path>.",
            runtime.program()
        );
    }

    let samples_per_callable = config.samples as u64;
    let analyzer = Analyzer::new(config);

    let bar = if args.no_progress || format == OutputFormat::Json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    bar.set_style(create_bar_style());
    bar.set_message("Loading snippet...");

    let result = analyzer.analyze_with(&mut runtime, &source, |event| match event {
        Progress::Discovered(callables) => {
            bar.set_length(expected_samples(callables.len(), samples_per_callable));
        }
        Progress::Sample { callable, sample } => {
            bar.set_message(format!("{} (n={})", callable, sample.size));
            bar.inc(1);
        }
    });
    bar.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(EngineError::Execution {
            callable: Some(name),
            message,
        }) => bail!("{} failed: {}", name, message),
        Err(e) => bail!("{}", e),
    };

    let rendered = reporters::render(
        &outcome,
        format,
        RenderOptions {
            explain: args.explain,
        },
    )?;
    write_output(&rendered, args.output.as_deref())?;

    if let Outcome::Report(report) = &outcome {
        info!(
            "Analyzed {} trials in {:.2}s",
            report.rows.len(),
            start.elapsed().as_secs_f64()
        );
        if format == OutputFormat::Text && args.output.is_none() && report.fit.is_undetermined() {
            eprintln!(
                "{} too few timings above the noise floor to fit a model",
                style("note:").dim()
            );
        }
    }
    Ok(())
}

/// Samples the bar should expect; a snippet without callables runs once
fn expected_samples(callables: usize, samples_per_callable: u64) -> u64 {
    if callables == 0 {
        1
    } else {
        callables as u64 * samples_per_callable
    }
}

fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("█▓▒░  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_samples() {
        assert_eq!(expected_samples(0, 5), 1);
        assert_eq!(expected_samples(1, 5), 5);
        assert_eq!(expected_samples(3, 5), 15);
    }
}
