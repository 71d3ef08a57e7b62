//! CLI command definitions and handlers

mod analyze;
mod classify;
mod fit;
mod init;

use anyhow::{Context, Result};
use asymptote::config::{AnalysisConfig, Language};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse and validate the runs count (1-1000)
fn parse_runs(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("runs must be at least 1".to_string())
    } else if n > 1000 {
        Err("runs cannot exceed 1000".to_string())
    } else {
        Ok(n)
    }
}

fn parse_noise_floor(s: &str) -> Result<f64, String> {
    let v: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err("noise floor must be a positive number of seconds".to_string())
    }
}

/// Asymptote - empirical complexity profiler
///
/// Runs the functions in a code snippet over growing inputs, fits the timings
/// to a Big-O catalog and labels the algorithmic technique.
#[derive(Parser, Debug)]
#[command(name = "asymptote")]
#[command(
    version,
    args_conflicts_with_subcommands = true,
    about = "Empirical complexity profiler: time the functions in a snippet and fit a Big-O model",
    long_about = "Asymptote executes every function a Python snippet defines over a sweep of \
synthetic input sizes, averages the wall-clock time of repeated runs, fits the \
(size, time) pairs against O(1), O(log n), O(n), O(n log n), O(n^2), O(n^3) and O(2^n), \
and labels the technique (recursion, divide and conquer, dynamic programming, ...) \
from the source text.\n\n\
The snippet runs unsandboxed in a local Python interpreter. Only analyze code you trust.",
    after_help = "\
Examples:
  asymptote sort.py                      Analyze a snippet
  cat sort.py | asymptote -              Read the snippet from stdin
  asymptote sort.py --format json        JSON output for scripting
  asymptote sort.py --seed 7 --explain   Reproducible sweep, show every model score
  asymptote classify sort.py             Technique labels only, nothing is executed
  asymptote fit timings.json             Fit (size, elapsed) pairs measured elsewhere
  asymptote init                         Write an example asymptote.toml"
)]
pub struct Cli {
    /// Snippet to analyze ('-' or omitted reads stdin)
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ./asymptote.toml, then ~/.config/asymptote/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for a full analysis
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Output format: text, json
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Show the score of every candidate model
    #[arg(long)]
    pub explain: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Invocations per input size (1-1000)
    #[arg(long, value_parser = parse_runs)]
    pub runs: Option<usize>,

    /// Distinct input sizes per function
    #[arg(long)]
    pub samples: Option<usize>,

    /// Seed for the size sweep
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ignore timings at or below this many seconds
    #[arg(long, value_parser = parse_noise_floor)]
    pub noise_floor: Option<f64>,

    /// Python interpreter used to run the snippet (default: $ASYMPTOTE_PYTHON or python3)
    #[arg(long)]
    pub python: Option<String>,

    /// Label language: pt, en
    #[arg(long, value_parser = ["pt", "en"])]
    pub language: Option<String>,
}

impl AnalyzeArgs {
    /// Apply CLI overrides on top of the loaded configuration
    fn apply(&self, config: &mut AnalysisConfig) -> Result<()> {
        if let Some(runs) = self.runs {
            config.runs = runs;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(noise_floor) = self.noise_floor {
            config.noise_floor = noise_floor;
        }
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.parse()?;
        }
        config.validate()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Profile every function in a snippet and fit its complexity (default)
    Analyze {
        /// Snippet to analyze ('-' or omitted reads stdin)
        file: Option<PathBuf>,

        #[command(flatten)]
        args: AnalyzeArgs,
    },

    /// Label the algorithmic technique from the source text, without running it
    Classify {
        /// Snippet to classify ('-' or omitted reads stdin)
        file: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Label language: pt, en
        #[arg(long, value_parser = ["pt", "en"])]
        language: Option<String>,
    },

    /// Fit (size, elapsed) pairs from a JSON or CSV file
    #[command(after_help = "\
Accepted inputs:
  [{\"size\": 10, \"elapsed\": 0.0012}, ...]    JSON objects
  [[10, 0.0012], ...]                         JSON pairs
  size,elapsed                                CSV, header optional
  10,0.0012")]
    Fit {
        /// Timings file ('-' reads stdin)
        file: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Show the score of every candidate model
        #[arg(long)]
        explain: bool,

        /// Ignore timings at or below this many seconds
        #[arg(long, value_parser = parse_noise_floor)]
        noise_floor: Option<f64>,

        /// Label language: pt, en
        #[arg(long, value_parser = ["pt", "en"])]
        language: Option<String>,
    },

    /// Write an example asymptote.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        None => analyze::run(cli.file.as_deref(), config_path, &cli.analyze),
        Some(Commands::Analyze { file, args }) => analyze::run(file.as_deref(), config_path, &args),
        Some(Commands::Classify {
            file,
            format,
            language,
        }) => {
            let config = AnalysisConfig::load(config_path)?;
            let language = resolve_language(language.as_deref(), config.language)?;
            classify::run(file.as_deref(), &format, language)
        }
        Some(Commands::Fit {
            file,
            format,
            explain,
            noise_floor,
            language,
        }) => {
            let mut config = AnalysisConfig::load(config_path)?;
            if let Some(noise_floor) = noise_floor {
                config.noise_floor = noise_floor;
            }
            config.language = resolve_language(language.as_deref(), config.language)?;
            fit::run(&file, &format, explain, &config)
        }
        Some(Commands::Init { force }) => init::run(Path::new("."), force),
    }
}

fn resolve_language(flag: Option<&str>, configured: Language) -> Result<Language> {
    match flag {
        Some(s) => s.parse(),
        None => Ok(configured),
    }
}

/// Read a snippet from a file, or from stdin for `-` / no path
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Write rendered output to a file or stdout
fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
