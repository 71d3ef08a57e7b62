//! Analysis configuration
//!
//! Loads settings from, lowest priority first:
//! - `~/.config/asymptote/config.toml`
//! - `asymptote.toml` in the working directory (or an explicit `--config` file)
//! - the `ASYMPTOTE_PYTHON` environment variable
//!
//! CLI flags are applied on top by the caller.
//!
//! # Configuration Format
//!
//! ```toml
//! # asymptote.toml
//! runs = 3
//! samples = 5
//! seed = 42
//! noise_floor = 1e-6
//! language = "en"
//!
//! [sweep.polynomial]
//! start = 10
//! stop = 201
//! step = 20
//! ```

mod sweep;

pub use sweep::{SizeRange, SweepConfig};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

pub const PROJECT_CONFIG_FILE: &str = "asymptote.toml";

/// Display language for technique labels and the undetermined sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pt" | "pt-br" | "portuguese" => Ok(Language::Pt),
            "en" | "english" => Ok(Language::En),
            _ => bail!("Unknown language '{}'. Valid languages: pt, en", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Invocations per size; the mean is recorded
    pub runs: usize,
    /// Distinct sizes drawn per callable
    pub samples: usize,
    /// Seed for the size sweep; random when unset
    pub seed: Option<u64>,
    /// Samples at or below this many seconds are ignored by the fitter
    pub noise_floor: f64,
    /// Sizes at or above this evaluate `O(2^n)` to infinity
    pub exponential_cap: u64,
    pub sweep: SweepConfig,
    /// Interpreter used to run snippets
    pub python: String,
    pub language: Language,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            runs: 3,
            samples: 5,
            seed: None,
            noise_floor: 1e-6,
            exponential_cap: 30,
            sweep: SweepConfig::default(),
            python: "python3".to_string(),
            language: Language::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from all sources.
    ///
    /// `explicit` must exist and parse; the implicit files are skipped with a
    /// warning when broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::user_config_path().filter(|p| p.exists()) {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    debug!("Loaded user config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to load {}: {:#}", path.display(), e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        if let Some(path) = explicit {
            config = Self::from_file(path)?;
            debug!("Loaded config from {}", path.display());
        } else {
            let project = Path::new(PROJECT_CONFIG_FILE);
            if project.exists() {
                match Self::from_file(project) {
                    Ok(loaded) => {
                        debug!("Loaded project config from {}", project.display());
                        config = loaded;
                    }
                    Err(e) => warn!("Failed to load {}: {:#}", project.display(), e),
                }
            }
        }

        if let Ok(python) = std::env::var("ASYMPTOTE_PYTHON") {
            if !python.trim().is_empty() {
                config.python = python;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("asymptote").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            bail!("runs must be at least 1");
        }
        if self.samples == 0 {
            bail!("samples must be at least 1");
        }
        if !(self.noise_floor.is_finite() && self.noise_floor > 0.0) {
            bail!("noise_floor must be a positive number of seconds");
        }
        if self.python.trim().is_empty() {
            bail!("python interpreter must not be empty");
        }
        self.sweep.validate()
    }

    /// Commented example written by `asymptote init`
    pub fn example_toml() -> &'static str {
        r#"# asymptote configuration

# Invocations per input size (the mean is recorded)
runs = 3

# Distinct input sizes drawn per function
samples = 5

# Fix the size sweep for reproducible runs
# seed = 42

# Timings at or below this many seconds are ignored when fitting
noise_floor = 1e-6

# O(2^n) evaluates to infinity from this size on
exponential_cap = 30

# Interpreter used to run snippets (ASYMPTOTE_PYTHON overrides)
python = "python3"

# Technique labels: "pt" or "en"
language = "pt"

[sweep]
# A function counts as exponential-recursive when its name contains one of
# these hints or it calls itself at least this many times
exponential_hints = ["fib"]
recursion_threshold = 2

# Size ranges, Python range() semantics (stop is exclusive)
[sweep.polynomial]
start = 10
stop = 201
step = 20

[sweep.exponential]
start = 5
stop = 31
step = 5
"#
    }
}
