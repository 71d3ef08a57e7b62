//! Analysis orchestration
//!
//! Loads a snippet through a [`Runtime`], profiles every callable it defines,
//! fits the pooled samples and classifies the source text.

use crate::config::{AnalysisConfig, Language};
use crate::fit::{self, FitOptions, FitResult};
use crate::harness::Harness;
use crate::models::{CallableInfo, Sample, TrialRow};
use crate::runtime::{Runtime, RuntimeError};
use crate::technique::{self, TechniqueSet};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name given to the single trial of a snippet without callables
pub const SCRIPT_TRIAL: &str = "<script>";

/// Placeholder shown when the snippet produced no result
pub const EMPTY_SUMMARY: &str = "Complexity: -\nTechnique: -";

#[derive(Error, Debug)]
pub enum EngineError {
    /// User code raised while loading or during a trial
    #[error("{message}")]
    Execution {
        callable: Option<String>,
        message: String,
    },
}

impl EngineError {
    fn execution(callable: Option<&str>, err: RuntimeError) -> Self {
        EngineError::Execution {
            callable: callable.map(str::to_string),
            message: err.to_string(),
        }
    }
}

/// Progress notifications emitted while analyzing
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// Snippet loaded; these callables will be profiled
    Discovered(&'a [CallableInfo]),
    Sample {
        callable: &'a str,
        sample: &'a Sample,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: Vec<TrialRow>,
    pub fit: FitResult,
    pub techniques: TechniqueSet,
    #[serde(skip)]
    pub language: Language,
}

impl Report {
    /// Shared complexity column, e.g. `O(n) | MAPE: 0.041 | a: 2.1e-07`
    pub fn complexity(&self) -> String {
        self.fit.summary(self.language)
    }

    pub fn technique(&self) -> String {
        self.techniques.render(self.language)
    }

    /// `"Complexity: ...\nTechnique: ..."`
    pub fn summary(&self) -> String {
        format!("Complexity: {}\nTechnique: {}", self.complexity(), self.technique())
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    /// Empty input; nothing was run
    NoCode,
    /// Every trial produced an empty textual result
    EmptyResult { rows: Vec<TrialRow> },
    Report(Report),
}

pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn analyze<R>(&self, runtime: &mut R, source: &str) -> Result<Outcome, EngineError>
    where
        R: Runtime + ?Sized,
    {
        self.analyze_with(runtime, source, |_| {})
    }

    /// Analyze `source`, reporting progress as samples come in
    pub fn analyze_with<R, F>(
        &self,
        runtime: &mut R,
        source: &str,
        mut on_progress: F,
    ) -> Result<Outcome, EngineError>
    where
        R: Runtime + ?Sized,
        F: FnMut(Progress<'_>),
    {
        if source.trim().is_empty() {
            info!("No code supplied");
            return Ok(Outcome::NoCode);
        }

        let callables = runtime
            .load(source)
            .map_err(|e| EngineError::execution(None, e))?;
        info!(
            "Loaded snippet with {} runtime: {} callables",
            runtime.name(),
            callables.len()
        );
        on_progress(Progress::Discovered(&callables));

        let mut harness = Harness::new(&self.config);
        let mut rows = Vec::new();

        if callables.is_empty() {
            let sample = harness
                .run_script(runtime, source)
                .map_err(|e| EngineError::execution(None, e))?;
            on_progress(Progress::Sample {
                callable: SCRIPT_TRIAL,
                sample: &sample,
            });
            rows.push(TrialRow {
                callable: SCRIPT_TRIAL.to_string(),
                sample,
            });
        }

        for callable in &callables {
            let samples = harness
                .profile(runtime, callable, source, |sample| {
                    on_progress(Progress::Sample {
                        callable: &callable.name,
                        sample,
                    })
                })
                .map_err(|e| EngineError::execution(Some(&callable.name), e))?;
            rows.extend(samples.into_iter().map(|sample| TrialRow {
                callable: callable.name.clone(),
                sample,
            }));
        }

        if rows.iter().all(|row| row.sample.output.is_empty()) {
            warn!("The snippet produced no result");
            return Ok(Outcome::EmptyResult { rows });
        }

        let samples: Vec<Sample> = rows.iter().map(|row| row.sample.clone()).collect();
        let fit = fit::fit_samples(&samples, &FitOptions::from(&self.config));
        debug!("Fit over {} samples: {:?}", samples.len(), fit.model);

        Ok(Outcome::Report(Report {
            rows,
            fit,
            techniques: technique::classify(source),
            language: self.config.language,
        }))
    }
}
