//! Complexity model fitting
//!
//! Fits every model in [`GrowthModel::CATALOG`] to the measured
//! `(size, seconds)` points by least squares through the origin and keeps the
//! one with the lowest mean absolute percentage error (MAPE).
//!
//! For a model `f` with `x_i = f(n_i)`:
//!
//! ```text
//! a    = Σ x_i·t_i / Σ x_i²
//! MAPE = mean(|a·x_i − t_i| / max(t_i, ε))
//! ```

mod catalog;

pub use catalog::GrowthModel;

use crate::config::{AnalysisConfig, Language};
use crate::models::Sample;
use serde::Serialize;
use tracing::debug;

/// Guards the MAPE denominator
const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Points with `elapsed <= noise_floor` are dropped before fitting
    pub noise_floor: f64,
    pub exponential_cap: u64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            noise_floor: 1e-6,
            exponential_cap: 30,
        }
    }
}

impl From<&AnalysisConfig> for FitOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            noise_floor: config.noise_floor,
            exponential_cap: config.exponential_cap,
        }
    }
}

/// Score of one candidate model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelScore {
    pub model: GrowthModel,
    pub mape: f64,
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    /// Best model; `None` when undetermined
    pub model: Option<GrowthModel>,
    /// Mean absolute percentage error of the best model, infinite when undetermined
    pub mape: f64,
    /// Fitted scale `a` in `t ≈ a·f(n)`
    pub coefficient: f64,
    /// Points left after noise filtering
    pub points_used: usize,
    /// Every model that produced a fit, in catalog order
    pub candidates: Vec<ModelScore>,
}

impl FitResult {
    pub fn undetermined(points_used: usize) -> Self {
        Self {
            model: None,
            mape: f64::INFINITY,
            coefficient: 0.0,
            points_used,
            candidates: Vec::new(),
        }
    }

    pub fn is_undetermined(&self) -> bool {
        self.model.is_none()
    }

    pub fn model_name(&self, language: Language) -> &'static str {
        match self.model {
            Some(model) => model.notation(),
            None => match language {
                Language::Pt => "Indefinido",
                Language::En => "undetermined",
            },
        }
    }

    /// `"O(n log n) | MAPE: 0.032 | a: 1.05e-07"`
    pub fn summary(&self, language: Language) -> String {
        format!(
            "{} | MAPE: {:.3} | a: {}",
            self.model_name(language),
            self.mape,
            format_general(self.coefficient, 3)
        )
    }
}

/// Fit `(size, seconds)` points against the model catalog
pub fn fit(points: &[(u64, f64)], options: &FitOptions) -> FitResult {
    let kept: Vec<(u64, f64)> = points
        .iter()
        .copied()
        .filter(|&(_, t)| t > options.noise_floor)
        .collect();

    if kept.len() < 2 {
        debug!(
            "{} of {} points above the noise floor, fit undetermined",
            kept.len(),
            points.len()
        );
        return FitResult::undetermined(kept.len());
    }

    let mut result = FitResult::undetermined(kept.len());

    for model in GrowthModel::CATALOG {
        let xs: Vec<f64> = kept
            .iter()
            .map(|&(n, _)| model.eval(n, options.exponential_cap))
            .collect();
        if xs.iter().any(|x| !x.is_finite()) {
            debug!("Skipping {}: growth overflows at these sizes", model);
            continue;
        }

        let denom: f64 = xs.iter().map(|x| x * x).sum();
        if denom == 0.0 || !denom.is_finite() {
            debug!("Skipping {}: degenerate growth vector", model);
            continue;
        }

        let a = xs.iter().zip(&kept).map(|(x, &(_, t))| x * t).sum::<f64>() / denom;
        let mape = xs
            .iter()
            .zip(&kept)
            .map(|(x, &(_, t))| (a * x - t).abs() / t.max(EPSILON))
            .sum::<f64>()
            / kept.len() as f64;

        result.candidates.push(ModelScore {
            model,
            mape,
            coefficient: a,
        });

        if mape < result.mape {
            result.model = Some(model);
            result.mape = mape;
            result.coefficient = a;
        }
    }

    result
}

/// Fit a set of samples
pub fn fit_samples(samples: &[Sample], options: &FitOptions) -> FitResult {
    let points: Vec<(u64, f64)> = samples.iter().map(Sample::point).collect();
    fit(&points, options)
}

/// Format like C's `%.{precision}g`: fixed notation for moderate exponents,
/// scientific otherwise, trailing zeros removed.
pub fn format_general(x: f64, precision: usize) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, x);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
