//! JSON reporter
//!
//! One object per outcome with a `status` of `ok`, `no_code` or `no_result`.

use super::{RenderOptions, NO_CODE_WARNING, NO_RESULT_WARNING};
use crate::engine::{Outcome, Report};
use crate::fit::{GrowthModel, ModelScore};
use crate::models::TrialRow;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonTrial<'a> {
    #[serde(flatten)]
    row: &'a TrialRow,
    complexity: &'a str,
}

#[derive(Serialize)]
struct JsonFit<'a> {
    model: Option<GrowthModel>,
    name: &'a str,
    /// `null` when undetermined
    mape: Option<f64>,
    coefficient: f64,
    points_used: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<&'a [ModelScore]>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum JsonOutcome<'a> {
    Ok {
        complexity: String,
        technique: String,
        summary: String,
        fit: JsonFit<'a>,
        techniques: Vec<&'static str>,
        trials: Vec<JsonTrial<'a>>,
    },
    NoCode {
        warning: &'static str,
    },
    NoResult {
        warning: &'static str,
        trials: Vec<JsonTrial<'a>>,
    },
}

fn report_view<'a>(report: &'a Report, complexity: &'a str, options: RenderOptions) -> JsonOutcome<'a> {
    let fit = &report.fit;
    JsonOutcome::Ok {
        complexity: complexity.to_string(),
        technique: report.technique(),
        summary: report.summary(),
        fit: JsonFit {
            model: fit.model,
            name: fit.model_name(report.language),
            mape: fit.mape.is_finite().then_some(fit.mape),
            coefficient: fit.coefficient,
            points_used: fit.points_used,
            candidates: options.explain.then_some(fit.candidates.as_slice()),
        },
        techniques: report
            .techniques
            .iter()
            .map(|t| t.label(report.language))
            .collect(),
        trials: report
            .rows
            .iter()
            .map(|row| JsonTrial { row, complexity })
            .collect(),
    }
}

/// Render an outcome as pretty-printed JSON
pub fn render(outcome: &Outcome, options: RenderOptions) -> Result<String> {
    let complexity;
    let view = match outcome {
        Outcome::NoCode => JsonOutcome::NoCode {
            warning: NO_CODE_WARNING,
        },
        Outcome::EmptyResult { rows } => JsonOutcome::NoResult {
            warning: NO_RESULT_WARNING,
            trials: rows
                .iter()
                .map(|row| JsonTrial {
                    row,
                    complexity: "-",
                })
                .collect(),
        },
        Outcome::Report(report) => {
            complexity = report.complexity();
            report_view(report, &complexity, options)
        }
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    fn parse(outcome: &Outcome, explain: bool) -> serde_json::Value {
        let json = render(outcome, RenderOptions { explain }).expect("render JSON");
        serde_json::from_str(&json).expect("parse JSON")
    }

    #[test]
    fn test_json_report() {
        let v = parse(&Outcome::Report(test_report()), false);
        assert_eq!(v["status"], "ok");
        assert_eq!(v["fit"]["model"], "O(n^2)");
        assert_eq!(v["techniques"][0], "Iterativo");
        assert_eq!(v["technique"], "Iterativo");
        let trials = v["trials"].as_array().expect("trials array");
        assert_eq!(trials.len(), 5);
        assert_eq!(trials[0]["callable"], "bubble_sort");
        assert_eq!(trials[0]["size"], 10);
        assert!(trials[0]["complexity"].as_str().unwrap().starts_with("O(n^2)"));
        assert!(v["fit"].get("candidates").is_none());
    }

    #[test]
    fn test_json_explain_includes_candidates() {
        let v = parse(&Outcome::Report(test_report()), true);
        // O(2^n) overflows at these sizes
        assert_eq!(v["fit"]["candidates"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_json_undetermined_mape_is_null() {
        let mut report = test_report();
        report.fit = crate::fit::FitResult::undetermined(1);
        let v = parse(&Outcome::Report(report), false);
        assert!(v["fit"]["mape"].is_null());
        assert!(v["fit"]["model"].is_null());
        assert_eq!(v["fit"]["name"], "Indefinido");
    }

    #[test]
    fn test_json_warnings() {
        assert_eq!(parse(&Outcome::NoCode, false)["status"], "no_code");
        let v = parse(&Outcome::EmptyResult { rows: vec![] }, false);
        assert_eq!(v["status"], "no_result");
        assert_eq!(v["warning"], NO_RESULT_WARNING);
    }
}
