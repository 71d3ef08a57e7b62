//! Text (terminal) reporter

use super::{RenderOptions, NO_CODE_WARNING, NO_RESULT_WARNING};
use crate::engine::{Outcome, Report, EMPTY_SUMMARY};
use crate::fit::format_general;
use console::style;

const RESULT_WIDTH: usize = 32;

/// Render an outcome as a terminal table and summary
pub fn render(outcome: &Outcome, options: RenderOptions) -> String {
    match outcome {
        Outcome::NoCode => format!("{} {}\n", style("warning:").yellow().bold(), NO_CODE_WARNING),
        Outcome::EmptyResult { .. } => format!(
            "{} {}\n\n{}\n",
            style("warning:").yellow().bold(),
            NO_RESULT_WARNING,
            EMPTY_SUMMARY
        ),
        Outcome::Report(report) => render_report(report, options),
    }
}

fn render_report(report: &Report, options: RenderOptions) -> String {
    let mut out = String::new();
    let complexity = report.complexity();

    out.push_str(&format!("\n{}\n", style("Asymptote Analysis").bold()));
    out.push_str(&format!(
        "{}\n",
        style("──────────────────────────────────────").dim()
    ));

    let name_width = report
        .rows
        .iter()
        .map(|r| r.callable.chars().count())
        .max()
        .unwrap_or(0)
        .max("FUNCTION".len());

    out.push_str(&format!(
        "{}\n",
        style(format!(
            "  {:<name_width$}  {:>10}  {:>6}  {:<RESULT_WIDTH$}  COMPLEXITY",
            "FUNCTION", "TIME (s)", "SIZE", "RESULT"
        ))
        .dim()
    ));

    for row in &report.rows {
        out.push_str(&format!(
            "  {:<name_width$}  {:>10.6}  {:>6}  {:<RESULT_WIDTH$}  {}\n",
            row.callable,
            row.sample.elapsed,
            row.sample.size,
            truncate(&row.sample.output, RESULT_WIDTH),
            complexity
        ));
    }

    if options.explain {
        out.push_str(&format!("\n{}\n", style("MODEL SCORES").bold()));
        if report.fit.candidates.is_empty() {
            out.push_str(&format!(
                "  No model could be fitted ({} usable samples)\n",
                report.fit.points_used
            ));
        }
        for score in &report.fit.candidates {
            let marker = if Some(score.model) == report.fit.model { "*" } else { " " };
            out.push_str(&format!(
                " {} {:<11} MAPE: {:>10.3}  a: {}\n",
                marker,
                score.model.notation(),
                score.mape,
                format_general(score.coefficient, 3)
            ));
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "{} {}\n{} {}\n",
        style("Complexity:").bold(),
        complexity,
        style("Technique:").bold(),
        report.technique()
    ));
    out
}

/// Cut to `max` chars, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let kept: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).into_owned()
    }

    #[test]
    fn test_report_has_rows_and_summary() {
        let out = plain(&render(&Outcome::Report(test_report()), RenderOptions::default()));
        assert!(out.contains("bubble_sort"));
        assert_eq!(out.matches("O(n^2) | MAPE:").count(), 6);
        assert!(out.contains("Complexity: O(n^2) | MAPE: 0.000 | a: 1e-07"));
        assert!(out.contains("Technique: Iterativo"));
        assert!(!out.contains("MODEL SCORES"));
    }

    #[test]
    fn test_explain_lists_candidates() {
        let out = plain(&render(
            &Outcome::Report(test_report()),
            RenderOptions { explain: true },
        ));
        assert!(out.contains("MODEL SCORES"));
        assert!(out.contains("* O(n^2)"));
        assert!(out.contains("O(log n)"));
    }

    #[test]
    fn test_warnings() {
        let out = plain(&render(&Outcome::NoCode, RenderOptions::default()));
        assert!(out.contains(NO_CODE_WARNING));

        let out = plain(&render(
            &Outcome::EmptyResult { rows: vec![] },
            RenderOptions::default(),
        ));
        assert!(out.contains(NO_RESULT_WARNING));
        assert!(out.contains("Complexity: -\nTechnique: -"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a\nb", 10), "a b");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ééééééééé", 5), "éé...");
    }
}
