//! End-to-end analysis tests over the in-process runtime
//!
//! These drive `Analyzer` with Rust closures standing in for snippet
//! functions, so they need no interpreter.

use asymptote::config::{AnalysisConfig, Language, SizeRange};
use asymptote::engine::{Analyzer, EngineError, Outcome, SCRIPT_TRIAL};
use asymptote::fit::GrowthModel;
use asymptote::models::{ParamSpec, Value};
use asymptote::runtime::NativeRuntime;
use asymptote::technique::Technique;
use std::time::Duration;

const INSERTION_SORT: &str = r#"
def insertion_sort(arr):
    for i in range(1, len(arr)):
        chave = arr[i]
        j = i - 1
        while j >= 0 and arr[j] > chave:
            arr[j + 1] = arr[j]
            j -= 1
        arr[j + 1] = chave
    return arr
"#;

fn insertion_sort(args: &[Value]) -> anyhow::Result<String> {
    let Some(Value::List(items)) = args.first() else {
        anyhow::bail!("TypeError: expected a list");
    };
    let mut arr = items.clone();
    for i in 1..arr.len() {
        let key = arr[i];
        let mut j = i;
        while j > 0 && arr[j - 1] > key {
            arr[j] = arr[j - 1];
            j -= 1;
        }
        arr[j] = key;
    }
    Ok(format!("{:?}", arr))
}

#[test]
fn test_sizes_follow_the_sweep() {
    let config = AnalysisConfig {
        seed: Some(1),
        sweep: asymptote::config::SweepConfig {
            polynomial: SizeRange::new(10, 100, 20),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut runtime =
        NativeRuntime::new().register("insertion_sort", vec![ParamSpec::new("arr")], insertion_sort);

    let outcome = Analyzer::new(config)
        .analyze(&mut runtime, INSERTION_SORT)
        .unwrap();
    let Outcome::Report(report) = outcome else {
        panic!("expected a report, got {:?}", outcome);
    };

    let sizes: Vec<u64> = report.rows.iter().map(|r| r.sample.size).collect();
    assert_eq!(sizes, vec![10, 30, 50, 70, 90]);
    assert!(report.rows.iter().all(|r| r.callable == "insertion_sort"));
    // the descending input comes back sorted
    assert!(report.rows[0].sample.output.starts_with("[1, 2, 3"));
    assert!(report.techniques.contains(Technique::Iterative));
    assert!(!report.techniques.contains(Technique::Recursive));
}

#[test]
fn test_quadratic_cost_is_recognized() {
    let config = AnalysisConfig {
        seed: Some(3),
        runs: 1,
        sweep: asymptote::config::SweepConfig {
            polynomial: SizeRange::new(50, 250, 40),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut runtime = NativeRuntime::new().register("bubble_sort", vec![ParamSpec::new("arr")], |args| {
        let n = args[0].len().unwrap_or(0) as u64;
        std::thread::sleep(Duration::from_micros(2 * n * n));
        Ok("ok".to_string())
    });

    let outcome = Analyzer::new(config)
        .analyze(&mut runtime, "def bubble_sort(arr): ...")
        .unwrap();
    let Outcome::Report(report) = outcome else {
        panic!("expected a report");
    };
    assert_eq!(report.fit.model, Some(GrowthModel::Quadratic));
    assert!(report.complexity().starts_with("O(n^2) | MAPE: "));
}

#[test]
fn test_fibonacci_uses_the_exponential_sweep() {
    let source = "def fib(n):\n    if n < 2: return n\n    return fib(n-1) + fib(n-2)\n";
    let config = AnalysisConfig {
        seed: Some(9),
        language: Language::En,
        ..Default::default()
    };
    let mut runtime = NativeRuntime::new().register("fib", vec![ParamSpec::new("n")], |args| {
        Ok(args[0].as_i64().unwrap_or(0).to_string())
    });

    let Outcome::Report(report) = Analyzer::new(config).analyze(&mut runtime, source).unwrap() else {
        panic!("expected a report");
    };
    assert_eq!(report.rows.len(), 5);
    assert!(report.rows.iter().all(|r| r.sample.size <= 30 && r.sample.size % 5 == 0));
    assert_eq!(report.technique(), "Recursive, Brute Force");
}

#[test]
fn test_single_self_call_uses_the_exponential_sweep() {
    let source = "def fatorial(n):\n    if n == 0:\n        return 1\n    else:\n        return n * fatorial(n - 1)\n";
    let config = AnalysisConfig {
        seed: Some(4),
        ..Default::default()
    };
    let mut runtime = NativeRuntime::new().register("fatorial", vec![ParamSpec::new("n")], |args| {
        Ok(args[0].as_i64().unwrap_or(0).to_string())
    });

    let Outcome::Report(report) = Analyzer::new(config).analyze(&mut runtime, source).unwrap() else {
        panic!("expected a report");
    };
    let sizes: Vec<u64> = report.rows.iter().map(|r| r.sample.size).collect();
    assert_eq!(sizes.len(), 5);
    assert!(sizes.iter().all(|&n| (5..=30).contains(&n) && n % 5 == 0), "sizes {:?}", sizes);
}

#[test]
fn test_failure_aborts_analysis() {
    let mut runtime = NativeRuntime::new()
        .register("ok", vec![ParamSpec::new("n")], |_| Ok("1".into()))
        .register("boom", vec![ParamSpec::new("arr")], |_| {
            anyhow::bail!("IndexError: list index out of range")
        });

    let err = Analyzer::new(AnalysisConfig::default())
        .analyze(&mut runtime, "def ok(n): ...\ndef boom(arr): ...")
        .unwrap_err();
    let EngineError::Execution { callable, message } = err;
    assert_eq!(callable.as_deref(), Some("boom"));
    assert!(message.contains("IndexError"));
}

#[test]
fn test_snippet_without_callables_runs_once() {
    let mut runtime = NativeRuntime::new().with_script(|| Ok("{'x': 4}".to_string()));
    let source = "x = 2 + 2";

    let Outcome::Report(report) = Analyzer::new(AnalysisConfig::default())
        .analyze(&mut runtime, source)
        .unwrap()
    else {
        panic!("expected a report");
    };
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].callable, SCRIPT_TRIAL);
    assert_eq!(report.rows[0].sample.size, source.chars().count() as u64);
    assert!(report.fit.is_undetermined());
    assert!(report.summary().starts_with("Complexity: Indefinido"));
}

#[test]
fn test_blank_snippet_is_no_code() {
    let mut runtime = NativeRuntime::new();
    let outcome = Analyzer::new(AnalysisConfig::default())
        .analyze(&mut runtime, "\n\n   ")
        .unwrap();
    assert!(matches!(outcome, Outcome::NoCode));
}
