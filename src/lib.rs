//! Asymptote - empirical complexity profiler
//!
//! Runs the functions defined in a code snippet over growing synthetic
//! inputs, fits the timings against a fixed catalog of Big-O growth models
//! and labels the algorithmic technique from the source text.
//!
//! ```rust,ignore
//! use asymptote::config::AnalysisConfig;
//! use asymptote::engine::{Analyzer, Outcome};
//! use asymptote::runtime::PythonRuntime;
//!
//! let mut runtime = PythonRuntime::new("python3");
//! let analyzer = Analyzer::new(AnalysisConfig::default());
//! if let Outcome::Report(report) = analyzer.analyze(&mut runtime, source)? {
//!     println!("{}", report.summary());
//! }
//! ```

pub mod config;
pub mod engine;
pub mod fit;
pub mod harness;
pub mod models;
pub mod reporters;
pub mod runtime;
pub mod synth;
pub mod technique;
