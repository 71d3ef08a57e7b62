//! Timed execution harness
//!
//! Runs one callable over a sweep of input sizes, repeating each size a fixed
//! number of times and recording the mean wall-clock time.

use crate::config::{AnalysisConfig, SizeRange};
use crate::models::{CallableInfo, Sample};
use crate::runtime::{Runtime, RuntimeError};
use crate::synth;
use crate::technique;
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, warn};

/// Which size range a callable is swept over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    Polynomial,
    /// Small, tightly packed sizes so exponential algorithms finish
    Exponential,
}

pub struct Harness<'a> {
    config: &'a AnalysisConfig,
    rng: ChaCha8Rng,
}

impl<'a> Harness<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        debug!("Size sweep seed: {}", seed);
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick the sweep for a callable from its name and the snippet text
    pub fn sweep_kind(&self, name: &str, source: &str) -> SweepKind {
        let lower = name.to_lowercase();
        let sweep = &self.config.sweep;
        if sweep
            .exponential_hints
            .iter()
            .any(|hint| !hint.is_empty() && lower.contains(&hint.to_lowercase()))
        {
            return SweepKind::Exponential;
        }
        if technique::count_self_invocations(source, name) >= sweep.recursion_threshold {
            return SweepKind::Exponential;
        }
        SweepKind::Polynomial
    }

    /// Draw distinct sizes without replacement, ascending
    pub fn draw_sizes(&mut self, kind: SweepKind) -> Vec<u64> {
        let range = match kind {
            SweepKind::Polynomial => self.config.sweep.polynomial,
            SweepKind::Exponential => self.config.sweep.exponential,
        };
        draw_from(&mut self.rng, range, self.config.samples)
    }

    /// Profile a callable over a randomly drawn sweep
    pub fn profile<R, F>(
        &mut self,
        runtime: &mut R,
        callable: &CallableInfo,
        source: &str,
        on_sample: F,
    ) -> Result<Vec<Sample>, RuntimeError>
    where
        R: Runtime + ?Sized,
        F: FnMut(&Sample),
    {
        let kind = self.sweep_kind(&callable.name, source);
        let sizes = self.draw_sizes(kind);
        debug!("Profiling {} ({:?}) at sizes {:?}", callable.name, kind, sizes);
        self.profile_sizes(runtime, callable, &sizes, on_sample)
    }

    /// Profile a callable at the given sizes, one sample per size
    pub fn profile_sizes<R, F>(
        &self,
        runtime: &mut R,
        callable: &CallableInfo,
        sizes: &[u64],
        mut on_sample: F,
    ) -> Result<Vec<Sample>, RuntimeError>
    where
        R: Runtime + ?Sized,
        F: FnMut(&Sample),
    {
        let runs = self.config.runs.max(1);
        let mut samples = Vec::with_capacity(sizes.len());

        for &size in sizes {
            let template = synth::synthesize(&callable.params);
            let args = synth::scale(&template, size);

            let mut total = Duration::ZERO;
            let mut output = String::new();
            for _ in 0..runs {
                let invocation = runtime.invoke(&callable.name, &args)?;
                total += invocation.elapsed;
                output = invocation.output;
            }

            let sample = Sample {
                size: synth::measured_size(&args),
                elapsed: total.as_secs_f64() / runs as f64,
                output,
            };
            debug!(
                "{} size={} elapsed={:.6}s",
                callable.name, sample.size, sample.elapsed
            );
            on_sample(&sample);
            samples.push(sample);
        }

        Ok(samples)
    }

    /// Run the whole snippet once as a single sample sized by its length.
    /// Used when the snippet defines no callables.
    pub fn run_script<R>(&self, runtime: &mut R, source: &str) -> Result<Sample, RuntimeError>
    where
        R: Runtime + ?Sized,
    {
        let invocation = runtime.run_script(source)?;
        Ok(Sample {
            size: source.chars().count() as u64,
            elapsed: invocation.elapsed.as_secs_f64(),
            output: invocation.output,
        })
    }
}

fn draw_from(rng: &mut ChaCha8Rng, range: SizeRange, amount: usize) -> Vec<u64> {
    let pool = range.values();
    if pool.len() < amount {
        warn!(
            "Size range {}..{} step {} has only {} values, {} requested",
            range.start,
            range.stop,
            range.step,
            pool.len(),
            amount
        );
        return pool;
    }
    let mut sizes: Vec<u64> = index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i])
        .collect();
    sizes.sort_unstable();
    sizes
}
