//! Size sweep settings

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// `range(start, stop, step)` with an exclusive `stop`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub start: u64,
    pub stop: u64,
    pub step: u64,
}

impl SizeRange {
    pub const fn new(start: u64, stop: u64, step: u64) -> Self {
        Self { start, stop, step }
    }

    pub fn values(&self) -> Vec<u64> {
        if self.step == 0 {
            return Vec::new();
        }
        (self.start..self.stop).step_by(self.step as usize).collect()
    }

    fn validate(&self, which: &str) -> Result<()> {
        if self.step == 0 {
            bail!("sweep.{which}.step must be at least 1");
        }
        if self.start >= self.stop {
            bail!(
                "sweep.{which} is empty (start {} >= stop {})",
                self.start,
                self.stop
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Sizes for ordinary (polynomial-looking) callables
    pub polynomial: SizeRange,
    /// Tighter sizes for callables that look exponentially recursive
    pub exponential: SizeRange,
    /// Lower-cased name fragments that mark a callable as exponential
    pub exponential_hints: Vec<String>,
    /// Self-invocations in the source at which recursion counts as exponential
    pub recursion_threshold: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            polynomial: SizeRange::new(10, 201, 20),
            exponential: SizeRange::new(5, 31, 5),
            exponential_hints: vec!["fib".to_string()],
            recursion_threshold: 2,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        self.polynomial.validate("polynomial")?;
        self.exponential.validate("exponential")?;
        if self.recursion_threshold == 0 {
            bail!("sweep.recursion_threshold must be at least 1");
        }
        Ok(())
    }
}
