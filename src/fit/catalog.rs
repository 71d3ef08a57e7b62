//! Candidate growth models

use serde::Serialize;
use std::fmt;

/// A fixed growth function used as a regression basis.
///
/// [`GrowthModel::CATALOG`] is the evaluation order, and the order in which
/// ties are resolved: the earlier model wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GrowthModel {
    #[serde(rename = "O(1)")]
    Constant,
    #[serde(rename = "O(log n)")]
    Logarithmic,
    #[serde(rename = "O(n)")]
    Linear,
    #[serde(rename = "O(n log n)")]
    Linearithmic,
    #[serde(rename = "O(n^2)")]
    Quadratic,
    #[serde(rename = "O(n^3)")]
    Cubic,
    #[serde(rename = "O(2^n)")]
    Exponential,
}

impl GrowthModel {
    pub const CATALOG: [GrowthModel; 7] = [
        GrowthModel::Constant,
        GrowthModel::Logarithmic,
        GrowthModel::Linear,
        GrowthModel::Linearithmic,
        GrowthModel::Quadratic,
        GrowthModel::Cubic,
        GrowthModel::Exponential,
    ];

    pub fn notation(&self) -> &'static str {
        match self {
            GrowthModel::Constant => "O(1)",
            GrowthModel::Logarithmic => "O(log n)",
            GrowthModel::Linear => "O(n)",
            GrowthModel::Linearithmic => "O(n log n)",
            GrowthModel::Quadratic => "O(n^2)",
            GrowthModel::Cubic => "O(n^3)",
            GrowthModel::Exponential => "O(2^n)",
        }
    }

    /// Growth magnitude at size `n`. `O(2^n)` is infinite from
    /// `exponential_cap` on.
    pub fn eval(&self, n: u64, exponential_cap: u64) -> f64 {
        let x = n as f64;
        match self {
            GrowthModel::Constant => 1.0,
            GrowthModel::Logarithmic => (x + 1.0).log2(),
            GrowthModel::Linear => x,
            GrowthModel::Linearithmic => x * (x + 1.0).log2(),
            GrowthModel::Quadratic => x.powi(2),
            GrowthModel::Cubic => x.powi(3),
            GrowthModel::Exponential => {
                if n < exponential_cap {
                    x.exp2()
                } else {
                    f64::INFINITY
                }
            }
        }
    }
}

impl fmt::Display for GrowthModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}
