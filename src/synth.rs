//! Argument synthesis
//!
//! Builds a plausible argument list for a callable from its parameter names
//! and type hints, and rewrites the first argument to control input size.
//! Anything that cannot be classified or scaled falls back to `1`; this
//! module never fails.

use crate::models::{ParamSpec, Value};
use serde::Serialize;

/// How a parameter was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    Integer,
    Float,
    Sequence,
    Text,
    /// Distance / adjacency matrix
    Matrix,
    /// Value being searched for
    Target,
    Fallback,
}

const SEQUENCE_NAME_HINTS: &[&str] = &["arr", "vetor", "vector", "list"];
const TARGET_NAME_HINTS: &[&str] = &["target", "value", "valor", "alvo"];

impl ArgKind {
    /// Classify a parameter; first matching rule wins.
    pub fn classify(param: &ParamSpec) -> Self {
        let name = param.name.to_lowercase();
        let hint = param
            .annotation
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();

        if hint.contains("int") || name.contains('n') {
            ArgKind::Integer
        } else if hint.contains("float") {
            ArgKind::Float
        } else if hint.contains("list") || SEQUENCE_NAME_HINTS.iter().any(|h| name.contains(h)) {
            ArgKind::Sequence
        } else if hint.contains("str") {
            ArgKind::Text
        } else if name.contains("dist") {
            ArgKind::Matrix
        } else if TARGET_NAME_HINTS.iter().any(|h| name.contains(h)) {
            ArgKind::Target
        } else {
            ArgKind::Fallback
        }
    }

    pub fn default_value(self) -> Value {
        match self {
            ArgKind::Integer | ArgKind::Fallback => Value::Int(1),
            ArgKind::Float => Value::Float(1.0),
            ArgKind::Sequence => Value::List(vec![1, 2, 3]),
            ArgKind::Text => Value::Text("abc".to_string()),
            ArgKind::Matrix => Value::Matrix(vec![vec![0, 1], vec![1, 0]]),
            ArgKind::Target => Value::Int(3),
        }
    }

    /// Value of this kind standing for an input of `size` elements
    pub fn sized_value(self, size: u64) -> Value {
        match self {
            ArgKind::Sequence => Value::List(descending(size)),
            ArgKind::Text => Value::Text(text_of_len(size)),
            ArgKind::Matrix => Value::Matrix(distance_matrix(size)),
            ArgKind::Integer | ArgKind::Float | ArgKind::Target | ArgKind::Fallback => {
                Value::Int(i64::try_from(size).unwrap_or(1))
            }
        }
    }
}

/// Ordered per-parameter kinds and default values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentTemplate {
    slots: Vec<(ArgKind, Value)>,
}

impl ArgumentTemplate {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Kind of the size-controlling slot
    pub fn size_kind(&self) -> Option<ArgKind> {
        self.slots.first().map(|(kind, _)| *kind)
    }

    /// Default argument list, unscaled
    pub fn values(&self) -> Vec<Value> {
        self.slots.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Build an argument template for a parameter list
pub fn synthesize(params: &[ParamSpec]) -> ArgumentTemplate {
    ArgumentTemplate {
        slots: params
            .iter()
            .map(|p| {
                let kind = ArgKind::classify(p);
                (kind, kind.default_value())
            })
            .collect(),
    }
}

/// Argument list with the first slot replaced by a value of the given size
pub fn scale(template: &ArgumentTemplate, size: u64) -> Vec<Value> {
    let mut args = template.values();
    if let Some(kind) = template.size_kind() {
        args[0] = kind.sized_value(size);
    }
    args
}

/// Input size actually carried by an argument list.
///
/// Read back from the first argument rather than trusted from the sweep, since
/// scaling may coerce.
pub fn measured_size(args: &[Value]) -> u64 {
    let Some(first) = args.first() else {
        return 1;
    };
    if let Some(len) = first.len() {
        return len as u64;
    }
    first
        .as_i64()
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(1)
}

fn descending(size: u64) -> Vec<i64> {
    (1..=size as i64).rev().collect()
}

fn text_of_len(size: u64) -> String {
    (b'a'..=b'z').cycle().take(size as usize).map(char::from).collect()
}

fn distance_matrix(size: u64) -> Vec<Vec<i64>> {
    let n = size as i64;
    (0..n)
        .map(|i| (0..n).map(|j| (i - j).abs()).collect())
        .collect()
}
