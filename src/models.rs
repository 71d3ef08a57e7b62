//! Core data models shared by the profiling engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// One declared parameter of a callable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    /// Declared type hint as text (e.g. `"int"`, `"list[int]"`), if any
    #[serde(default)]
    pub annotation: Option<String>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
        }
    }

    pub fn typed(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
        }
    }
}

/// A named, invokable unit discovered in a snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableInfo {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

impl CallableInfo {
    pub fn new(name: impl Into<String>, params: Vec<ParamSpec>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// A synthesized argument value.
///
/// Serializes untagged so an interpreter on the other side of a JSON pipe
/// receives plain ints, floats, lists and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    List(Vec<i64>),
    Matrix(Vec<Vec<i64>>),
    Text(String),
}

impl Value {
    /// Element count for collection values, `None` for scalars
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            Value::Matrix(rows) => Some(rows.len()),
            Value::Text(s) => Some(s.chars().count()),
            Value::Int(_) | Value::Float(_) => None,
        }
    }

    /// Integer view of a scalar value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::List(items) => write!(f, "{:?}", items),
            Value::Matrix(rows) => write!(f, "{:?}", rows),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// One timing observation: input size, mean elapsed seconds, textual result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub size: u64,
    pub elapsed: f64,
    pub output: String,
}

impl Sample {
    pub fn point(&self) -> (u64, f64) {
        (self.size, self.elapsed)
    }
}

/// A sample tagged with the callable that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRow {
    pub callable: String,
    #[serde(flatten)]
    pub sample: Sample,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_serializes_as_plain_json() {
        let args = vec![
            Value::Int(3),
            Value::Float(1.0),
            Value::List(vec![3, 2, 1]),
            Value::Matrix(vec![vec![0, 1], vec![1, 0]]),
            Value::Text("abc".into()),
        ];
        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(json, r#"[3,1.0,[3,2,1],[[0,1],[1,0]],"abc"]"#);
    }

    #[test]
    fn test_value_len() {
        assert_eq!(Value::List(vec![1, 2]).len(), Some(2));
        assert_eq!(Value::Text("héllo".into()).len(), Some(5));
        assert_eq!(Value::Int(7).len(), None);
        assert_eq!(Value::Matrix(vec![]).len(), Some(0));
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::Int(-4).as_i64(), Some(-4));
        assert_eq!(Value::Float(9.7).as_i64(), Some(9));
        assert_eq!(Value::Float(f64::NAN).as_i64(), None);
        assert_eq!(Value::Text("x".into()).as_i64(), None);
    }

    #[test]
    fn test_trial_row_flattens_sample() {
        let row = TrialRow {
            callable: "f".into(),
            sample: Sample {
                size: 10,
                elapsed: 0.5,
                output: "None".into(),
            },
        };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["callable"], "f");
        assert_eq!(v["size"], 10);
        assert_eq!(v["output"], "None");
    }
}
