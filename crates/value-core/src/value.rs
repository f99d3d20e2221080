// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The native value domain shared by the validator, codec and harness.

use crate::{Annotation, NdArray};

/// A native value as handed to and returned from a method implementation.
///
/// Scalars keep the integer/float distinction so that `numeric/int` can be
/// checked exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An exact integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A character string.
    Text(String),
    /// A boolean.
    Bool(bool),
    /// A multi-dimensional numeric array.
    Array(NdArray),
    /// A geometric annotation.
    Annotation(Annotation),
    /// An ordered sequence, one entry per element of a list-wrapped slot.
    List(Vec<Value>),
}

impl Value {
    /// Returns a short description of the observed type, used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Text(_) => "text".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Array(a) => a.summary(),
            Value::Annotation(a) => format!("annotation({})", a.shape),
            Value::List(items) => format!("list[{}]", items.len()),
        }
    }

    /// Returns the numeric value for `Int`/`Float`, `None` otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Compares `self` (an actual result) with `expected`.
    ///
    /// Returns `None` when the two agree and a description of the first
    /// discrepancy otherwise. Numbers compare numerically across int/float,
    /// arrays compare dtype, shape and then element by element.
    pub fn difference(&self, expected: &Value) -> Option<String> {
        match (self, expected) {
            (Value::Int(a), Value::Int(e)) => {
                (a != e).then(|| format!("expected {e}, got {a}"))
            }
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                let (a, e) = (self.as_f64()?, expected.as_f64()?);
                (a != e).then(|| format!("expected {e:?}, got {a:?}"))
            }
            (Value::Text(a), Value::Text(e)) => {
                (a != e).then(|| format!("expected {e:?}, got {a:?}"))
            }
            (Value::Bool(a), Value::Bool(e)) => {
                (a != e).then(|| format!("expected {e}, got {a}"))
            }
            (Value::Array(a), Value::Array(e)) => array_difference(a, e),
            (Value::Annotation(a), Value::Annotation(e)) => {
                if a.shape != e.shape {
                    Some(format!("expected shape '{}', got '{}'", e.shape, a.shape))
                } else if a.coords != e.coords {
                    Some(format!("expected coordinates {:?}, got {:?}", e.coords, a.coords))
                } else {
                    None
                }
            }
            (Value::List(a), Value::List(e)) => {
                if a.len() != e.len() {
                    return Some(format!("expected {} elements, got {}", e.len(), a.len()));
                }
                a.iter()
                    .zip(e)
                    .enumerate()
                    .find_map(|(i, (a, e))| a.difference(e).map(|d| format!("element {i}: {d}")))
            }
            _ => Some(format!(
                "expected {}, got {}",
                expected.type_name(),
                self.type_name()
            )),
        }
    }
}

fn array_difference(actual: &NdArray, expected: &NdArray) -> Option<String> {
    if actual.dtype() != expected.dtype() {
        return Some(format!(
            "expected dtype {}, got {}",
            expected.dtype(),
            actual.dtype()
        ));
    }
    if actual.shape() != expected.shape() {
        return Some(format!(
            "expected shape {}, got {}",
            expected.shape(),
            actual.shape()
        ));
    }
    actual.first_difference(expected).map(|i| {
        format!(
            "element {i} differs: expected {:?}, got {:?}",
            expected.get_f64(i).unwrap_or(f64::NAN),
            actual.get_f64(i).unwrap_or(f64::NAN),
        )
    })
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NdArray> for Value {
    fn from(v: NdArray) -> Self {
        Value::Array(v)
    }
}

impl From<Annotation> for Value {
    fn from(v: Annotation) -> Self {
        Value::Annotation(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DType, Shape};

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Int(3).type_name(), "int");
        assert_eq!(Value::Float(3.5).type_name(), "float");
        assert_eq!(Value::from("x").type_name(), "text");
        assert_eq!(
            Value::Array(NdArray::zeros(Shape::matrix(2, 2), DType::UInt8)).type_name(),
            "ndarray<uint8>(2, 2)"
        );
        assert_eq!(
            Value::Annotation(Annotation::rect(0.0, 0.0, 1.0, 1.0)).type_name(),
            "annotation(rect)"
        );
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).type_name(),
            "list[2]"
        );
    }

    #[test]
    fn test_numeric_difference_crosses_int_float() {
        assert_eq!(Value::Int(3).difference(&Value::Float(3.0)), None);
        assert_eq!(Value::Float(8865.0).difference(&Value::Int(8865)), None);
        assert!(Value::Int(8864).difference(&Value::Int(8865)).is_some());
    }

    #[test]
    fn test_array_difference() {
        let a = NdArray::from_slice(Shape::matrix(1, 3), &[0u8, 255, 0]).unwrap();
        let b = NdArray::from_slice(Shape::matrix(1, 3), &[0u8, 255, 255]).unwrap();
        let diff = Value::Array(a.clone()).difference(&Value::Array(b)).unwrap();
        assert!(diff.contains("element 2"), "{diff}");

        let c = NdArray::from_slice(Shape::matrix(3, 1), &[0u8, 255, 0]).unwrap();
        let diff = Value::Array(a.clone()).difference(&Value::Array(c)).unwrap();
        assert!(diff.contains("shape"), "{diff}");

        assert_eq!(Value::Array(a.clone()).difference(&Value::Array(a)), None);
    }

    #[test]
    fn test_list_difference_names_element() {
        let actual = Value::List(vec![Value::Float(0.2), Value::Float(0.7)]);
        let expected = Value::List(vec![Value::Float(0.2), Value::Float(0.8)]);
        let diff = actual.difference(&expected).unwrap();
        assert!(diff.starts_with("element 1"), "{diff}");
    }

    #[test]
    fn test_kind_mismatch() {
        let diff = Value::from("3").difference(&Value::Int(3)).unwrap();
        assert_eq!(diff, "expected int, got text");
    }
}
