// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The validation algorithm.

use crate::{Direction, ValidationError};
use type_grammar::{ArraySpec, Dim, NumericSubtype, TypeDescriptor, TypeKind};
use value_core::{Annotation, NdArray, Shape, Value};

/// Checks `value` against `descriptor`.
///
/// List descriptors require a [`Value::List`] whose elements each match the
/// inner descriptor; the first failing element is reported with its index.
/// The function is pure: it never mutates either argument and always gives
/// the same answer for the same inputs.
///
/// # Examples
/// ```
/// use value_core::Value;
/// let d = type_grammar::parse("numeric/int").unwrap();
/// assert!(value_validator::validate(&Value::Int(3), &d).is_ok());
/// assert!(value_validator::validate(&Value::Float(3.5), &d).is_err());
/// ```
pub fn validate(value: &Value, descriptor: &TypeDescriptor) -> Result<(), ValidationError> {
    if !descriptor.is_list {
        return validate_kind(value, &descriptor.kind);
    }
    let Value::List(items) = value else {
        return Err(ValidationError::NotAList {
            expected: descriptor.kind.to_string(),
            actual: value.type_name(),
        });
    };
    for (index, item) in items.iter().enumerate() {
        validate_kind(item, &descriptor.kind).map_err(|e| ValidationError::Element {
            index,
            source: Box::new(e),
        })?;
    }
    Ok(())
}

/// Checks a single (non-list) value against a main type and its refinements.
pub fn validate_kind(value: &Value, kind: &TypeKind) -> Result<(), ValidationError> {
    match kind {
        TypeKind::Numeric(subtype) => validate_numeric(value, *subtype),
        TypeKind::Text(_) => match value {
            Value::Text(_) => Ok(()),
            other => Err(mismatch("text", "a string", other)),
        },
        TypeKind::Boolean(_) => match value {
            Value::Bool(_) => Ok(()),
            other => Err(mismatch("boolean", "a boolean", other)),
        },
        TypeKind::NdArray(spec) => match value {
            Value::Array(array) => validate_array(array, spec),
            other => Err(mismatch("ndarray", "a numeric array", other)),
        },
        TypeKind::Annotation => match value {
            Value::Annotation(annotation) => validate_annotation(annotation),
            other => Err(mismatch("annotation", "an annotation", other)),
        },
    }
}

/// Checks a positional sequence against the matching slot descriptors.
///
/// Used symmetrically for method inputs (before the call) and outputs
/// (after it). A length mismatch is itself a validation failure.
pub fn validate_slots<'a, I>(
    direction: Direction,
    values: &[Value],
    slots: I,
) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = (&'a str, &'a TypeDescriptor)>,
    I::IntoIter: ExactSizeIterator,
{
    let slots = slots.into_iter();
    if slots.len() != values.len() {
        return Err(ValidationError::ArgumentCount {
            direction,
            expected: slots.len(),
            actual: values.len(),
        });
    }
    for (index, ((name, descriptor), value)) in slots.zip(values).enumerate() {
        validate(value, descriptor).map_err(|e| ValidationError::Slot {
            direction,
            index,
            name: name.to_string(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

fn mismatch(kind: &'static str, expected: &str, actual: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        kind,
        expected: expected.to_string(),
        actual: actual.type_name(),
    }
}

fn validate_numeric(value: &Value, subtype: Option<NumericSubtype>) -> Result<(), ValidationError> {
    match (value, subtype) {
        (Value::Int(_), _) => Ok(()),
        (Value::Float(f), _) if !f.is_finite() => Err(ValidationError::NonFinite { value: *f }),
        (Value::Float(f), Some(NumericSubtype::Int)) => {
            Err(ValidationError::NotAnInteger { value: *f })
        }
        (Value::Float(_), _) => Ok(()),
        (other, Some(NumericSubtype::Int)) => Err(mismatch("numeric", "an integer", other)),
        (other, _) => Err(mismatch("numeric", "a number", other)),
    }
}

fn validate_array(array: &NdArray, spec: &ArraySpec) -> Result<(), ValidationError> {
    if let Some(expected) = spec.element_dtype() {
        if array.dtype() != expected {
            return Err(ValidationError::DTypeMismatch {
                expected,
                actual: array.dtype(),
            });
        }
    }

    let shape = array.shape();

    if spec.is_image() {
        if !shape.is_image_layout() {
            return Err(ValidationError::NotAnImage {
                actual: shape.clone(),
            });
        }
        return check_positive(shape.dims(), shape);
    }

    let Some(rank) = spec.rank() else {
        return Ok(());
    };
    if shape.rank() != rank {
        return Err(ValidationError::RankMismatch {
            expected: rank,
            actual: shape.clone(),
        });
    }
    for (axis, (dim, &size)) in spec.dims.iter().zip(shape.dims()).enumerate() {
        match dim {
            Dim::Fixed(expected) if size != *expected => {
                return Err(ValidationError::AxisMismatch {
                    axis,
                    expected: *expected,
                    actual: shape.clone(),
                });
            }
            Dim::Free if size == 0 => {
                return Err(ValidationError::EmptyAxis {
                    axis,
                    actual: shape.clone(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_positive(dims: &[usize], shape: &Shape) -> Result<(), ValidationError> {
    match dims.iter().position(|&d| d == 0) {
        Some(axis) => Err(ValidationError::EmptyAxis {
            axis,
            actual: shape.clone(),
        }),
        None => Ok(()),
    }
}

fn validate_annotation(annotation: &Annotation) -> Result<(), ValidationError> {
    let kind = annotation
        .shape_kind()
        .ok_or_else(|| ValidationError::UnknownShape {
            shape: annotation.shape.clone(),
        })?;
    let expected = kind.arity();
    for (index, tuple) in annotation.coords.iter().enumerate() {
        if tuple.len() != expected {
            return Err(ValidationError::Arity {
                shape: kind.to_string(),
                index,
                expected,
                actual: tuple.len(),
            });
        }
        if tuple.iter().any(|c| !c.is_finite()) {
            return Err(ValidationError::NonFiniteCoordinate {
                shape: kind.to_string(),
                index,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use type_grammar::parse;
    use value_core::DType;

    fn check(value: &Value, spec: &str) -> Result<(), ValidationError> {
        validate(value, &parse(spec).unwrap())
    }

    fn u8_array(dims: &[usize]) -> Value {
        Value::Array(NdArray::zeros(Shape::from(dims), DType::UInt8))
    }

    #[test]
    fn test_numeric_int() {
        assert!(check(&Value::Int(3), "numeric/int").is_ok());
        assert_eq!(
            check(&Value::Float(3.5), "numeric/int"),
            Err(ValidationError::NotAnInteger { value: 3.5 })
        );
        // A float that happens to be whole is still not an exact integer.
        assert!(check(&Value::Float(3.0), "numeric/int").is_err());
    }

    #[test]
    fn test_numeric_float_and_untyped() {
        assert!(check(&Value::Float(0.2), "numeric/float").is_ok());
        assert!(check(&Value::Int(2), "numeric/float").is_ok());
        assert!(check(&Value::Int(2), "numeric").is_ok());
        assert!(check(&Value::Float(2.5), "numeric").is_ok());
        assert!(check(&Value::from("2"), "numeric").is_err());
        assert!(matches!(
            check(&Value::Float(f64::NAN), "numeric/float"),
            Err(ValidationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_text_and_boolean() {
        assert!(check(&Value::from("hello"), "text").is_ok());
        assert!(check(&Value::from("hello"), "text/str").is_ok());
        assert!(check(&Value::Int(1), "text").is_err());
        assert!(check(&Value::Bool(true), "boolean").is_ok());
        let err = check(&Value::Int(1), "boolean/bool").unwrap_err();
        assert_eq!(err.to_string(), "boolean: expected a boolean, got int");
    }

    #[test]
    fn test_fixed_shape() {
        assert!(check(&u8_array(&[5, 10]), "ndarray/uint8/5/10").is_ok());
        assert!(matches!(
            check(&u8_array(&[5, 11]), "ndarray/uint8/5/10"),
            Err(ValidationError::AxisMismatch { axis: 1, expected: 10, .. })
        ));
        let wrong_dtype = Value::Array(NdArray::zeros(Shape::matrix(5, 10), DType::UInt16));
        assert_eq!(
            check(&wrong_dtype, "ndarray/uint8/5/10"),
            Err(ValidationError::DTypeMismatch {
                expected: DType::UInt8,
                actual: DType::UInt16,
            })
        );
    }

    #[test]
    fn test_partial_shape() {
        assert!(check(&u8_array(&[5, 1]), "ndarray/uint8/5/").is_ok());
        assert!(check(&u8_array(&[5, 999]), "ndarray/uint8/5/").is_ok());
        assert!(check(&u8_array(&[6, 999]), "ndarray/uint8/5/").is_err());
        assert!(matches!(
            check(&u8_array(&[5, 0]), "ndarray/uint8/5/"),
            Err(ValidationError::EmptyAxis { axis: 1, .. })
        ));
    }

    #[test]
    fn test_last_axis_fixed() {
        assert!(check(&u8_array(&[4, 7, 3]), "ndarray/uint8///3").is_ok());
        assert!(check(&u8_array(&[4, 7, 4]), "ndarray/uint8///3").is_err());
        assert!(matches!(
            check(&u8_array(&[4, 7]), "ndarray/uint8///3"),
            Err(ValidationError::RankMismatch { expected: 3, .. })
        ));
        assert!(matches!(
            check(&u8_array(&[1, 4, 7, 3]), "ndarray/uint8///3"),
            Err(ValidationError::RankMismatch { expected: 3, .. })
        ));
    }

    #[test]
    fn test_unconstrained_array() {
        assert!(check(&u8_array(&[2, 3, 4, 5]), "ndarray").is_ok());
        assert!(check(&u8_array(&[7]), "ndarray/uint8").is_ok());
        let floats = Value::Array(NdArray::zeros(Shape::vector(3), DType::Float32));
        assert!(check(&floats, "ndarray").is_ok());
        assert!(check(&floats, "ndarray/float64").is_err());
        assert!(check(&Value::Int(1), "ndarray").is_err());
    }

    #[test]
    fn test_image() {
        assert!(check(&u8_array(&[8, 8]), "ndarray/image").is_ok());
        assert!(check(&u8_array(&[8, 8, 3]), "ndarray/image").is_ok());
        assert!(check(&u8_array(&[8, 8, 4]), "ndarray/image").is_ok());
        assert!(matches!(
            check(&u8_array(&[8, 8, 2]), "ndarray/image"),
            Err(ValidationError::NotAnImage { .. })
        ));
        assert!(matches!(
            check(&u8_array(&[8]), "ndarray/image"),
            Err(ValidationError::NotAnImage { .. })
        ));
        let u16_image = Value::Array(NdArray::zeros(Shape::matrix(8, 8), DType::UInt16));
        assert!(matches!(
            check(&u16_image, "ndarray/image"),
            Err(ValidationError::DTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_annotation() {
        let ok = Value::Annotation(Annotation::new("rect", vec![vec![10.0, 10.0, 5.0, 5.0]]));
        assert!(check(&ok, "annotation").is_ok());

        let short = Value::Annotation(Annotation::new("rect", vec![vec![10.0, 10.0, 5.0]]));
        let err = check(&short, "annotation").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Arity {
                shape: "rect".into(),
                index: 0,
                expected: 4,
                actual: 3,
            }
        );
        assert!(err.to_string().contains("expected 4"));

        let unknown = Value::Annotation(Annotation::new("square", vec![vec![1.0, 2.0]]));
        assert!(matches!(
            check(&unknown, "annotation"),
            Err(ValidationError::UnknownShape { .. })
        ));

        let line = Value::Annotation(Annotation::polyline(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]));
        assert!(check(&line, "annotation").is_ok());

        let ellipse = Value::Annotation(Annotation::new(
            "ellipse",
            vec![vec![1.0, 2.0, 3.0, 4.0, 0.5]],
        ));
        assert!(check(&ellipse, "annotation").is_ok());
    }

    #[test]
    fn test_list() {
        let values = Value::List(vec![Value::Float(0.2), Value::Float(0.7), Value::Float(0.1)]);
        assert!(check(&values, "[numeric/float]").is_ok());
        assert!(check(&Value::List(vec![]), "[numeric/float]").is_ok());

        let mixed = Value::List(vec![Value::Int(1), Value::from("two"), Value::Int(3)]);
        let err = check(&mixed, "[numeric/int]").unwrap_err();
        assert!(matches!(err, ValidationError::Element { index: 1, .. }));

        assert!(matches!(
            check(&Value::Float(0.2), "[numeric/float]"),
            Err(ValidationError::NotAList { .. })
        ));
        // A list is not a scalar.
        assert!(check(&values, "numeric/float").is_err());
    }

    #[test]
    fn test_validate_slots() {
        let image = parse("ndarray/uint8///3").unwrap();
        let threshold = parse("numeric/int").unwrap();
        let slots = [("image", &image), ("threshold", &threshold)];

        let args = vec![u8_array(&[4, 4, 3]), Value::Int(130)];
        assert!(validate_slots(Direction::Input, &args, slots).is_ok());

        let err = validate_slots(Direction::Input, &args[..1], slots).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ArgumentCount {
                direction: Direction::Input,
                expected: 2,
                actual: 1,
            }
        );

        let bad = vec![u8_array(&[4, 4, 3]), Value::Float(0.5)];
        let err = validate_slots(Direction::Input, &bad, slots).unwrap_err();
        assert!(matches!(err, ValidationError::Slot { index: 1, .. }));
        assert!(err.to_string().starts_with("input 1 ('threshold')"));
    }

    #[test]
    fn test_idempotent_and_pure() {
        let d = parse("ndarray/uint8/5/10").unwrap();
        let v = u8_array(&[5, 10]);
        let (d_before, v_before) = (d.clone(), v.clone());
        let first = validate(&v, &d);
        let second = validate(&v, &d);
        assert_eq!(first, second);
        assert_eq!(d, d_before);
        assert_eq!(v, v_before);
    }
}
