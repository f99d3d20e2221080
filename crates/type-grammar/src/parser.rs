// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Type-specification parser.
//!
//! # Grammar
//! ```text
//! typespec := list | scalar
//! list     := "[" scalar "]"
//! scalar   := mainType ("/" subType)? ("/" dimSpec)*
//! mainType := "numeric" | "text" | "boolean" | "ndarray" | "annotation"
//! dimSpec  := integer | ""
//! ```
//!
//! The scalar part is split on `/`. The second token is a subtype when it
//! is non-empty and not all digits; every remaining token is a dimension.

use crate::descriptor::{
    ArraySpec, ArraySubtype, BoolSubtype, Dim, NumericSubtype, TextSubtype, TypeDescriptor,
    TypeKind,
};
use crate::GrammarError;
use std::str::FromStr;
use value_core::DType;

/// Parses a type-specification string into a [`TypeDescriptor`].
///
/// Leading and trailing whitespace is ignored.
///
/// # Examples
/// ```
/// let d = type_grammar::parse("ndarray/uint8///3").unwrap();
/// assert_eq!(d.array_spec().unwrap().rank(), Some(3));
/// assert_eq!(d.to_string(), "ndarray/uint8///3");
/// ```
pub fn parse(spec: &str) -> Result<TypeDescriptor, GrammarError> {
    let spec = spec.trim();
    let (inner, is_list) = strip_list(spec)?;
    let kind = parse_scalar(inner)?;
    Ok(TypeDescriptor { kind, is_list })
}

/// Splits off one level of list brackets.
fn strip_list(spec: &str) -> Result<(&str, bool), GrammarError> {
    match (spec.starts_with('['), spec.ends_with(']')) {
        (true, true) if spec.len() >= 2 => {
            let inner = spec[1..spec.len() - 1].trim();
            if inner.starts_with('[') && inner.ends_with(']') {
                return Err(GrammarError::NestedList {
                    spec: spec.to_string(),
                });
            }
            if inner.contains(['[', ']']) {
                return Err(GrammarError::BracketMismatch {
                    spec: spec.to_string(),
                });
            }
            Ok((inner, true))
        }
        (false, false) if !spec.contains(['[', ']']) => Ok((spec, false)),
        _ => Err(GrammarError::BracketMismatch {
            spec: spec.to_string(),
        }),
    }
}

fn parse_scalar(spec: &str) -> Result<TypeKind, GrammarError> {
    if spec.is_empty() {
        return Err(GrammarError::Empty);
    }

    let tokens: Vec<&str> = spec.split('/').collect();
    let main = tokens[0];
    let rest = &tokens[1..];

    let (subtype, dim_tokens) = match rest.split_first() {
        Some((first, dims)) if !first.is_empty() && !is_all_digits(first) => (Some(*first), dims),
        _ => (None, rest),
    };

    let dims = dim_tokens
        .iter()
        .map(|t| parse_dim(t, spec))
        .collect::<Result<Vec<_>, _>>()?;

    let kind = match main {
        "numeric" => TypeKind::Numeric(match subtype {
            None => None,
            Some("int") => Some(NumericSubtype::Int),
            Some("float") => Some(NumericSubtype::Float),
            Some(other) => return Err(unknown_subtype("numeric", other)),
        }),
        "text" => TypeKind::Text(match subtype {
            None => None,
            Some("str") => Some(TextSubtype::Str),
            Some(other) => return Err(unknown_subtype("text", other)),
        }),
        "boolean" => TypeKind::Boolean(match subtype {
            None => None,
            Some("bool") => Some(BoolSubtype::Bool),
            Some(other) => return Err(unknown_subtype("boolean", other)),
        }),
        "annotation" => {
            if let Some(token) = subtype {
                return Err(GrammarError::UnexpectedSubtype {
                    kind: "annotation",
                    token: token.to_string(),
                });
            }
            TypeKind::Annotation
        }
        "ndarray" => {
            let subtype = match subtype {
                None => None,
                Some("image") => {
                    if !dims.is_empty() {
                        return Err(GrammarError::ImageWithDims {
                            spec: spec.to_string(),
                        });
                    }
                    Some(ArraySubtype::Image)
                }
                Some(name) => Some(ArraySubtype::Element(
                    DType::from_name(name).ok_or_else(|| unknown_subtype("ndarray", name))?,
                )),
            };
            return Ok(TypeKind::NdArray(ArraySpec { subtype, dims }));
        }
        other => {
            return Err(GrammarError::UnknownMainType {
                token: other.to_string(),
            })
        }
    };

    if !dims.is_empty() {
        return Err(GrammarError::DimsNotAllowed {
            kind: kind.name(),
            spec: spec.to_string(),
        });
    }
    Ok(kind)
}

fn parse_dim(token: &str, spec: &str) -> Result<Dim, GrammarError> {
    if token.is_empty() {
        return Ok(Dim::Free);
    }
    let invalid = || GrammarError::InvalidDim {
        token: token.to_string(),
        spec: spec.to_string(),
    };
    if !is_all_digits(token) {
        return Err(invalid());
    }
    match token.parse::<usize>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(n) => Ok(Dim::Fixed(n)),
    }
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn unknown_subtype(kind: &'static str, token: &str) -> GrammarError {
    GrammarError::UnknownSubtype {
        kind,
        token: token.to_string(),
    }
}

impl FromStr for TypeDescriptor {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
