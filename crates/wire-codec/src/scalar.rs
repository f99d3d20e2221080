// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Plain-string forms of numbers, booleans and annotations.

use crate::CodecError;
use regex::Regex;
use std::sync::LazyLock;
use type_grammar::NumericSubtype;
use value_core::{Annotation, Value};

static INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("float pattern is valid")
});

/// Parses a numeric segment.
///
/// `numeric/int` requires `^-?\d+$`; `numeric/float` always yields a
/// float; bare `numeric` yields an integer when the integer form matches.
pub fn parse_numeric(segment: &str, subtype: Option<NumericSubtype>) -> Result<Value, CodecError> {
    let s = segment.trim();
    match subtype {
        Some(NumericSubtype::Int) => parse_int(s),
        Some(NumericSubtype::Float) => parse_float(s),
        None if INT_RE.is_match(s) => parse_int(s),
        None => parse_float(s).map_err(|_| CodecError::syntax(s, "a number")),
    }
}

fn parse_int(s: &str) -> Result<Value, CodecError> {
    if !INT_RE.is_match(s) {
        return Err(CodecError::syntax(s, "an integer"));
    }
    s.parse::<i64>()
        .map(Value::Int)
        .map_err(|_| CodecError::syntax(s, "a 64-bit integer"))
}

fn parse_float(s: &str) -> Result<Value, CodecError> {
    if !FLOAT_RE.is_match(s) {
        return Err(CodecError::syntax(s, "a finite decimal number"));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Value::Float(f)),
        _ => Err(CodecError::syntax(s, "a finite decimal number")),
    }
}

/// Parses `true`/`false`/`1`/`0`, case-insensitively.
pub fn parse_bool(segment: &str) -> Result<Value, CodecError> {
    let s = segment.trim();
    if s.eq_ignore_ascii_case("true") || s == "1" {
        Ok(Value::Bool(true))
    } else if s.eq_ignore_ascii_case("false") || s == "0" {
        Ok(Value::Bool(false))
    } else {
        Err(CodecError::syntax(s, "a boolean (true, false, 1 or 0)"))
    }
}

/// Renders a float so that it always reads back as a float: `3.0`, `0.2`,
/// `1e-7`.
pub fn render_float(f: f64) -> String {
    format!("{f:?}")
}

/// Parses an annotation from JSON: `["rect", [[x, y, w, h]]]` or
/// `{"shape": "rect", "coords": [[x, y, w, h]]}`.
///
/// Only the structure is checked here; tag and arity are validated later.
pub fn annotation_from_json(
    json: &serde_json::Value,
    segment: &str,
) -> Result<Annotation, CodecError> {
    let expected = "an annotation [shape, [[coords...]...]]";
    let (tag, coords) = match json {
        serde_json::Value::Array(items) if items.len() == 2 => (&items[0], &items[1]),
        serde_json::Value::Object(map) => match (map.get("shape"), map.get("coords")) {
            (Some(tag), Some(coords)) => (tag, coords),
            _ => return Err(CodecError::syntax(segment, expected)),
        },
        _ => return Err(CodecError::syntax(segment, expected)),
    };

    let tag = tag
        .as_str()
        .ok_or_else(|| CodecError::syntax(segment, "an annotation shape name"))?;
    let tuples = coords
        .as_array()
        .ok_or_else(|| CodecError::syntax(segment, expected))?
        .iter()
        .map(|tuple| {
            tuple
                .as_array()
                .and_then(|parts| parts.iter().map(serde_json::Value::as_f64).collect())
                .ok_or_else(|| CodecError::syntax(segment, "numeric coordinate tuples"))
        })
        .collect::<Result<Vec<Vec<f64>>, _>>()?;

    Ok(Annotation::new(tag, tuples))
}

/// Parses an annotation from its wire string (JSON text).
pub fn parse_annotation(segment: &str) -> Result<Annotation, CodecError> {
    let json: serde_json::Value = serde_json::from_str(segment.trim())
        .map_err(|_| CodecError::syntax(segment, "annotation JSON"))?;
    annotation_from_json(&json, segment)
}

/// Renders an annotation in the `[shape, coords]` array form.
pub fn annotation_to_json(annotation: &Annotation) -> serde_json::Value {
    serde_json::json!([annotation.shape, annotation.coords])
}
