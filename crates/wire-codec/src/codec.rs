// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Conversion between native values and their wire forms.

use crate::container;
use crate::error::segment_label;
use crate::fetch::DecodeContext;
use crate::image_codec;
use crate::reference::{split_list, DataUrl, Scheme, MIME_NPY, MIME_NPZ, MIME_PNG};
use crate::scalar;
use crate::CodecError;
use type_grammar::{TypeDescriptor, TypeKind};
use value_core::{NdArray, Value};

/// Decodes a wire string into a native value of the declared type.
///
/// Array references are resolved through `ctx` and the resulting array is
/// checked against the declared dtype and shape. Scalars are only parsed;
/// validation of their value range is left to the caller.
pub async fn decode(
    wire: &str,
    descriptor: &TypeDescriptor,
    ctx: &DecodeContext,
) -> Result<Value, CodecError> {
    if !descriptor.is_list {
        return decode_kind(wire, &descriptor.kind, ctx).await;
    }

    if descriptor.kind == TypeKind::Annotation {
        return decode_annotation_list(wire);
    }

    let is_array = matches!(descriptor.kind, TypeKind::NdArray(_));
    let segments = split_list(wire, is_array);
    let mut items = Vec::with_capacity(segments.len());
    for segment in segments {
        items.push(decode_kind(segment, &descriptor.kind, ctx).await?);
    }
    Ok(Value::List(items))
}

/// Decodes raw payload bytes, as received from a multipart upload or read
/// from a file.
///
/// Non-list array slots interpret the bytes as an image or `.npy`/`.npz`
/// container. Every other slot treats the bytes as UTF-8 wire text.
pub async fn decode_bytes(
    bytes: &[u8],
    descriptor: &TypeDescriptor,
    ctx: &DecodeContext,
) -> Result<Value, CodecError> {
    if !descriptor.is_list && matches!(descriptor.kind, TypeKind::NdArray(_)) {
        let array = array_from_bytes(bytes, None, "<bytes>", ctx)?;
        return check_array(array, &descriptor.kind, "<bytes>");
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|_| CodecError::syntax("<bytes>", "UTF-8 text"))?;
    decode(text.trim_end_matches(['\r', '\n']), descriptor, ctx).await
}

/// Decodes a JSON value (a request body field or a test-case literal).
///
/// Strings are treated as wire strings; numbers, booleans, arrays and
/// annotation objects map directly.
pub async fn decode_json(
    json: &serde_json::Value,
    descriptor: &TypeDescriptor,
    ctx: &DecodeContext,
) -> Result<Value, CodecError> {
    use serde_json::Value as Json;

    if let Json::String(s) = json {
        return decode(s, descriptor, ctx).await;
    }
    if !descriptor.is_list {
        return decode_json_kind(json, &descriptor.kind, ctx).await;
    }

    match json {
        Json::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let value = match item {
                    Json::String(s) if descriptor.kind != TypeKind::Annotation => {
                        decode_kind(s, &descriptor.kind, ctx).await?
                    }
                    other => decode_json_kind(other, &descriptor.kind, ctx).await?,
                };
                values.push(value);
            }
            Ok(Value::List(values))
        }
        other => Err(CodecError::syntax(
            &other.to_string(),
            format!("a JSON array for {descriptor}"),
        )),
    }
}

async fn decode_json_kind(
    json: &serde_json::Value,
    kind: &TypeKind,
    ctx: &DecodeContext,
) -> Result<Value, CodecError> {
    use serde_json::Value as Json;

    match (kind, json) {
        (_, Json::String(s)) if *kind != TypeKind::Annotation => decode_kind(s, kind, ctx).await,
        (TypeKind::Numeric(subtype), Json::Number(n)) => {
            scalar::parse_numeric(&n.to_string(), *subtype)
        }
        (TypeKind::Boolean(_), Json::Bool(b)) => Ok(Value::Bool(*b)),
        (TypeKind::Annotation, Json::String(s)) => Ok(Value::Annotation(scalar::parse_annotation(s)?)),
        (TypeKind::Annotation, other) => Ok(Value::Annotation(scalar::annotation_from_json(
            other,
            &other.to_string(),
        )?)),
        (kind, other) => Err(CodecError::syntax(
            &other.to_string(),
            format!("a JSON value for {kind}"),
        )),
    }
}

async fn decode_kind(
    segment: &str,
    kind: &TypeKind,
    ctx: &DecodeContext,
) -> Result<Value, CodecError> {
    match kind {
        TypeKind::Numeric(subtype) => scalar::parse_numeric(segment, *subtype),
        TypeKind::Text(_) => Ok(Value::Text(segment.to_string())),
        TypeKind::Boolean(_) => scalar::parse_bool(segment),
        TypeKind::Annotation => Ok(Value::Annotation(scalar::parse_annotation(segment)?)),
        TypeKind::NdArray(_) => decode_array(segment.trim(), kind, ctx).await,
    }
}

fn decode_annotation_list(wire: &str) -> Result<Value, CodecError> {
    if wire.trim().is_empty() {
        return Ok(Value::List(Vec::new()));
    }
    let json: serde_json::Value = serde_json::from_str(wire.trim())
        .map_err(|_| CodecError::syntax(wire, "a JSON array of annotations"))?;
    let items = json
        .as_array()
        .ok_or_else(|| CodecError::syntax(wire, "a JSON array of annotations"))?;
    items
        .iter()
        .map(|item| scalar::annotation_from_json(item, &item.to_string()).map(Value::Annotation))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

async fn decode_array(
    segment: &str,
    kind: &TypeKind,
    ctx: &DecodeContext,
) -> Result<Value, CodecError> {
    let array = match Scheme::of(segment) {
        Some(Scheme::Data) => {
            let url = DataUrl::parse(segment)?;
            array_from_bytes(&url.data, Some(&url.mime), segment, ctx)?
        }
        Some(Scheme::Http | Scheme::File) => {
            let bytes = ctx.fetch(segment).await?;
            array_from_bytes(&bytes, None, segment, ctx)?
        }
        None => {
            return Err(CodecError::unsupported(
                segment,
                "expected a data:, http(s):// or file:// reference",
            ))
        }
    };
    check_array(array, kind, segment)
}

/// Interprets payload bytes as an image or `.npy`/`.npz` container.
///
/// A data-URL media type decides the container when present; otherwise
/// the leading bytes are sniffed and anything that is not NPY or zip is
/// handed to the image decoder. Archive members are decompressed up to
/// the context's fetch limit.
fn array_from_bytes(
    bytes: &[u8],
    mime: Option<&str>,
    segment: &str,
    ctx: &DecodeContext,
) -> Result<NdArray, CodecError> {
    let limit = ctx.max_fetch_bytes();
    let container_err = |source| CodecError::ArrayContainer {
        segment: segment_label(segment),
        source,
    };
    let image_err = |source| CodecError::Image {
        segment: segment_label(segment),
        source,
    };

    match mime {
        Some(m) if m.starts_with("image/") => image_codec::decode_image(bytes).map_err(image_err),
        Some(MIME_NPY) => container::read_npy(bytes).map_err(container_err),
        Some(MIME_NPZ) => container::read_npz(bytes, limit).map_err(container_err),
        _ if container::is_npy(bytes) => container::read_npy(bytes).map_err(container_err),
        _ if container::is_npz(bytes) => container::read_npz(bytes, limit).map_err(container_err),
        _ => image_codec::decode_image(bytes).map_err(image_err),
    }
}

fn check_array(array: NdArray, kind: &TypeKind, segment: &str) -> Result<Value, CodecError> {
    let value = Value::Array(array);
    value_validator::validate_kind(&value, kind).map_err(|source| CodecError::Mismatch {
        segment: segment_label(segment),
        source,
    })?;
    Ok(value)
}

/// Encodes a native value as its wire string.
///
/// Integers render in decimal, floats always carry a fraction or an
/// exponent, image-layout `uint8` arrays become PNG data URLs and other
/// arrays become `.npy` data URLs. Lists join their elements with commas;
/// annotation lists are a JSON array.
pub fn encode(value: &Value, descriptor: &TypeDescriptor) -> Result<String, CodecError> {
    if !descriptor.is_list {
        return encode_kind(value, &descriptor.kind, descriptor);
    }
    let Value::List(items) = value else {
        return Err(encode_error(value, descriptor, "expected a list"));
    };

    if descriptor.kind == TypeKind::Annotation {
        return Ok(encode_json(value, descriptor)?.to_string());
    }

    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let part = encode_kind(item, &descriptor.kind, descriptor)?;
        if matches!(descriptor.kind, TypeKind::Text(_)) {
            check_text_element(item, &part, descriptor)?;
        }
        parts.push(part);
    }
    Ok(parts.join(","))
}

/// Text list elements must survive splitting and trimming unchanged.
fn check_text_element(
    item: &Value,
    part: &str,
    descriptor: &TypeDescriptor,
) -> Result<(), CodecError> {
    let problem = if part.contains(',') {
        "list elements must not contain ','"
    } else if part.is_empty() {
        "list elements must not be empty"
    } else if part.trim() != part {
        "list elements must not start or end with whitespace"
    } else {
        return Ok(());
    };
    Err(encode_error(item, descriptor, problem))
}

fn encode_kind(
    value: &Value,
    kind: &TypeKind,
    descriptor: &TypeDescriptor,
) -> Result<String, CodecError> {
    match (kind, value) {
        (TypeKind::Numeric(_), Value::Int(i)) => Ok(i.to_string()),
        (TypeKind::Numeric(_), Value::Float(f)) if f.is_finite() => Ok(scalar::render_float(*f)),
        (TypeKind::Text(_), Value::Text(s)) => Ok(s.clone()),
        (TypeKind::Boolean(_), Value::Bool(b)) => Ok(b.to_string()),
        (TypeKind::Annotation, Value::Annotation(a)) => {
            Ok(scalar::annotation_to_json(a).to_string())
        }
        (TypeKind::NdArray(_), Value::Array(array)) => encode_array(array, value, descriptor),
        _ => Err(encode_error(value, descriptor, "value does not fit the slot")),
    }
}

fn encode_array(
    array: &NdArray,
    value: &Value,
    descriptor: &TypeDescriptor,
) -> Result<String, CodecError> {
    if image_codec::is_png_encodable(array) {
        let png = image_codec::encode_png(array)
            .map_err(|e| encode_error(value, descriptor, &e.to_string()))?;
        Ok(DataUrl::render(MIME_PNG, &png))
    } else {
        Ok(DataUrl::render(MIME_NPY, &container::write_npy(array)))
    }
}

/// Encodes an array as a single-member `.npz` data URL.
pub fn encode_npz(array: &NdArray) -> Result<String, CodecError> {
    let bytes = container::write_npz(array).map_err(|source| CodecError::ArrayContainer {
        segment: array.summary(),
        source,
    })?;
    Ok(DataUrl::render(MIME_NPZ, &bytes))
}

/// Encodes a native value as JSON: numbers and booleans natively, arrays as
/// data-URL strings, annotations as `[shape, coords]`, lists as JSON arrays.
pub fn encode_json(
    value: &Value,
    descriptor: &TypeDescriptor,
) -> Result<serde_json::Value, CodecError> {
    use serde_json::Value as Json;

    if descriptor.is_list {
        let Value::List(items) = value else {
            return Err(encode_error(value, descriptor, "expected a list"));
        };
        return items
            .iter()
            .map(|item| encode_json_kind(item, &descriptor.kind, descriptor))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array);
    }
    encode_json_kind(value, &descriptor.kind, descriptor)
}

fn encode_json_kind(
    value: &Value,
    kind: &TypeKind,
    descriptor: &TypeDescriptor,
) -> Result<serde_json::Value, CodecError> {
    use serde_json::Value as Json;

    match (kind, value) {
        (TypeKind::Numeric(_), Value::Int(i)) => Ok(Json::from(*i)),
        (TypeKind::Numeric(_), Value::Float(f)) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| encode_error(value, descriptor, "number is not finite")),
        (TypeKind::Text(_), Value::Text(s)) => Ok(Json::String(s.clone())),
        (TypeKind::Boolean(_), Value::Bool(b)) => Ok(Json::Bool(*b)),
        (TypeKind::Annotation, Value::Annotation(a)) => Ok(scalar::annotation_to_json(a)),
        (TypeKind::NdArray(_), Value::Array(array)) => {
            encode_array(array, value, descriptor).map(Json::String)
        }
        _ => Err(encode_error(value, descriptor, "value does not fit the slot")),
    }
}

fn encode_error(value: &Value, descriptor: &TypeDescriptor, detail: &str) -> CodecError {
    CodecError::Encode {
        descriptor: descriptor.to_string(),
        actual: value.type_name(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecErrorKind;
    use value_core::{Annotation, DType, Shape};

    fn ty(s: &str) -> TypeDescriptor {
        type_grammar::parse(s).unwrap()
    }

    async fn dec(wire: &str, spec: &str) -> Result<Value, CodecError> {
        decode(wire, &ty(spec), &DecodeContext::default()).await
    }

    #[tokio::test]
    async fn test_float_list() {
        let value = dec("0.2,0.7,0.1", "[numeric/float]").await.unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Float(0.2),
                Value::Float(0.7),
                Value::Float(0.1)
            ])
        );
        assert_eq!(encode(&value, &ty("[numeric/float]")).unwrap(), "0.2,0.7,0.1");
    }

    #[tokio::test]
    async fn test_scalars() {
        assert_eq!(dec("42", "numeric/int").await.unwrap(), Value::Int(42));
        assert_eq!(dec("hello, world", "text").await.unwrap(), Value::Text("hello, world".into()));
        assert_eq!(dec("TRUE", "boolean").await.unwrap(), Value::Bool(true));
        assert_eq!(
            dec("3.5", "numeric/int").await.unwrap_err().kind(),
            CodecErrorKind::Syntax
        );

        assert_eq!(encode(&Value::Float(3.0), &ty("numeric")).unwrap(), "3.0");
        assert_eq!(encode(&Value::Int(3), &ty("numeric")).unwrap(), "3");
        assert_eq!(encode(&Value::Bool(false), &ty("boolean")).unwrap(), "false");
    }

    #[tokio::test]
    async fn test_text_list_segments_are_trimmed() {
        assert_eq!(
            dec("a, b", "[text]").await.unwrap(),
            Value::List(vec![Value::Text("a".into()), Value::Text("b".into())])
        );
        assert_eq!(
            dec(" 1 , 2", "[numeric/int]").await.unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[tokio::test]
    async fn test_text_list_encode_decode() {
        let descriptor = ty("[text]");
        for items in [vec!["a", "b c"], vec!["single"], vec![]] {
            let value = Value::List(items.into_iter().map(|s| Value::Text(s.into())).collect());
            value_validator::validate(&value, &descriptor).unwrap();
            let wire = encode(&value, &descriptor).unwrap();
            assert_eq!(dec(&wire, "[text]").await.unwrap(), value, "{wire:?}");
        }

        // A lone empty element would come back as an empty list.
        let lone_empty = Value::List(vec![Value::Text(String::new())]);
        assert!(value_validator::validate(&lone_empty, &descriptor).is_ok());
        assert!(encode(&lone_empty, &descriptor).is_err());
    }

    #[tokio::test]
    async fn test_empty_list() {
        assert_eq!(dec("", "[numeric/int]").await.unwrap(), Value::List(vec![]));
        assert_eq!(encode(&Value::List(vec![]), &ty("[numeric/int]")).unwrap(), "");
    }

    #[tokio::test]
    async fn test_image_data_url() {
        let data: Vec<u8> = (0..50).collect();
        let array = NdArray::from_slice(Shape::matrix(5, 10), &data).unwrap();
        let wire = encode(&Value::Array(array.clone()), &ty("ndarray/uint8/5/10")).unwrap();
        assert!(wire.starts_with("data:image/png;base64,"));

        let back = dec(&wire, "ndarray/uint8/5/10").await.unwrap();
        assert_eq!(back, Value::Array(array));
    }

    #[tokio::test]
    async fn test_npy_data_url() {
        let array = NdArray::from_slice(Shape::vector(3), &[1.0f64, 2.5, -3.0]).unwrap();
        let wire = encode(&Value::Array(array.clone()), &ty("ndarray/float64/3")).unwrap();
        assert!(wire.starts_with("data:ndarray/npy;base64,"));
        assert_eq!(
            dec(&wire, "ndarray/float64/").await.unwrap(),
            Value::Array(array)
        );
    }

    #[tokio::test]
    async fn test_npz_data_url() {
        let array = NdArray::from_slice(Shape::matrix(2, 2), &[1i32, 2, 3, 4]).unwrap();
        let wire = encode_npz(&array).unwrap();
        assert!(wire.starts_with("data:ndarray/npz;base64,"));
        assert_eq!(dec(&wire, "ndarray/int32//").await.unwrap(), Value::Array(array));

        let ctx = DecodeContext::default().with_max_fetch_bytes(64);
        let err = decode(&wire, &ty("ndarray/int32//"), &ctx).await.unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::ArrayContainer);
    }

    #[tokio::test]
    async fn test_decoded_array_is_checked() {
        let array = NdArray::zeros(Shape::matrix(4, 4), DType::UInt8);
        let wire = encode(&Value::Array(array), &ty("ndarray/uint8//")).unwrap();

        let err = dec(&wire, "ndarray/uint8/5/10").await.unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Mismatch);

        let err = dec(&wire, "ndarray/float32//").await.unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Mismatch);
    }

    #[tokio::test]
    async fn test_array_reference_errors() {
        let err = dec("ftp://example.com/a.png", "ndarray").await.unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::UnsupportedScheme);

        let err = dec("data:image/png;base64,!!!", "ndarray").await.unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Base64);

        let err = dec("data:image/png;base64,AAAA", "ndarray").await.unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Image);

        let err = dec("data:ndarray/npy;base64,AAAA", "ndarray").await.unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::ArrayContainer);
    }

    #[tokio::test]
    async fn test_array_list() {
        let a = NdArray::zeros(Shape::matrix(2, 2), DType::UInt8);
        let b = NdArray::zeros(Shape::vector(3), DType::Float32);
        let list = Value::List(vec![Value::Array(a), Value::Array(b)]);
        let wire = encode(&list, &ty("[ndarray]")).unwrap();
        assert_eq!(dec(&wire, "[ndarray]").await.unwrap(), list);
    }

    #[tokio::test]
    async fn test_annotations() {
        let rect = Value::Annotation(Annotation::rect(1.0, 2.0, 3.0, 4.0));
        let wire = encode(&rect, &ty("annotation")).unwrap();
        assert_eq!(wire, r#"["rect",[[1.0,2.0,3.0,4.0]]]"#);
        assert_eq!(dec(&wire, "annotation").await.unwrap(), rect);

        let list = Value::List(vec![rect.clone(), Value::Annotation(Annotation::point(5.0, 6.0))]);
        let wire = encode(&list, &ty("[annotation]")).unwrap();
        assert_eq!(dec(&wire, "[annotation]").await.unwrap(), list);
    }

    #[tokio::test]
    async fn test_json_forms() {
        let ctx = DecodeContext::default();
        let json = serde_json::json!([1, 2, 3]);
        assert_eq!(
            decode_json(&json, &ty("[numeric/int]"), &ctx).await.unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            decode_json(&serde_json::json!("1,2"), &ty("[numeric/int]"), &ctx).await.unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            decode_json(&serde_json::json!(0.5), &ty("numeric/float"), &ctx).await.unwrap(),
            Value::Float(0.5)
        );
        assert_eq!(
            decode_json(&serde_json::json!(true), &ty("boolean"), &ctx).await.unwrap(),
            Value::Bool(true)
        );
        assert!(decode_json(&serde_json::json!(1.5), &ty("numeric/int"), &ctx)
            .await
            .is_err());

        let value = Value::List(vec![Value::Float(0.25), Value::Int(2)]);
        assert_eq!(
            encode_json(&value, &ty("[numeric]")).unwrap(),
            serde_json::json!([0.25, 2])
        );
    }

    #[test]
    fn test_encode_errors() {
        let err = encode(&Value::Text("x".into()), &ty("numeric")).unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Encode);

        let err = encode(&Value::Int(1), &ty("[numeric]")).unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Encode);

        let list = Value::List(vec![Value::Text("a,b".into())]);
        assert!(encode(&list, &ty("[text]")).is_err());

        for element in ["", "  ", " padded", "tab\t"] {
            let list = Value::List(vec![Value::Text(element.into())]);
            assert_eq!(
                encode(&list, &ty("[text]")).unwrap_err().kind(),
                CodecErrorKind::Encode,
                "{element:?}"
            );
        }

        assert!(encode(&Value::Float(f64::NAN), &ty("numeric")).is_err());
    }

    #[tokio::test]
    async fn test_decode_bytes() {
        let ctx = DecodeContext::default();
        let array = NdArray::from_slice(Shape::vector(2), &[7u16, 8]).unwrap();
        let npy = container::write_npy(&array);
        assert_eq!(
            decode_bytes(&npy, &ty("ndarray/uint16/2"), &ctx).await.unwrap(),
            Value::Array(array)
        );
        assert_eq!(
            decode_bytes(b"12\n", &ty("numeric/int"), &ctx).await.unwrap(),
            Value::Int(12)
        );
    }
}
