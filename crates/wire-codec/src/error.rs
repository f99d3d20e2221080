// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for wire encoding and decoding.

use crate::container::ContainerError;
use std::fmt;
use value_validator::ValidationError;

/// Longest segment quoted verbatim in an error message.
const MAX_SEGMENT_CHARS: usize = 80;

/// Shortens a wire segment for diagnostics. Data URLs can be megabytes long.
pub(crate) fn segment_label(segment: &str) -> String {
    if segment.chars().count() <= MAX_SEGMENT_CHARS {
        segment.to_string()
    } else {
        let head: String = segment.chars().take(MAX_SEGMENT_CHARS).collect();
        format!("{head}...")
    }
}

/// Coarse classification of a [`CodecError`], suitable for structured
/// error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecErrorKind {
    Syntax,
    UnsupportedScheme,
    Timeout,
    Unreachable,
    Base64,
    Image,
    ArrayContainer,
    Mismatch,
    Encode,
}

impl CodecErrorKind {
    /// Returns the snake_case name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            CodecErrorKind::Syntax => "syntax",
            CodecErrorKind::UnsupportedScheme => "unsupported_scheme",
            CodecErrorKind::Timeout => "timeout",
            CodecErrorKind::Unreachable => "unreachable",
            CodecErrorKind::Base64 => "base64",
            CodecErrorKind::Image => "image",
            CodecErrorKind::ArrayContainer => "array_container",
            CodecErrorKind::Mismatch => "mismatch",
            CodecErrorKind::Encode => "encode",
        }
    }
}

impl fmt::Display for CodecErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wire payload that could not be turned into a native value, or a native
/// value that could not be rendered for the wire.
///
/// Every variant names the offending segment (shortened if very long).
/// Codec errors are distinct from validation errors: they mean no native
/// value could be constructed at all.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A plain string is not in the lexical form the slot requires.
    #[error("cannot parse '{segment}' as {expected}")]
    Syntax { segment: String, expected: String },

    /// A reference uses a scheme or data-URL form that is not supported.
    #[error("unsupported reference '{segment}': {detail}")]
    UnsupportedScheme { segment: String, detail: String },

    /// Fetching a remote or local resource exceeded the configured timeout.
    #[error("timed out after {timeout_ms} ms fetching '{segment}'")]
    Timeout { segment: String, timeout_ms: u128 },

    /// A remote or local resource could not be fetched.
    #[error("cannot fetch '{segment}': {detail}")]
    Unreachable { segment: String, detail: String },

    /// A data-URL payload is not valid base64.
    #[error("malformed base64 payload in '{segment}': {source}")]
    Base64 {
        segment: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Image bytes could not be decoded or encoded.
    #[error("image codec failed for '{segment}': {source}")]
    Image {
        segment: String,
        #[source]
        source: image::ImageError,
    },

    /// A `.npy`/`.npz` container could not be read or written.
    #[error("array container failed for '{segment}': {source}")]
    ArrayContainer {
        segment: String,
        #[source]
        source: ContainerError,
    },

    /// A decoded array disagrees with the declared dtype or shape.
    #[error("value decoded from '{segment}' does not match the declared type: {source}")]
    Mismatch {
        segment: String,
        #[source]
        source: ValidationError,
    },

    /// A native value cannot be rendered for the declared type.
    #[error("cannot encode {actual} as {descriptor}: {detail}")]
    Encode {
        descriptor: String,
        actual: String,
        detail: String,
    },
}

impl CodecError {
    /// Returns the coarse error kind.
    pub fn kind(&self) -> CodecErrorKind {
        match self {
            CodecError::Syntax { .. } => CodecErrorKind::Syntax,
            CodecError::UnsupportedScheme { .. } => CodecErrorKind::UnsupportedScheme,
            CodecError::Timeout { .. } => CodecErrorKind::Timeout,
            CodecError::Unreachable { .. } => CodecErrorKind::Unreachable,
            CodecError::Base64 { .. } => CodecErrorKind::Base64,
            CodecError::Image { .. } => CodecErrorKind::Image,
            CodecError::ArrayContainer { .. } => CodecErrorKind::ArrayContainer,
            CodecError::Mismatch { .. } => CodecErrorKind::Mismatch,
            CodecError::Encode { .. } => CodecErrorKind::Encode,
        }
    }

    pub(crate) fn syntax(segment: &str, expected: impl Into<String>) -> Self {
        CodecError::Syntax {
            segment: segment_label(segment),
            expected: expected.into(),
        }
    }

    pub(crate) fn unsupported(segment: &str, detail: impl Into<String>) -> Self {
        CodecError::UnsupportedScheme {
            segment: segment_label(segment),
            detail: detail.into(),
        }
    }

    pub(crate) fn unreachable(segment: &str, detail: impl fmt::Display) -> Self {
        CodecError::Unreachable {
            segment: segment_label(segment),
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_label_truncates() {
        let long = format!("data:image/png;base64,{}", "A".repeat(500));
        let label = segment_label(&long);
        assert!(label.len() < 100);
        assert!(label.ends_with("..."));
        assert_eq!(segment_label("short"), "short");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CodecErrorKind::Timeout.as_str(), "timeout");
        assert_eq!(CodecErrorKind::ArrayContainer.to_string(), "array_container");
        let err = CodecError::syntax("abc", "an integer");
        assert_eq!(err.kind(), CodecErrorKind::Syntax);
        assert_eq!(err.to_string(), "cannot parse 'abc' as an integer");
    }
}
