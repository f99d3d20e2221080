// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the harness.

use value_validator::ValidationError;
use wire_codec::CodecError;

/// Setup errors: configuration, specification loading and method
/// registration.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The specification document failed to load.
    #[error("specification error: {0}")]
    Spec(#[from] module_spec::SpecError),

    /// A method name does not appear in the specification.
    #[error("method '{name}' is not declared in the specification")]
    UnknownMethod { name: String },

    /// A declared method has no registered implementation.
    #[error("method '{name}' has no registered implementation")]
    NotImplemented { name: String },
}

/// A per-call failure at the method invocation boundary.
///
/// These never affect later calls; each maps to a structured
/// [`ErrorResponse`] for the caller.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The requested method is not declared or not registered.
    #[error("unknown method '{method}'")]
    UnknownMethod { method: String },

    /// The wrong number of arguments was supplied.
    #[error("method '{method}' takes {expected} argument(s), got {actual}")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// A wire value could not be decoded or a result could not be encoded.
    #[error("'{field}': {source}")]
    Codec {
        field: String,
        #[source]
        source: CodecError,
    },

    /// A decoded argument disagrees with its declared type. Caller error.
    #[error("invalid input: {0}")]
    InvalidInput(#[source] ValidationError),

    /// A result disagrees with its declared type. Implementation bug.
    #[error("invalid output: {0}")]
    InvalidOutput(#[source] ValidationError),

    /// The implementation itself returned an error.
    #[error("method '{method}' failed: {source:#}")]
    Method {
        method: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CallError {
    /// Returns the snake_case error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::UnknownMethod { .. } => "unknown_method",
            CallError::ArgumentCount { .. } => "argument_count",
            CallError::Codec { .. } => "codec",
            CallError::InvalidInput(_) => "invalid_input",
            CallError::InvalidOutput(_) => "invalid_output",
            CallError::Method { .. } => "method",
        }
    }

    /// Returns the name of the offending slot, when one is known.
    pub fn field(&self) -> Option<&str> {
        match self {
            CallError::Codec { field, .. } => Some(field.as_str()),
            CallError::InvalidInput(ValidationError::Slot { name, .. })
            | CallError::InvalidOutput(ValidationError::Slot { name, .. }) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Builds the structured response for this error.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            kind: self.kind(),
            message: self.to_string(),
            field: self.field().map(str::to_string),
            codec_kind: match self {
                CallError::Codec { source, .. } => Some(source.kind()),
                _ => None,
            },
        }
    }
}

/// Serialisable error body: kind, human-readable message and the field
/// that caused it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_kind: Option<wire_codec::CodecErrorKind>,
}
