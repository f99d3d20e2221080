// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for type-specification parsing.

/// A malformed type-specification string.
///
/// Every variant carries the offending substring so that load-time
/// diagnostics can point at it directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// The specification (or the inside of its brackets) is empty.
    #[error("empty type specification")]
    Empty,

    /// The first token is not one of the five main types.
    #[error("unknown main type '{token}'")]
    UnknownMainType { token: String },

    /// The subtype is not valid for the main type.
    #[error("unknown subtype '{token}' for {kind}")]
    UnknownSubtype { kind: &'static str, token: String },

    /// The main type does not take a subtype at all.
    #[error("{kind} does not take a subtype, found '{token}'")]
    UnexpectedSubtype { kind: &'static str, token: String },

    /// A dimension token is neither empty nor a positive integer.
    #[error("invalid dimension '{token}' in '{spec}'")]
    InvalidDim { token: String, spec: String },

    /// Dimension tokens were given for a main type other than `ndarray`.
    #[error("{kind} does not take dimensions: '{spec}'")]
    DimsNotAllowed { kind: &'static str, spec: String },

    /// `ndarray/image` has a fixed shape rule and cannot be combined with dims.
    #[error("ndarray/image cannot be combined with dimensions: '{spec}'")]
    ImageWithDims { spec: String },

    /// Unbalanced or misplaced list brackets.
    #[error("bracket mismatch in '{spec}'")]
    BracketMismatch { spec: String },

    /// A list of lists was requested.
    #[error("nested lists are not supported: '{spec}'")]
    NestedList { spec: String },
}

impl GrammarError {
    /// Returns the offending substring.
    pub fn offending(&self) -> &str {
        match self {
            GrammarError::Empty => "",
            GrammarError::UnknownMainType { token }
            | GrammarError::UnknownSubtype { token, .. }
            | GrammarError::UnexpectedSubtype { token, .. }
            | GrammarError::InvalidDim { token, .. } => token,
            GrammarError::DimsNotAllowed { spec, .. }
            | GrammarError::ImageWithDims { spec }
            | GrammarError::BracketMismatch { spec }
            | GrammarError::NestedList { spec } => spec,
        }
    }
}
