// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for specification loading.

use crate::CategoryName;
use type_grammar::GrammarError;

/// Errors that make a specification document unusable.
///
/// All of these are raised at load time; a module whose specification
/// fails to load must not serve any request.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The specification file could not be read.
    #[error("failed to read specification: {0}")]
    Read(#[from] std::io::Error),

    /// The document is not valid JSON or has the wrong structure.
    #[error("failed to parse specification: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required top-level section is absent.
    #[error("specification is missing the '{0}' section")]
    MissingSection(&'static str),

    /// An input or output entry lacks a required key.
    #[error("method '{method}': {direction} {index} is missing '{field}'")]
    MissingField {
        method: String,
        direction: &'static str,
        index: usize,
        field: &'static str,
    },

    /// A slot's type-specification string does not parse.
    #[error("method '{method}', slot '{slot}': {source}")]
    InvalidType {
        method: String,
        slot: String,
        #[source]
        source: GrammarError,
    },

    /// An output category name is not recognised.
    #[error("method '{method}', output '{slot}': unknown category '{category}'")]
    UnknownCategory {
        method: String,
        slot: String,
        category: String,
    },

    /// A category that needs labels has none.
    #[error("method '{method}', output '{slot}': category '{category}' requires labels")]
    MissingLabels {
        method: String,
        slot: String,
        category: CategoryName,
    },

    /// A test-case row does not have one value per input and output.
    #[error("method '{method}', test case {row}: expected {expected} values, got {actual}")]
    TestCaseArity {
        method: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
}
