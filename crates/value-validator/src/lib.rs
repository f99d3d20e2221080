// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # value-validator
//!
//! Checks native [`value_core::Value`]s against parsed
//! [`type_grammar::TypeDescriptor`]s.
//!
//! - [`validate`]: one value against one descriptor.
//! - [`validate_slots`]: a positional input or output sequence against the
//!   slot descriptors of a method, in call-signature order.
//!
//! Validation is a free function with no state: it is parameterised only by
//! the descriptor, never mutates its arguments, and is safe to call from any
//! number of threads at once. Failures are returned as [`ValidationError`]
//! values for the caller to branch on.

mod error;
mod validate;

use std::fmt;

pub use error::ValidationError;
pub use validate::{validate, validate_kind, validate_slots};

/// Which side of a method call a positional sequence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Arguments, checked before the method runs. Failures are caller errors.
    Input,
    /// Results, checked after the method runs. Failures are implementation bugs.
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Input => "input",
            Direction::Output => "output",
        })
    }
}
