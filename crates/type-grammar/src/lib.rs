// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # type-grammar
//!
//! A compact, mime-type-like grammar for declaring the shape, element type
//! and nesting of method inputs and outputs.
//!
//! - [`parse`] turns a string such as `"ndarray/uint8///3"` or
//!   `"[numeric/float]"` into a [`TypeDescriptor`].
//! - `Display` on [`TypeDescriptor`] renders the canonical string form.
//! - [`GrammarError`] reports malformed strings with the offending token.
//!
//! Descriptors are immutable after parsing and hold no shared state, so a
//! specification parsed once at startup can be read from any thread.

mod descriptor;
mod error;
mod parser;

pub use descriptor::{
    ArraySpec, ArraySubtype, BoolSubtype, Dim, NumericSubtype, TextSubtype, TypeDescriptor,
    TypeKind,
};
pub use error::GrammarError;
pub use parser::parse;
