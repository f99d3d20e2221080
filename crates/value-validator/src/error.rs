// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for value validation.

use crate::Direction;
use value_core::{DType, Shape};

/// A native value that disagrees with its type descriptor.
///
/// Each variant names the failing kind, the expected constraint and what
/// was actually observed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A list-wrapped slot received something other than a list.
    #[error("expected a list of {expected}, got {actual}")]
    NotAList { expected: String, actual: String },

    /// An element of a list failed validation.
    #[error("list element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },

    /// The value is of the wrong kind altogether.
    #[error("{kind}: expected {expected}, got {actual}")]
    TypeMismatch {
        kind: &'static str,
        expected: String,
        actual: String,
    },

    /// `numeric/int` received a non-integer number.
    #[error("numeric/int: expected an exact integer, got {value}")]
    NotAnInteger { value: f64 },

    /// A numeric slot received NaN or an infinity.
    #[error("numeric: expected a finite number, got {value}")]
    NonFinite { value: f64 },

    /// The array's element type differs from the declared one.
    #[error("ndarray: expected dtype {expected}, got {actual}")]
    DTypeMismatch { expected: DType, actual: DType },

    /// The array's rank differs from the number of declared dims.
    #[error("ndarray: expected rank {expected}, got shape {actual}")]
    RankMismatch { expected: usize, actual: Shape },

    /// A fixed dimension does not match.
    #[error("ndarray: expected size {expected} along axis {axis}, got shape {actual}")]
    AxisMismatch {
        axis: usize,
        expected: usize,
        actual: Shape,
    },

    /// A constrained axis has size zero.
    #[error("ndarray: axis {axis} must have a positive size, got shape {actual}")]
    EmptyAxis { axis: usize, actual: Shape },

    /// `ndarray/image` received an array that is not laid out like an image.
    #[error("ndarray/image: expected shape (h, w), (h, w, 3) or (h, w, 4), got {actual}")]
    NotAnImage { actual: Shape },

    /// The annotation tag is not one of the recognised shapes.
    #[error("annotation: unknown shape '{shape}'")]
    UnknownShape { shape: String },

    /// A coordinate tuple has the wrong number of components.
    #[error(
        "annotation({shape}): coordinate tuple {index} has {actual} components, expected {expected}"
    )]
    Arity {
        shape: String,
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// A coordinate component is NaN or infinite.
    #[error("annotation({shape}): coordinate tuple {index} has a non-finite component")]
    NonFiniteCoordinate { shape: String, index: usize },

    /// The positional sequence and the slot list differ in length.
    #[error("{direction} count mismatch: expected {expected}, got {actual}")]
    ArgumentCount {
        direction: Direction,
        expected: usize,
        actual: usize,
    },

    /// A positional value failed validation against its slot.
    #[error("{direction} {index} ('{name}'): {source}")]
    Slot {
        direction: Direction,
        index: usize,
        name: String,
        #[source]
        source: Box<ValidationError>,
    },
}
