// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # value-core
//!
//! The native value domain of an analytics module's method slots.
//!
//! This crate provides:
//! - [`Value`]: the tagged native value handed to and returned from methods
//!   (integers, floats, text, booleans, arrays, annotations, lists).
//! - [`NdArray`]: an n-dimensional numeric array with a runtime dtype tag.
//! - [`Shape`]: array shape descriptors.
//! - [`DType`]: supported array element types (bool, signed/unsigned
//!   integers, float32/float64) with their `.npy` descriptors.
//! - [`Annotation`] / [`ShapeKind`]: geometric annotations (point, circle,
//!   ellipse, rect, polyline).
//!
//! All types are plain owned data. Nothing here performs I/O, so values can
//! be shared freely across threads once built.

mod annotation;
mod array;
mod dtype;
mod error;
mod shape;
mod value;

pub use annotation::{Annotation, ShapeKind};
pub use array::{Element, NdArray};
pub use dtype::DType;
pub use error::ValueError;
pub use shape::Shape;
pub use value::Value;
