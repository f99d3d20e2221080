// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for native value construction.

use crate::{DType, Shape};

/// Errors that can occur when constructing or accessing native values.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// The provided buffer size does not match the expected size for the given shape and dtype.
    #[error("buffer size mismatch for shape {shape}: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        shape: Shape,
        expected: usize,
        actual: usize,
    },

    /// Typed access was requested with the wrong element type.
    #[error("dtype mismatch: array holds {actual}, requested {requested}")]
    DTypeMismatch { requested: DType, actual: DType },
}
