// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Multi-dimensional numeric array type.

use crate::{DType, Shape, ValueError};
use std::fmt;

/// A Rust scalar type that can be stored in an [`NdArray`].
///
/// Implemented for `bool` and every primitive integer/float type that has a
/// matching [`DType`].
pub trait Element: Copy + PartialEq + fmt::Debug {
    /// The dtype tag for this element type.
    const DTYPE: DType;

    /// Appends the little-endian encoding of `self` to `out`.
    fn write_le(self, out: &mut Vec<u8>);

    /// Reads one element from exactly `DTYPE.size_bytes()` little-endian bytes.
    fn read_le(bytes: &[u8]) -> Self;

    /// Widens the element to `f64` for numeric comparison.
    fn to_f64(self) -> f64;
}

macro_rules! impl_element {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_element!(i8, DType::Int8);
impl_element!(i16, DType::Int16);
impl_element!(i32, DType::Int32);
impl_element!(i64, DType::Int64);
impl_element!(u8, DType::UInt8);
impl_element!(u16, DType::UInt16);
impl_element!(u32, DType::UInt32);
impl_element!(u64, DType::UInt64);
impl_element!(f32, DType::Float32);
impl_element!(f64, DType::Float64);

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}

/// Reads the element at the start of `bytes` as `f64`, dispatching on `dtype`.
fn element_f64(dtype: DType, bytes: &[u8]) -> f64 {
    match dtype {
        DType::Bool => bool::read_le(bytes).to_f64(),
        DType::Int8 => i8::read_le(bytes).to_f64(),
        DType::Int16 => i16::read_le(bytes).to_f64(),
        DType::Int32 => i32::read_le(bytes).to_f64(),
        DType::Int64 => i64::read_le(bytes).to_f64(),
        DType::UInt8 => u8::read_le(bytes).to_f64(),
        DType::UInt16 => u16::read_le(bytes).to_f64(),
        DType::UInt32 => u32::read_le(bytes).to_f64(),
        DType::UInt64 => u64::read_le(bytes).to_f64(),
        DType::Float32 => f32::read_le(bytes).to_f64(),
        DType::Float64 => f64::read_le(bytes).to_f64(),
    }
}

/// An owned, n-dimensional numeric array stored in contiguous memory.
///
/// `NdArray` is the native value behind every `ndarray/...` slot. Its
/// dtype is a runtime tag rather than a type parameter, because the
/// element type of a decoded payload is only known after reading it.
///
/// # Memory Layout
/// Data is stored in row-major (C) order as a flat little-endian byte
/// buffer. Typed access goes through [`to_vec`](NdArray::to_vec) and
/// [`as_u8_slice`](NdArray::as_u8_slice).
#[derive(Debug, Clone)]
pub struct NdArray {
    shape: Shape,
    dtype: DType,
    data: Vec<u8>,
}

impl NdArray {
    /// Creates a new array filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use value_core::{NdArray, Shape, DType};
    /// let a = NdArray::zeros(Shape::matrix(2, 3), DType::UInt16);
    /// assert_eq!(a.size_bytes(), 12); // 2 * 3 * 2 bytes
    /// ```
    pub fn zeros(shape: Shape, dtype: DType) -> Self {
        let size = shape.size_bytes(dtype);
        Self {
            shape,
            dtype,
            data: vec![0u8; size],
        }
    }

    /// Creates an array from raw little-endian bytes.
    ///
    /// Returns an error if the buffer size does not match `shape.size_bytes(dtype)`.
    pub fn from_bytes(shape: Shape, dtype: DType, data: Vec<u8>) -> Result<Self, ValueError> {
        let expected = shape.checked_size_bytes(dtype);
        if expected != Some(data.len()) {
            return Err(ValueError::BufferSizeMismatch {
                shape,
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }
        Ok(Self { shape, dtype, data })
    }

    /// Creates an array from a slice of typed elements.
    ///
    /// # Examples
    /// ```
    /// use value_core::{NdArray, Shape, DType};
    /// let a = NdArray::from_slice(Shape::vector(3), &[1u8, 2, 3]).unwrap();
    /// assert_eq!(a.dtype(), DType::UInt8);
    /// assert_eq!(a.to_vec::<u8>().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn from_slice<T: Element>(shape: Shape, values: &[T]) -> Result<Self, ValueError> {
        let expected_elements = shape.num_elements();
        if values.len() != expected_elements {
            return Err(ValueError::BufferSizeMismatch {
                expected: expected_elements * T::DTYPE.size_bytes(),
                actual: values.len() * T::DTYPE.size_bytes(),
                shape,
            });
        }
        let mut data = Vec::with_capacity(values.len() * T::DTYPE.size_bytes());
        for v in values {
            v.write_le(&mut data);
        }
        Ok(Self {
            shape,
            dtype: T::DTYPE,
            data,
        })
    }

    /// Returns the array's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the array's element type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the raw little-endian byte buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the memory footprint of this array in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.shape.num_elements()
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the buffer as `u8` pixels.
    ///
    /// Fails unless the dtype is [`DType::UInt8`].
    pub fn as_u8_slice(&self) -> Result<&[u8], ValueError> {
        if self.dtype != DType::UInt8 {
            return Err(ValueError::DTypeMismatch {
                requested: DType::UInt8,
                actual: self.dtype,
            });
        }
        Ok(&self.data)
    }

    /// Copies the elements out as a typed vector.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, ValueError> {
        if self.dtype != T::DTYPE {
            return Err(ValueError::DTypeMismatch {
                requested: T::DTYPE,
                actual: self.dtype,
            });
        }
        Ok(self
            .data
            .chunks_exact(self.dtype.size_bytes())
            .map(T::read_le)
            .collect())
    }

    /// Returns the element at a flat (row-major) index widened to `f64`.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        let size = self.dtype.size_bytes();
        let start = index.checked_mul(size)?;
        let bytes = self.data.get(start..start + size)?;
        Some(element_f64(self.dtype, bytes))
    }

    /// Iterates over all elements in row-major order, widened to `f64`.
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        let dtype = self.dtype;
        self.data
            .chunks_exact(dtype.size_bytes())
            .map(move |chunk| element_f64(dtype, chunk))
    }

    /// Returns the flat index of the first element that differs numerically
    /// from `other`, or `None` when every element is equal.
    ///
    /// Both arrays must have the same number of elements; extra elements on
    /// either side count as a difference at the shorter length.
    pub fn first_difference(&self, other: &NdArray) -> Option<usize> {
        let mut lhs = self.iter_f64();
        let mut rhs = other.iter_f64();
        let mut index = 0;
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return None,
                (Some(a), Some(b)) if a == b || (a.is_nan() && b.is_nan()) => index += 1,
                _ => return Some(index),
            }
        }
    }

    /// Returns a one-line description, e.g. `ndarray<uint8>(5, 10)`.
    pub fn summary(&self) -> String {
        format!("ndarray<{}>{}", self.dtype, self.shape)
    }
}

/// Arrays are equal when dtype, shape and every element agree numerically.
/// NaN elements compare equal to each other.
impl PartialEq for NdArray {
    fn eq(&self, other: &Self) -> bool {
        self.dtype == other.dtype
            && self.shape == other.shape
            && self.first_difference(other).is_none()
    }
}
