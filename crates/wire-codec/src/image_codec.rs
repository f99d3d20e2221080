// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Image payloads to and from `uint8` arrays.
//!
//! Decoded layouts:
//! - grayscale → `(h, w)`
//! - RGB → `(h, w, 3)`
//! - anything with alpha → `(h, w, 4)`
//!
//! Deeper images (16-bit, float) are converted to 8 bits per channel.

use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageBuffer, ImageError, ImageFormat};
use std::io::Cursor;
use value_core::{DType, NdArray, Shape};

/// Decodes PNG/JPEG/GIF/BMP/TIFF bytes into a `uint8` array.
pub fn decode_image(bytes: &[u8]) -> Result<NdArray, ImageError> {
    let img = image::load_from_memory(bytes)?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    let color = img.color();

    let (shape, data) = if color.has_alpha() {
        (Shape::new(vec![h, w, 4]), img.into_rgba8().into_raw())
    } else if color.has_color() {
        (Shape::new(vec![h, w, 3]), img.into_rgb8().into_raw())
    } else {
        (Shape::matrix(h, w), img.into_luma8().into_raw())
    };

    NdArray::from_bytes(shape, DType::UInt8, data).map_err(|_| dimension_mismatch())
}

/// Returns true if the array can be written as a PNG: `uint8`, image
/// layout, and no empty axis.
pub fn is_png_encodable(array: &NdArray) -> bool {
    array.dtype() == DType::UInt8 && array.shape().is_image_layout() && !array.is_empty()
}

/// Encodes an image-layout `uint8` array as PNG bytes.
pub fn encode_png(array: &NdArray) -> Result<Vec<u8>, ImageError> {
    if !is_png_encodable(array) {
        return Err(dimension_mismatch());
    }
    let dims = array.shape().dims();
    let h = u32::try_from(dims[0]).map_err(|_| dimension_mismatch())?;
    let w = u32::try_from(dims[1]).map_err(|_| dimension_mismatch())?;
    let data = array.as_bytes().to_vec();

    let img = match dims.get(2) {
        None => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        Some(3) => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        Some(_) => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
    }
    .ok_or_else(dimension_mismatch)?;

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

fn dimension_mismatch() -> ImageError {
    ImageError::Parameter(ParameterError::from_kind(
        ParameterErrorKind::DimensionMismatch,
    ))
}
