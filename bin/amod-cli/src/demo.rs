// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The bundled demo method: bright-pixel segmentation.
//!
//! Inputs `(image: ndarray/uint8///3, threshold: numeric)`, outputs
//! `(mask: ndarray/uint8//, count: numeric/int)`. A pixel is bright when
//! the mean over its channels exceeds the threshold; bright pixels are 255
//! in the mask and 0 elsewhere.

use anyhow::Context;
use value_core::{NdArray, Shape, Value};

pub fn bright_pixels(inputs: &[Value]) -> anyhow::Result<Vec<Value>> {
    let [Value::Array(image), threshold] = inputs else {
        anyhow::bail!("expected (image, threshold), got {} input(s)", inputs.len());
    };
    let threshold = threshold
        .as_f64()
        .context("threshold must be a number")?;

    let (h, w, channels) = match image.shape().dims() {
        [h, w] => (*h, *w, 1),
        [h, w, c] if *c > 0 => (*h, *w, *c),
        _ => anyhow::bail!("expected an image, got shape {}", image.shape()),
    };
    let pixels = image.as_u8_slice()?;

    let mask: Vec<u8> = pixels
        .chunks_exact(channels)
        .map(|p| {
            let mean = p.iter().map(|&c| f64::from(c)).sum::<f64>() / channels as f64;
            if mean > threshold {
                255
            } else {
                0
            }
        })
        .collect();
    let count = mask.iter().filter(|&&m| m == 255).count();
    tracing::debug!("{} of {} pixel(s) above {}", count, h * w, threshold);

    Ok(vec![
        Value::Array(NdArray::from_slice(Shape::matrix(h, w), &mask)?),
        Value::Int(i64::try_from(count)?),
    ])
}
