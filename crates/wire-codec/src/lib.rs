// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # wire-codec
//!
//! Translates between the wire representation of method inputs and
//! outputs (plain strings, data URLs, remote or local file references,
//! JSON) and native [`value_core::Value`]s.
//!
//! ## Wire forms
//!
//! | Kind         | Wire form                                              |
//! |--------------|--------------------------------------------------------|
//! | `numeric`    | decimal string, `^-?\d+$` for `numeric/int`            |
//! | `text`       | the string itself                                      |
//! | `boolean`    | `true`/`false`/`1`/`0`, case-insensitive               |
//! | `ndarray`    | `data:` URL (`image/*`, `ndarray/npy`, `ndarray/npz`), |
//! |              | `http(s)://` or `file://` reference                    |
//! | `annotation` | JSON `["rect", [[x, y, w, h]]]`                        |
//! | `[T]`        | comma-separated elements, empty string is `[]`         |
//!
//! Decoded arrays are checked against the declared dtype and shape before
//! they are returned, so a bad payload fails with a [`CodecError`] naming
//! the offending segment. Encoding always produces a form that decodes
//! back to an equal value.

pub mod container;
mod codec;
mod error;
mod fetch;
pub mod image_codec;
mod reference;
mod scalar;

pub use codec::{decode, decode_bytes, decode_json, encode, encode_json, encode_npz};
pub use error::{CodecError, CodecErrorKind};
pub use fetch::{DecodeContext, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FETCH_BYTES};
pub use reference::{split_list, DataUrl, Scheme, MIME_NPY, MIME_NPZ, MIME_PNG};
