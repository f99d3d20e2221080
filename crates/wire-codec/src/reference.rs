// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Array references (data URLs, `http(s)://` and `file://`) and list
//! splitting.

use crate::CodecError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const MIME_PNG: &str = "image/png";
pub const MIME_NPY: &str = "ndarray/npy";
pub const MIME_NPZ: &str = "ndarray/npz";

/// The scheme of an array reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Data,
    Http,
    File,
}

impl Scheme {
    /// Detects the scheme prefix of a (trimmed) wire segment.
    pub fn of(segment: &str) -> Option<Scheme> {
        let prefix = |p: &str| {
            segment
                .get(..p.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(p))
        };
        if prefix("data:") {
            Some(Scheme::Data)
        } else if prefix("http://") || prefix("https://") {
            Some(Scheme::Http)
        } else if prefix("file://") {
            Some(Scheme::File)
        } else {
            None
        }
    }
}

/// A decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    /// Parses a base64 data URL. Media-type parameters other than
    /// `;base64` are ignored.
    pub fn parse(url: &str) -> Result<DataUrl, CodecError> {
        let rest = url
            .get(5..)
            .filter(|_| Scheme::of(url) == Some(Scheme::Data))
            .ok_or_else(|| CodecError::syntax(url, "a data URL"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CodecError::syntax(url, "a data URL with a ',' separator"))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(CodecError::unsupported(
                url,
                "only base64-encoded data URLs are supported",
            ));
        }

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|source| CodecError::Base64 {
                segment: crate::error::segment_label(url),
                source,
            })?;
        Ok(DataUrl { mime, data })
    }

    /// Renders `data:<mime>;base64,<payload>`.
    pub fn render(mime: &str, data: &[u8]) -> String {
        format!("data:{mime};base64,{}", STANDARD.encode(data))
    }
}

/// Splits a list wire string into element segments.
///
/// Segments are trimmed. Plain kinds split on every comma. When `references` is set (list of
/// arrays), a `data:` header is rejoined with its payload, and a token that
/// carries no scheme is rejoined with the `http(s)://` or `file://`
/// reference before it. An empty string is an empty list.
pub fn split_list(wire: &str, references: bool) -> Vec<&str> {
    if wire.trim().is_empty() {
        return Vec::new();
    }
    if !references {
        return wire.split(',').map(str::trim).collect();
    }

    // Segments as byte ranges into `wire` so joined tokens stay borrowed.
    let mut segments: Vec<(usize, usize)> = Vec::new();
    let mut pending_data_header = false;
    let mut start = 0;
    for token in wire.split(',') {
        let end = start + token.len();
        let trimmed = token.trim();
        let join = match segments.last() {
            Some(_) if pending_data_header => true,
            Some(&(s, e)) => {
                Scheme::of(trimmed).is_none()
                    && matches!(
                        Scheme::of(wire[s..e].trim()),
                        Some(Scheme::Http | Scheme::File)
                    )
            }
            None => false,
        };
        if join {
            if let Some(last) = segments.last_mut() {
                last.1 = end;
            }
            pending_data_header = false;
        } else {
            segments.push((start, end));
            pending_data_header = Scheme::of(trimmed) == Some(Scheme::Data);
        }
        start = end + 1;
    }
    segments.into_iter().map(|(s, e)| wire[s..e].trim()).collect()
}
