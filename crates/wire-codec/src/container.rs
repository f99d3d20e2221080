// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `.npy` and `.npz` array containers.
//!
//! # NPY layout
//! ```text
//! ┌──────────────┬───────┬──────────────┬──────────────────┬──────────────┐
//! │ \x93NUMPY    │ major │ minor        │ header_len       │ header dict  │
//! │ (6 bytes)    │ (u8)  │ (u8)         │ u16 LE (v1)      │ ASCII, ends  │
//! │              │       │              │ u32 LE (v2, v3)  │ with '\n'    │
//! ├──────────────┴───────┴──────────────┴──────────────────┴──────────────┤
//! │ raw element data (C or Fortran order, byte order per 'descr')         │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An `.npz` file is a zip archive of `.npy` members. Only the first
//! member is read.

use regex::Regex;
use std::io::{Cursor, Read, Write};
use std::sync::LazyLock;
use value_core::{DType, NdArray, Shape};
use zip::write::SimpleFileOptions;

const NPY_MAGIC: &[u8] = b"\x93NUMPY";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const HEADER_ALIGN: usize = 64;

/// Member name used when writing a single-array `.npz`.
pub const NPZ_MEMBER: &str = "arr_0.npy";

static DESCR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]descr['"]\s*:\s*['"]([^'"]*)['"]"#).expect("descr pattern is valid")
});
static FORTRAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]fortran_order['"]\s*:\s*(True|False)"#).expect("fortran pattern is valid")
});
static SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]shape['"]\s*:\s*\(([^)]*)\)"#).expect("shape pattern is valid")
});

/// Failure reading or writing an array container.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("missing NUMPY magic string")]
    BadMagic,

    #[error("unsupported NPY format version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("truncated data: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("malformed NPY header: {0}")]
    BadHeader(String),

    #[error("unsupported element type '{0}'")]
    UnsupportedDescr(String),

    #[error("archive contains no arrays")]
    EmptyArchive,

    #[error("archive member exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns true if `bytes` start with the NPY magic string.
pub fn is_npy(bytes: &[u8]) -> bool {
    bytes.starts_with(NPY_MAGIC)
}

/// Returns true if `bytes` look like a zip archive.
pub fn is_npz(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(ZIP_EMPTY_MAGIC)
}

/// Reads a single array from `.npy` bytes.
///
/// Big-endian payloads are byte-swapped and Fortran-ordered payloads are
/// reordered, so the result is always little-endian C order.
pub fn read_npy(bytes: &[u8]) -> Result<NdArray, ContainerError> {
    if !is_npy(bytes) {
        return Err(ContainerError::BadMagic);
    }
    let preamble = bytes.get(..8).ok_or(ContainerError::Truncated {
        expected: 8,
        actual: bytes.len(),
    })?;
    let (major, minor) = (preamble[6], preamble[7]);

    let (len_width, header_start) = match major {
        1 => (2, 10),
        2 | 3 => (4, 12),
        _ => return Err(ContainerError::UnsupportedVersion { major, minor }),
    };
    let len_bytes = bytes
        .get(8..8 + len_width)
        .ok_or(ContainerError::Truncated {
            expected: header_start,
            actual: bytes.len(),
        })?;
    let header_len = len_bytes
        .iter()
        .rev()
        .fold(0usize, |acc, b| (acc << 8) | usize::from(*b));

    let data_start = header_start + header_len;
    let header_bytes = bytes
        .get(header_start..data_start)
        .ok_or(ContainerError::Truncated {
            expected: data_start,
            actual: bytes.len(),
        })?;
    let header = std::str::from_utf8(header_bytes)
        .map_err(|_| ContainerError::BadHeader("header is not valid text".into()))?;
    let header = parse_header(header)?;

    let size = header
        .shape
        .checked_size_bytes(header.dtype)
        .ok_or_else(|| ContainerError::BadHeader(format!("shape {} is too large", header.shape)))?;
    let payload = &bytes[data_start..];
    if payload.len() < size {
        return Err(ContainerError::Truncated {
            expected: size,
            actual: payload.len(),
        });
    }
    let mut data = payload[..size].to_vec();

    if header.big_endian {
        swap_byte_order(&mut data, header.dtype.size_bytes());
    }
    if header.fortran_order && header.shape.rank() > 1 {
        data = fortran_to_c(&data, &header.shape, header.dtype.size_bytes());
    }

    NdArray::from_bytes(header.shape, header.dtype, data)
        .map_err(|e| ContainerError::BadHeader(e.to_string()))
}

/// Serialises an array as NPY version 1.0 (2.0 if the header is too long).
pub fn write_npy(array: &NdArray) -> Vec<u8> {
    let dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        array.dtype().npy_descr(),
        shape_tuple(array.shape()),
    );

    let mut version = 1u8;
    let mut prefix_len = 10;
    if aligned_header_len(dict.len(), prefix_len) > usize::from(u16::MAX) {
        version = 2;
        prefix_len = 12;
    }
    let header_len = aligned_header_len(dict.len(), prefix_len);

    let mut out = Vec::with_capacity(prefix_len + header_len + array.size_bytes());
    out.extend_from_slice(NPY_MAGIC);
    out.push(version);
    out.push(0);
    if version == 1 {
        out.extend_from_slice(&(header_len as u16).to_le_bytes());
    } else {
        out.extend_from_slice(&(header_len as u32).to_le_bytes());
    }
    out.extend_from_slice(dict.as_bytes());
    out.resize(prefix_len + header_len - 1, b' ');
    out.push(b'\n');
    out.extend_from_slice(array.as_bytes());
    out
}

/// Reads the first array stored in `.npz` bytes.
///
/// At most `limit` bytes are decompressed, whatever size the archive declares.
pub fn read_npz(bytes: &[u8], limit: usize) -> Result<NdArray, ContainerError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    if archive.len() == 0 {
        return Err(ContainerError::EmptyArchive);
    }
    let member = archive.by_index(0)?;
    tracing::trace!(member = member.name(), size = member.size(), "reading npz member");
    if member.size() > limit as u64 {
        return Err(ContainerError::TooLarge { limit });
    }
    let mut buf = Vec::with_capacity(member.size() as usize);
    member.take(limit as u64 + 1).read_to_end(&mut buf)?;
    if buf.len() > limit {
        return Err(ContainerError::TooLarge { limit });
    }
    read_npy(&buf)
}

/// Serialises an array as a single-member, uncompressed `.npz` archive.
pub fn write_npz(array: &NdArray) -> Result<Vec<u8>, ContainerError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file(NPZ_MEMBER, options)?;
    writer.write_all(&write_npy(array))?;
    Ok(writer.finish()?.into_inner())
}

struct Header {
    dtype: DType,
    big_endian: bool,
    fortran_order: bool,
    shape: Shape,
}

fn parse_header(header: &str) -> Result<Header, ContainerError> {
    let descr = DESCR_RE
        .captures(header)
        .map(|c| c[1].to_string())
        .ok_or_else(|| ContainerError::BadHeader("missing 'descr'".into()))?;
    let (dtype, big_endian) =
        DType::from_npy_descr(&descr).ok_or(ContainerError::UnsupportedDescr(descr))?;

    let fortran_order = FORTRAN_RE
        .captures(header)
        .map(|c| &c[1] == "True")
        .ok_or_else(|| ContainerError::BadHeader("missing 'fortran_order'".into()))?;

    let dims = SHAPE_RE
        .captures(header)
        .ok_or_else(|| ContainerError::BadHeader("missing 'shape'".into()))?[1]
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.trim_end_matches('L')
                .parse::<usize>()
                .map_err(|_| ContainerError::BadHeader(format!("bad dimension '{t}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Header {
        dtype,
        big_endian,
        fortran_order,
        shape: Shape::new(dims),
    })
}

/// Python tuple literal for a shape: `()`, `(5,)`, `(2, 3)`.
fn shape_tuple(shape: &Shape) -> String {
    match shape.dims() {
        [] => "()".to_string(),
        [d] => format!("({d},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Header length (dict + padding + newline) so that the data starts on a
/// 64-byte boundary.
fn aligned_header_len(dict_len: usize, prefix_len: usize) -> usize {
    let unpadded = prefix_len + dict_len + 1;
    let padded = unpadded.div_ceil(HEADER_ALIGN) * HEADER_ALIGN;
    padded - prefix_len
}

fn swap_byte_order(data: &mut [u8], elem_size: usize) {
    if elem_size > 1 {
        for chunk in data.chunks_exact_mut(elem_size) {
            chunk.reverse();
        }
    }
}

/// Reorders column-major element data into row-major order.
fn fortran_to_c(data: &[u8], shape: &Shape, elem_size: usize) -> Vec<u8> {
    let dims = shape.dims();
    let mut f_strides = vec![1usize; dims.len()];
    for axis in 1..dims.len() {
        f_strides[axis] = f_strides[axis - 1] * dims[axis - 1];
    }

    let mut out = Vec::with_capacity(data.len());
    let mut index = vec![0usize; dims.len()];
    for _ in 0..shape.num_elements() {
        let src: usize = index.iter().zip(&f_strides).map(|(i, s)| i * s).sum();
        out.extend_from_slice(&data[src * elem_size..(src + 1) * elem_size]);

        // Advance the row-major multi-index.
        for axis in (0..dims.len()).rev() {
            index[axis] += 1;
            if index[axis] < dims[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
    out
}
