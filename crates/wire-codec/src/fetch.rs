// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Resolution of `http(s)://` and `file://` array references.

use crate::reference::Scheme;
use crate::CodecError;
use crate::error::segment_label;
use std::time::Duration;
use url::Url;

/// Default timeout for fetching a referenced resource.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default upper bound on the size of a fetched resource (64 MiB).
pub const DEFAULT_MAX_FETCH_BYTES: usize = 64 * 1024 * 1024;

/// Settings used while decoding wire values that may reference external
/// resources.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    client: reqwest::Client,
    timeout: Duration,
    max_fetch_bytes: usize,
}

impl DecodeContext {
    /// Creates a context with the given fetch timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            timeout,
            max_fetch_bytes: DEFAULT_MAX_FETCH_BYTES,
        }
    }

    /// Sets the maximum accepted resource size in bytes.
    pub fn with_max_fetch_bytes(mut self, max_fetch_bytes: usize) -> Self {
        self.max_fetch_bytes = max_fetch_bytes;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_fetch_bytes(&self) -> usize {
        self.max_fetch_bytes
    }

    /// Fetches the bytes behind an `http(s)://` or `file://` reference.
    ///
    /// The whole fetch, including reading the body, is bounded by the
    /// context timeout.
    pub async fn fetch(&self, reference: &str) -> Result<Vec<u8>, CodecError> {
        let reference = reference.trim();
        let url = Url::parse(reference)
            .map_err(|e| CodecError::unsupported(reference, format!("invalid URL: {e}")))?;

        tracing::debug!(url = %segment_label(reference), "fetching array reference");
        let fetch = async {
            match Scheme::of(reference) {
                Some(Scheme::Http) => self.fetch_http(url, reference).await,
                Some(Scheme::File) => self.fetch_file(&url, reference).await,
                _ => Err(CodecError::unsupported(
                    reference,
                    format!("scheme '{}' cannot be fetched", url.scheme()),
                )),
            }
        };

        let bytes = tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| self.timed_out(reference))??;
        tracing::debug!(bytes = bytes.len(), "fetched array reference");
        Ok(bytes)
    }

    async fn fetch_http(&self, url: Url, reference: &str) -> Result<Vec<u8>, CodecError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.http_error(e, reference))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CodecError::unreachable(reference, format!("HTTP {status}")));
        }
        let declared = response.content_length();
        if let Some(len) = declared {
            self.check_size(usize::try_from(len).unwrap_or(usize::MAX), reference)?;
        }

        // Bodies without a declared length are capped while streaming.
        let mut body = Vec::with_capacity(declared.map_or(0, |len| len as usize));
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.http_error(e, reference))?
        {
            self.check_size(body.len().saturating_add(chunk.len()), reference)?;
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    async fn fetch_file(&self, url: &Url, reference: &str) -> Result<Vec<u8>, CodecError> {
        let path = url
            .to_file_path()
            .map_err(|_| CodecError::unreachable(reference, "not a local file path"))?;
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| CodecError::unreachable(reference, e))?;
        if !meta.is_file() {
            return Err(CodecError::unreachable(reference, "not a regular file"));
        }
        self.check_size(meta.len() as usize, reference)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| CodecError::unreachable(reference, e))
    }

    fn check_size(&self, len: usize, reference: &str) -> Result<(), CodecError> {
        if len > self.max_fetch_bytes {
            return Err(CodecError::unreachable(
                reference,
                format!(
                    "resource is {} bytes, limit is {}",
                    len, self.max_fetch_bytes
                ),
            ));
        }
        Ok(())
    }

    fn http_error(&self, err: reqwest::Error, reference: &str) -> CodecError {
        if err.is_timeout() {
            self.timed_out(reference)
        } else {
            CodecError::unreachable(reference, err)
        }
    }

    fn timed_out(&self, reference: &str) -> CodecError {
        CodecError::Timeout {
            segment: segment_label(reference),
            timeout_ms: self.timeout.as_millis(),
        }
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}
