// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Harness configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! spec_path = "./specification.json"
//! test_data_dir = "./testdata"
//! fetch_timeout_ms = 10000
//! max_fetch_bytes = 67108864
//! ```

use crate::{HarnessError, TestDataDir};
use module_spec::ModuleSpec;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wire_codec::{DecodeContext, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FETCH_BYTES};

/// Configuration for loading a module specification and running it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HarnessConfig {
    /// Path to the specification document (JSON).
    pub spec_path: PathBuf,
    /// Directory that test-case filenames are resolved against.
    pub test_data_dir: PathBuf,
    /// Upper bound on fetching one `http(s)://` or `file://` reference.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Largest accepted referenced resource, in bytes.
    #[serde(default = "default_max_fetch_bytes")]
    pub max_fetch_bytes: usize,
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_millis() as u64
}

fn default_max_fetch_bytes() -> usize {
    DEFAULT_MAX_FETCH_BYTES
}

impl HarnessConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, HarnessError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| HarnessError::Config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, HarnessError> {
        toml::to_string_pretty(self)
            .map_err(|e| HarnessError::Config(format!("TOML serialise error: {e}")))
    }

    /// Rejects settings that would make every fetch fail.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.fetch_timeout_ms == 0 {
            return Err(HarnessError::Config(
                "fetch_timeout_ms must be positive".into(),
            ));
        }
        if self.max_fetch_bytes == 0 {
            return Err(HarnessError::Config(
                "max_fetch_bytes must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Builds the decode context for wire values.
    pub fn decode_context(&self) -> DecodeContext {
        DecodeContext::new(self.fetch_timeout()).with_max_fetch_bytes(self.max_fetch_bytes)
    }

    /// Loads the specification document named by `spec_path`.
    pub fn load_spec(&self) -> Result<ModuleSpec, HarnessError> {
        Ok(ModuleSpec::from_file(&self.spec_path)?)
    }

    /// Returns the test-data source rooted at `test_data_dir`.
    pub fn test_data(&self) -> TestDataDir {
        TestDataDir::new(&self.test_data_dir)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            spec_path: PathBuf::from("./specification.json"),
            test_data_dir: PathBuf::from("./testdata"),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_fetch_bytes: default_max_fetch_bytes(),
        }
    }
}
