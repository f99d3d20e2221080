// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # harness
//!
//! Hosts an analytics module's methods behind its specification.
//!
//! - [`ModuleHost`]: decodes wire arguments, validates them, invokes the
//!   registered [`Method`], validates the results and encodes them.
//! - [`TestRunner`]: replays the test cases embedded in the specification,
//!   resolving literals that name files through a [`TestDataSource`].
//! - [`HarnessConfig`]: TOML configuration for both.
//!
//! # Example
//! ```no_run
//! use harness::{HarnessConfig, ModuleHost};
//! use value_core::Value;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = HarnessConfig::default();
//! let mut host = ModuleHost::new(config.load_spec()?, config.decode_context());
//! host.register("double", |inputs: &[Value]| -> anyhow::Result<Vec<Value>> {
//!     Ok(vec![Value::Float(2.0 * inputs[0].as_f64().unwrap_or_default())])
//! })?;
//!
//! let outputs = host.call("double", &["2.5"]).await?;
//! assert_eq!(outputs[0].wire, "5.0");
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod host;
mod method;
mod runner;
mod test_data;

pub use config::HarnessConfig;
pub use error::{CallError, ErrorResponse, HarnessError};
pub use host::{EncodedOutput, ModuleHost};
pub use method::Method;
pub use runner::{FailureStage, TestFailure, TestOutcome, TestReport, TestResult, TestRunner};
pub use test_data::{TestDataDir, TestDataSource};
