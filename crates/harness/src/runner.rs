// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Regression test runner.
//!
//! Each test-case row goes through the same stages as a real call:
//!
//! ```text
//! literals ──resolve──▶ inputs ──validate──▶ invoke ──validate──▶ outputs
//!                                                                   │
//! literals ──resolve──▶ expected ◀──────────── compare ─────────────┘
//! ```
//!
//! A row that fails at any stage is recorded and the runner moves on to the
//! next row; it never stops early.

use crate::{Method, TestDataSource};
use module_spec::{MethodSpec, TestCase};
use std::fmt;
use std::time::{Duration, Instant};
use type_grammar::{TypeDescriptor, TypeKind};
use value_core::Value;
use value_validator::{Direction, ValidationError};
use wire_codec::{CodecError, DecodeContext, Scheme};

// ── Results ────────────────────────────────────────────────────

/// The stage at which a test case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// An input literal could not be resolved or decoded.
    ResolveInput,
    /// A resolved input disagrees with its declared type.
    InvalidInput,
    /// The implementation returned an error.
    Method,
    /// An output disagrees with its declared type.
    InvalidOutput,
    /// An expected-output literal could not be resolved or decoded.
    ResolveExpected,
    /// An output differs from its expected value.
    Mismatch,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureStage::ResolveInput => "resolve input",
            FailureStage::InvalidInput => "invalid input",
            FailureStage::Method => "method error",
            FailureStage::InvalidOutput => "invalid output",
            FailureStage::ResolveExpected => "resolve expected",
            FailureStage::Mismatch => "mismatch",
        })
    }
}

/// Why a test case failed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TestFailure {
    pub stage: FailureStage,
    /// Index of the first offending output, for output-side failures.
    pub output_index: Option<usize>,
    pub detail: String,
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.output_index {
            Some(i) => write!(f, "{} at output {}: {}", self.stage, i, self.detail),
            None => write!(f, "{}: {}", self.stage, self.detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed(TestFailure),
}

/// The result of one test-case row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TestResult {
    /// Zero-based row index within the method's test cases.
    pub row: usize,
    pub outcome: TestOutcome,
    #[serde(skip)]
    pub duration: Duration,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.outcome == TestOutcome::Passed
    }

    pub fn failure(&self) -> Option<&TestFailure> {
        match &self.outcome {
            TestOutcome::Passed => None,
            TestOutcome::Failed(f) => Some(f),
        }
    }
}

/// All results for one method.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TestReport {
    pub method: String,
    pub results: Vec<TestResult>,
}

impl TestReport {
    pub fn num_passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn num_failed(&self) -> usize {
        self.results.len() - self.num_passed()
    }

    pub fn all_passed(&self) -> bool {
        self.num_failed() == 0
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let total: Duration = self.results.iter().map(|r| r.duration).sum();
        format!(
            "{}: {} passed, {} failed of {} test case(s) in {:.2}ms",
            self.method,
            self.num_passed(),
            self.num_failed(),
            self.results.len(),
            total.as_secs_f64() * 1000.0,
        )
    }
}

// ── Runner ─────────────────────────────────────────────────────

/// A literal that could not be turned into a value.
#[derive(Debug, thiserror::Error)]
enum LiteralError {
    #[error("cannot read test data '{name}': {source}")]
    TestData {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Replays the test cases of a method specification against an
/// implementation.
pub struct TestRunner {
    data: Box<dyn TestDataSource>,
    ctx: DecodeContext,
}

impl TestRunner {
    pub fn new(data: impl TestDataSource + 'static, ctx: DecodeContext) -> Self {
        Self {
            data: Box::new(data),
            ctx,
        }
    }

    /// Runs every test case of `method` and returns one result per row,
    /// in row order.
    pub async fn run_test_cases(
        &self,
        method: &MethodSpec,
        implementation: &dyn Method,
    ) -> Vec<TestResult> {
        tracing::info!(
            "running {} test case(s) for '{}'",
            method.test_cases.len(),
            method.name
        );

        let mut results = Vec::with_capacity(method.test_cases.len());
        for (row, case) in method.test_cases.iter().enumerate() {
            let start = Instant::now();
            let outcome = match self.run_one(method, case, implementation).await {
                Ok(()) => {
                    tracing::debug!("'{}' test case {}: passed", method.name, row);
                    TestOutcome::Passed
                }
                Err(failure) => {
                    tracing::warn!("'{}' test case {}: {}", method.name, row, failure);
                    TestOutcome::Failed(failure)
                }
            };
            results.push(TestResult {
                row,
                outcome,
                duration: start.elapsed(),
            });
        }
        results
    }

    /// Runs the test cases and wraps the results in a [`TestReport`].
    pub async fn run_report(&self, method: &MethodSpec, implementation: &dyn Method) -> TestReport {
        TestReport {
            method: method.name.clone(),
            results: self.run_test_cases(method, implementation).await,
        }
    }

    async fn run_one(
        &self,
        method: &MethodSpec,
        case: &TestCase,
        implementation: &dyn Method,
    ) -> Result<(), TestFailure> {
        let mut inputs = Vec::with_capacity(case.inputs.len());
        for (slot, literal) in method.inputs.iter().zip(&case.inputs) {
            let value = self
                .resolve_literal(literal, &slot.descriptor)
                .await
                .map_err(|e| TestFailure {
                    stage: FailureStage::ResolveInput,
                    output_index: None,
                    detail: format!("input '{}': {e}", slot.name),
                })?;
            inputs.push(value);
        }

        value_validator::validate_slots(Direction::Input, &inputs, method.input_slots()).map_err(
            |e| TestFailure {
                stage: FailureStage::InvalidInput,
                output_index: None,
                detail: e.to_string(),
            },
        )?;

        let outputs = implementation.invoke(&inputs).map_err(|e| TestFailure {
            stage: FailureStage::Method,
            output_index: None,
            detail: format!("{e:#}"),
        })?;

        value_validator::validate_slots(Direction::Output, &outputs, method.output_slots())
            .map_err(|e| TestFailure {
                stage: FailureStage::InvalidOutput,
                output_index: match &e {
                    ValidationError::Slot { index, .. } => Some(*index),
                    _ => None,
                },
                detail: e.to_string(),
            })?;

        for (index, ((output, literal), actual)) in method
            .outputs
            .iter()
            .zip(&case.expected)
            .zip(&outputs)
            .enumerate()
        {
            let expected = self
                .resolve_literal(literal, &output.slot.descriptor)
                .await
                .map_err(|e| TestFailure {
                    stage: FailureStage::ResolveExpected,
                    output_index: Some(index),
                    detail: format!("output '{}': {e}", output.slot.name),
                })?;
            if let Some(difference) = actual.difference(&expected) {
                return Err(TestFailure {
                    stage: FailureStage::Mismatch,
                    output_index: Some(index),
                    detail: format!("output '{}': {difference}", output.slot.name),
                });
            }
        }
        Ok(())
    }

    /// Turns a test-case literal into a native value.
    ///
    /// - Array slots: a string without a scheme names a test-data file.
    /// - Other slots: a string naming an existing test-data file is replaced
    ///   by the file's contents.
    /// - Lists given as JSON arrays resolve element by element.
    /// - Anything else is a JSON transport value.
    async fn resolve_literal(
        &self,
        literal: &serde_json::Value,
        descriptor: &TypeDescriptor,
    ) -> Result<Value, LiteralError> {
        match literal {
            serde_json::Value::Array(items)
                if descriptor.is_list && matches!(descriptor.kind, TypeKind::NdArray(_)) =>
            {
                let element = descriptor.element();
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(Box::pin(self.resolve_literal(item, &element)).await?);
                }
                Ok(Value::List(values))
            }
            serde_json::Value::String(name) if self.names_test_data(name, descriptor) => {
                let bytes = self.data.read(name).map_err(|source| LiteralError::TestData {
                    name: name.clone(),
                    source,
                })?;
                Ok(wire_codec::decode_bytes(&bytes, descriptor, &self.ctx).await?)
            }
            other => Ok(wire_codec::decode_json(other, descriptor, &self.ctx).await?),
        }
    }

    fn names_test_data(&self, name: &str, descriptor: &TypeDescriptor) -> bool {
        if Scheme::of(name.trim()).is_some() {
            return false;
        }
        let array_slot = !descriptor.is_list && matches!(descriptor.kind, TypeKind::NdArray(_));
        array_slot || self.data.contains(name)
    }
}
