// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The method invocation boundary.
//!
//! ```text
//! wire args ──decode──▶ values ──validate──▶ invoke ──validate──▶ encode ──▶ wire outputs
//! ```
//!
//! Every call is independent: the host holds only the immutable
//! specification, the registered implementations and the decode settings.

use crate::{CallError, HarnessError, Method, TestReport, TestRunner};
use module_spec::{Category, MethodSpec, ModuleSpec};
use std::collections::HashMap;
use std::sync::Arc;
use value_core::Value;
use value_validator::Direction;
use wire_codec::DecodeContext;

/// One encoded result, with the metadata needed to render it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EncodedOutput {
    pub name: String,
    pub wire: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Hosts the methods of one module behind its specification.
pub struct ModuleHost {
    spec: Arc<ModuleSpec>,
    methods: HashMap<String, Arc<dyn Method>>,
    ctx: DecodeContext,
}

impl ModuleHost {
    pub fn new(spec: ModuleSpec, ctx: DecodeContext) -> Self {
        Self {
            spec: Arc::new(spec),
            methods: HashMap::new(),
            ctx,
        }
    }

    pub fn spec(&self) -> &ModuleSpec {
        &self.spec
    }

    /// Registers the implementation of a declared method.
    pub fn register(
        &mut self,
        name: &str,
        implementation: impl Method + 'static,
    ) -> Result<&mut Self, HarnessError> {
        if self.spec.method(name).is_none() {
            return Err(HarnessError::UnknownMethod {
                name: name.to_string(),
            });
        }
        tracing::info!("registered implementation for '{}'", name);
        self.methods
            .insert(name.to_string(), Arc::new(implementation));
        Ok(self)
    }

    /// Declared methods that have no implementation yet.
    pub fn unregistered(&self) -> Vec<&str> {
        self.spec
            .method_names()
            .filter(|name| !self.methods.contains_key(*name))
            .collect()
    }

    /// Calls a method with wire-encoded positional arguments.
    pub async fn call<S: AsRef<str>>(
        &self,
        method: &str,
        args: &[S],
    ) -> Result<Vec<EncodedOutput>, CallError> {
        let (spec, _) = self.lookup(method)?;
        check_count(spec, args.len())?;

        let mut inputs = Vec::with_capacity(args.len());
        for (slot, arg) in spec.inputs.iter().zip(args) {
            let value = wire_codec::decode(arg.as_ref(), &slot.descriptor, &self.ctx)
                .await
                .map_err(|source| CallError::Codec {
                    field: slot.name.clone(),
                    source,
                })?;
            inputs.push(value);
        }
        self.finish(method, inputs)
    }

    /// Calls a method with JSON positional arguments (a request body array).
    pub async fn call_json(
        &self,
        method: &str,
        args: &[serde_json::Value],
    ) -> Result<Vec<EncodedOutput>, CallError> {
        let (spec, _) = self.lookup(method)?;
        check_count(spec, args.len())?;

        let mut inputs = Vec::with_capacity(args.len());
        for (slot, arg) in spec.inputs.iter().zip(args) {
            let value = wire_codec::decode_json(arg, &slot.descriptor, &self.ctx)
                .await
                .map_err(|source| CallError::Codec {
                    field: slot.name.clone(),
                    source,
                })?;
            inputs.push(value);
        }
        self.finish(method, inputs)
    }

    /// Validates, invokes and validates, without any wire encoding.
    pub fn call_values(&self, method: &str, inputs: &[Value]) -> Result<Vec<Value>, CallError> {
        let (spec, implementation) = self.lookup(method)?;
        check_count(spec, inputs.len())?;

        value_validator::validate_slots(Direction::Input, inputs, spec.input_slots())
            .map_err(CallError::InvalidInput)?;

        tracing::debug!("invoking '{}'", method);
        let outputs = implementation
            .invoke(inputs)
            .map_err(|source| CallError::Method {
                method: method.to_string(),
                source,
            })?;

        value_validator::validate_slots(Direction::Output, &outputs, spec.output_slots())
            .map_err(|e| {
                tracing::warn!("'{}' returned an invalid result: {}", method, e);
                CallError::InvalidOutput(e)
            })?;
        Ok(outputs)
    }

    /// Replays the test cases of every registered method.
    ///
    /// Fails only if a declared method has no implementation.
    pub async fn run_tests(&self, runner: &TestRunner) -> Result<Vec<TestReport>, HarnessError> {
        if let Some(name) = self.unregistered().first() {
            return Err(HarnessError::NotImplemented {
                name: name.to_string(),
            });
        }
        let mut reports = Vec::new();
        for spec in self.spec.methods() {
            let (_, implementation) = self
                .lookup(&spec.name)
                .map_err(|_| HarnessError::NotImplemented {
                    name: spec.name.clone(),
                })?;
            let report = runner.run_report(spec, implementation.as_ref()).await;
            tracing::info!("{}", report.summary());
            reports.push(report);
        }
        Ok(reports)
    }

    fn finish(&self, method: &str, inputs: Vec<Value>) -> Result<Vec<EncodedOutput>, CallError> {
        let outputs = self.call_values(method, &inputs)?;
        let (spec, _) = self.lookup(method)?;

        spec.outputs
            .iter()
            .zip(&outputs)
            .map(|(output, value)| -> Result<EncodedOutput, CallError> {
                let wire = wire_codec::encode(value, &output.slot.descriptor).map_err(|source| {
                    CallError::Codec {
                        field: output.slot.name.clone(),
                        source,
                    }
                })?;
                Ok(EncodedOutput {
                    name: output.slot.name.clone(),
                    wire,
                    category: output.category.clone(),
                })
            })
            .collect()
    }

    fn lookup(&self, method: &str) -> Result<(&MethodSpec, &Arc<dyn Method>), CallError> {
        let unknown = || CallError::UnknownMethod {
            method: method.to_string(),
        };
        let spec = self.spec.method(method).ok_or_else(unknown)?;
        let implementation = self.methods.get(method).ok_or_else(unknown)?;
        Ok((spec, implementation))
    }
}

fn check_count(spec: &MethodSpec, actual: usize) -> Result<(), CallError> {
    if actual != spec.inputs.len() {
        return Err(CallError::ArgumentCount {
            method: spec.name.clone(),
            expected: spec.inputs.len(),
            actual,
        });
    }
    Ok(())
}
