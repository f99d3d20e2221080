// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The implementation side of a method.

use value_core::Value;

/// Anything callable with a method's positional inputs.
///
/// Inputs arrive decoded and validated, in the order the specification
/// declares them; outputs must be returned in declared output order.
/// Implementations are shared across concurrent calls, so they must be
/// `Send + Sync`; a non-reentrant model is the caller's to serialise.
///
/// Plain closures implement this trait:
/// ```
/// use harness::Method;
/// use value_core::Value;
///
/// let double = |inputs: &[Value]| -> anyhow::Result<Vec<Value>> {
///     let x = inputs[0].as_f64().unwrap_or_default();
///     Ok(vec![Value::Float(2.0 * x)])
/// };
/// assert_eq!(double.invoke(&[Value::Int(4)]).unwrap(), vec![Value::Float(8.0)]);
/// ```
pub trait Method: Send + Sync {
    fn invoke(&self, inputs: &[Value]) -> anyhow::Result<Vec<Value>>;
}

impl<F> Method for F
where
    F: Fn(&[Value]) -> anyhow::Result<Vec<Value>> + Send + Sync,
{
    fn invoke(&self, inputs: &[Value]) -> anyhow::Result<Vec<Value>> {
        self(inputs)
    }
}
