// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `amod decode` and `amod encode` commands.

use super::truncate;
use anyhow::Context;
use harness::HarnessConfig;
use std::path::PathBuf;
use value_core::Value;

pub async fn decode(
    mut config: HarnessConfig,
    type_spec: String,
    wire: String,
    timeout_ms: Option<u64>,
) -> anyhow::Result<()> {
    if let Some(timeout_ms) = timeout_ms {
        config.fetch_timeout_ms = timeout_ms;
        config.validate()?;
    }
    let descriptor = type_grammar::parse(&type_spec)
        .map_err(|e| anyhow::anyhow!("invalid type '{type_spec}': {e}"))?;

    let value = wire_codec::decode(&wire, &descriptor, &config.decode_context()).await?;
    println!("{}", describe(&value));
    Ok(())
}

pub async fn encode(
    config: HarnessConfig,
    type_spec: String,
    json: Option<String>,
    file: Option<PathBuf>,
    npz: bool,
) -> anyhow::Result<()> {
    let descriptor = type_grammar::parse(&type_spec)
        .map_err(|e| anyhow::anyhow!("invalid type '{type_spec}': {e}"))?;
    let ctx = config.decode_context();

    let value = match (json, file) {
        (Some(json), None) => {
            let json: serde_json::Value =
                serde_json::from_str(&json).context("--json is not valid JSON")?;
            wire_codec::decode_json(&json, &descriptor, &ctx).await?
        }
        (None, Some(file)) => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading '{}'", file.display()))?;
            wire_codec::decode_bytes(&bytes, &descriptor, &ctx).await?
        }
        _ => anyhow::bail!("exactly one of --json or --file is required"),
    };
    value_validator::validate(&value, &descriptor)?;

    let wire = match &value {
        Value::Array(array) if npz => wire_codec::encode_npz(array)?,
        _ => wire_codec::encode(&value, &descriptor)?,
    };
    println!("{wire}");
    Ok(())
}

/// One-line description of a native value.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Int(i) => format!("int {i}"),
        Value::Float(f) => format!("float {f:?}"),
        Value::Text(s) => format!("text {:?}", truncate(s, 60)),
        Value::Bool(b) => format!("bool {b}"),
        Value::Array(array) => format!("ndarray {}", array.summary()),
        Value::Annotation(a) => format!("annotation {} {:?}", a.shape, a.coords),
        Value::List(items) => {
            let parts: Vec<String> = items.iter().map(describe).collect();
            format!("list of {} [{}]", items.len(), parts.join(", "))
        }
    }
}
