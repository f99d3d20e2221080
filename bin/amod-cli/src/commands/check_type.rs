// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `amod check-type` command: parse a type string and optionally check a
//! wire value against it.

use super::codec::describe;
use harness::HarnessConfig;

pub async fn execute(
    config: HarnessConfig,
    type_spec: String,
    value: Option<String>,
) -> anyhow::Result<()> {
    let descriptor = type_grammar::parse(&type_spec)
        .map_err(|e| anyhow::anyhow!("invalid type '{type_spec}': {e}"))?;

    println!("  Type:      {descriptor}");
    println!("  List:      {}", descriptor.is_list);
    if let Some(array) = descriptor.array_spec() {
        println!("  Array:     {array:?}");
    }

    let Some(wire) = value else {
        return Ok(());
    };

    let ctx = config.decode_context();
    let decoded = wire_codec::decode(&wire, &descriptor, &ctx).await?;
    value_validator::validate(&decoded, &descriptor)?;
    println!("  Value:     {}", describe(&decoded));
    println!("  Valid:     yes");
    Ok(())
}
