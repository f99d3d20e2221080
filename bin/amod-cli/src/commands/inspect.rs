// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `amod inspect` command: display module metadata and method signatures.

use harness::HarnessConfig;
use std::path::PathBuf;

pub async fn execute(mut config: HarnessConfig, spec: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(spec) = spec {
        config.spec_path = spec;
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              amod · Module Inspector                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let spec = config.load_spec().map_err(|e| {
        anyhow::anyhow!(
            "failed to load specification '{}': {e}",
            config.spec_path.display()
        )
    })?;

    // ── Metadata ───────────────────────────────────────────────
    let info = &spec.info;
    println!("  Module:      {} v{}", info.name, info.version);
    if !info.description.is_empty() {
        println!("  Description: {}", info.description);
    }
    if !info.author.is_empty() {
        if info.author_email.is_empty() {
            println!("  Author:      {}", info.author);
        } else {
            println!("  Author:      {} <{}>", info.author, info.author_email);
        }
    }
    if !info.url.is_empty() {
        println!("  URL:         {}", info.url);
    }
    if !info.dependencies.is_empty() {
        println!("  Depends on:  {}", info.dependencies.join(", "));
    }
    println!();

    // ── Methods ────────────────────────────────────────────────
    for method in spec.methods() {
        println!("  {}", method.signature());
        for slot in &method.inputs {
            println!("   in   {:<20} {:<24} {}", slot.name, slot.descriptor, slot.description);
        }
        for output in &method.outputs {
            let category = output
                .category
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   out  {:<20} {:<24} {}",
                output.slot.name, output.slot.descriptor, category
            );
        }
        println!("   {} test case(s)", method.test_cases.len());
        println!();
    }

    println!("  {}", spec.summary());
    println!();
    Ok(())
}
