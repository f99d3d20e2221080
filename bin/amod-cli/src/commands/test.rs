// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `amod test` command: replay a method's test cases against the bundled
//! bright-pixel segmentation method.

use crate::demo;
use harness::{HarnessConfig, TestOutcome, TestReport, TestRunner};
use std::path::PathBuf;

pub async fn execute(
    mut config: HarnessConfig,
    spec: Option<PathBuf>,
    test_data: Option<PathBuf>,
    method: String,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(spec) = spec {
        config.spec_path = spec;
    }
    if let Some(test_data) = test_data {
        config.test_data_dir = test_data;
    }

    let spec = config.load_spec().map_err(|e| {
        anyhow::anyhow!(
            "failed to load specification '{}': {e}",
            config.spec_path.display()
        )
    })?;
    let method_spec = spec.method(&method).ok_or_else(|| {
        let names: Vec<&str> = spec.method_names().collect();
        anyhow::anyhow!("no method '{method}' (declared: {})", names.join(", "))
    })?;
    tracing::info!("replaying {}", method_spec.signature());

    let runner = TestRunner::new(config.test_data(), config.decode_context());
    let report = runner.run_report(method_spec, &demo::bright_pixels).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &config);
    }

    if !report.all_passed() {
        anyhow::bail!("{} test case(s) failed", report.num_failed());
    }
    Ok(())
}

fn print_report(report: &TestReport, config: &HarnessConfig) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               amod · Test Case Replay               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Spec:      {}", config.spec_path.display());
    println!("  Test data: {}", config.test_data_dir.display());
    println!();

    for result in &report.results {
        let ms = result.duration.as_secs_f64() * 1000.0;
        match &result.outcome {
            TestOutcome::Passed => println!("   [{:>3}] PASS  {:>8.2} ms", result.row, ms),
            TestOutcome::Failed(failure) => {
                println!("   [{:>3}] FAIL  {:>8.2} ms  {}", result.row, ms, failure)
            }
        }
    }
    println!();
    println!("  {}", report.summary());
    println!();
}
