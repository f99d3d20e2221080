// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! End-to-end tests: specification document on disk, test data on disk,
//! a segmentation method replayed through the runner and the host.

use harness::{FailureStage, HarnessConfig, ModuleHost, TestDataDir, TestRunner};
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::Path;
use value_core::{NdArray, Shape, Value};

const WIDTH: u32 = 24;
const HEIGHT: u32 = 16;

const SPEC: &str = r#"{
    "methods": {
        "segment": {
            "input": [
                { "name": "image", "type": "ndarray/uint8///3", "description": "RGB image" },
                { "name": "threshold", "type": "numeric/int" }
            ],
            "output": [
                { "name": "mask", "type": "ndarray/uint8//",
                  "category": { "name": "segmentation", "labels": ["background", "bright"] } },
                { "name": "count", "type": "numeric/int",
                  "category": { "name": "measurement", "unit": "px" } }
            ],
            "test_cases": [
                ["image.png", 130, "mask_130.png", COUNT_130],
                ["image.png", 250, "mask_250.png", 0],
                ["image.png", 130, "mask_250.png", COUNT_130]
            ]
        }
    },
    "module": { "name": "bright-pixels", "version": "1.0.0" }
}"#;

fn pixel(x: u32, y: u32) -> Rgb<u8> {
    Rgb([(x * 10) as u8, (y * 15) as u8, ((x + y) * 5) as u8])
}

fn mean(p: &[u8]) -> u32 {
    p.iter().map(|&c| u32::from(c)).sum::<u32>() / p.len() as u32
}

fn expected_mask(threshold: u32) -> GrayImage {
    GrayImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let bright = mean(&pixel(x, y).0) > threshold;
        Luma([if bright { 255 } else { 0 }])
    })
}

fn bright_count(threshold: u32) -> usize {
    expected_mask(threshold).pixels().filter(|p| p.0[0] == 255).count()
}

/// Mask of pixels whose channel mean exceeds the threshold, plus their count.
fn segment(inputs: &[Value]) -> anyhow::Result<Vec<Value>> {
    let (Value::Array(image), Value::Int(threshold)) = (&inputs[0], &inputs[1]) else {
        anyhow::bail!("unexpected inputs");
    };
    let dims = image.shape().dims();
    let (h, w, c) = (dims[0], dims[1], dims[2]);
    let threshold = u32::try_from(*threshold)?;

    let mask: Vec<u8> = image
        .as_u8_slice()?
        .chunks_exact(c)
        .map(|p| if mean(p) > threshold { 255 } else { 0 })
        .collect();
    let count = mask.iter().filter(|&&m| m == 255).count();
    Ok(vec![
        Value::Array(NdArray::from_slice(Shape::matrix(h, w), &mask)?),
        Value::Int(count as i64),
    ])
}

fn write_fixture(dir: &Path) -> HarnessConfig {
    RgbImage::from_fn(WIDTH, HEIGHT, pixel)
        .save(dir.join("image.png"))
        .unwrap();
    expected_mask(130).save(dir.join("mask_130.png")).unwrap();
    expected_mask(250).save(dir.join("mask_250.png")).unwrap();

    let spec = SPEC.replace("COUNT_130", &bright_count(130).to_string());
    std::fs::write(dir.join("specification.json"), spec).unwrap();

    HarnessConfig::from_toml(&format!(
        "spec_path = {:?}\ntest_data_dir = {:?}\nfetch_timeout_ms = 2000\n",
        dir.join("specification.json"),
        dir,
    ))
    .unwrap()
}

#[tokio::test]
async fn test_segmentation_test_cases() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    assert!(bright_count(130) > 0);

    let spec = config.load_spec().unwrap();
    let method = spec.method("segment").unwrap();
    let runner = TestRunner::new(config.test_data(), config.decode_context());
    let results = runner.run_test_cases(method, &segment).await;

    assert_eq!(results.len(), 3);
    assert!(results[0].passed(), "{:?}", results[0].failure());
    assert!(results[1].passed(), "{:?}", results[1].failure());

    let failure = results[2].failure().unwrap();
    assert_eq!(failure.stage, FailureStage::Mismatch);
    assert_eq!(failure.output_index, Some(0));
}

#[tokio::test]
async fn test_host_runs_all_methods() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());

    let mut host = ModuleHost::new(config.load_spec().unwrap(), config.decode_context());
    let runner = TestRunner::new(TestDataDir::new(dir.path()), config.decode_context());
    assert!(host.run_tests(&runner).await.is_err());

    host.register("segment", segment).unwrap();
    let reports = host.run_tests(&runner).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].num_passed(), 2);
    assert_eq!(reports[0].num_failed(), 1);
    assert!(!reports[0].all_passed());
}

#[tokio::test]
async fn test_host_call_with_file_reference() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let mut host = ModuleHost::new(config.load_spec().unwrap(), config.decode_context());
    host.register("segment", segment).unwrap();

    let reference = format!("file://{}", dir.path().join("image.png").display());
    let outputs = host.call("segment", &[reference.as_str(), "130"]).await.unwrap();

    assert_eq!(outputs[0].name, "mask");
    assert!(outputs[0].wire.starts_with("data:image/png;base64,"));
    assert_eq!(outputs[1].wire, bright_count(130).to_string());

    let json = serde_json::to_value(&outputs[1]).unwrap();
    assert_eq!(json["category"]["unit"], "px");
}

#[tokio::test]
async fn test_host_call_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let mut host = ModuleHost::new(config.load_spec().unwrap(), config.decode_context());
    host.register("segment", segment).unwrap();
    let reference = format!("file://{}", dir.path().join("image.png").display());

    let err = host.call("segment", &[reference.as_str(), "1.5"]).await.unwrap_err();
    let response = err.to_response();
    assert_eq!(response.kind, "codec");
    assert_eq!(response.field.as_deref(), Some("threshold"));

    let missing = format!("file://{}", dir.path().join("missing.png").display());
    let err = host.call("segment", &[missing.as_str(), "130"]).await.unwrap_err();
    assert_eq!(err.field(), Some("image"));
    let json = serde_json::to_value(err.to_response()).unwrap();
    assert_eq!(json["codec_kind"], "unreachable");

    let err = host.call("segment", &["130"]).await.unwrap_err();
    assert_eq!(err.kind(), "argument_count");

    let err = host.call("classify", &["x"]).await.unwrap_err();
    assert_eq!(err.kind(), "unknown_method");

    let gray = Value::Array(NdArray::zeros(Shape::matrix(4, 4), value_core::DType::UInt8));
    let err = host.call_values("segment", &[gray, Value::Int(1)]).unwrap_err();
    assert_eq!(err.kind(), "invalid_input");
    assert_eq!(err.field(), Some("image"));
}
