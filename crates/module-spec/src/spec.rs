// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Specification document parsing.
//!
//! # Format
//! ```json
//! {
//!   "methods": {
//!     "process": {
//!       "input": [
//!         { "name": "image", "description": "RGB image", "type": "ndarray/uint8///3" },
//!         { "name": "threshold", "description": "Threshold", "type": "numeric/int" }
//!       ],
//!       "output": [
//!         { "name": "mask", "description": "Mask", "type": "ndarray/uint8//",
//!           "category": { "name": "segmentation", "labels": ["background", "bright"] } },
//!         { "name": "#bright_pixels", "description": "Count", "type": "numeric/int",
//!           "category": { "name": "measurement" } }
//!       ],
//!       "test_cases": [
//!         ["image.png", 130, "mask_130.png", 8865]
//!       ]
//!     }
//!   },
//!   "module": {
//!     "name": "Bright Pixel Segmenter", "description": "...", "version": "1.0.0",
//!     "author": "...", "author_email": "...", "url": "...", "dependencies": []
//!   }
//! }
//! ```

use crate::{Category, CategoryName, SpecError};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use type_grammar::TypeDescriptor;

/// Packaging metadata of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ModuleInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub author_email: String,
    pub url: String,
    pub dependencies: Vec<String>,
}

/// A named, typed input or output position.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSpec {
    pub name: String,
    pub description: String,
    pub descriptor: TypeDescriptor,
}

/// An output slot with its optional semantic category.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSpec {
    pub slot: SlotSpec,
    pub category: Option<Category>,
}

/// One regression row, already split at the input/output boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Literal inputs, one per input slot.
    pub inputs: Vec<serde_json::Value>,
    /// Expected outputs, one per output slot.
    pub expected: Vec<serde_json::Value>,
}

/// One exposed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    pub name: String,
    /// Inputs in call-signature order.
    pub inputs: Vec<SlotSpec>,
    /// Outputs in return order.
    pub outputs: Vec<OutputSpec>,
    pub test_cases: Vec<TestCase>,
}

impl MethodSpec {
    /// `(name, descriptor)` pairs of the inputs, in positional order.
    pub fn input_slots(&self) -> impl ExactSizeIterator<Item = (&str, &TypeDescriptor)> {
        self.inputs
            .iter()
            .map(|s| (s.name.as_str(), &s.descriptor))
    }

    /// `(name, descriptor)` pairs of the outputs, in positional order.
    pub fn output_slots(&self) -> impl ExactSizeIterator<Item = (&str, &TypeDescriptor)> {
        self.outputs
            .iter()
            .map(|o| (o.slot.name.as_str(), &o.slot.descriptor))
    }

    /// Renders the call signature, e.g.
    /// `process(image: ndarray/uint8///3, threshold: numeric/int) -> (mask: ndarray/uint8//)`.
    pub fn signature(&self) -> String {
        format!(
            "{}({}) -> ({})",
            self.name,
            render_slots(self.inputs.iter()),
            render_slots(self.outputs.iter().map(|o| &o.slot)),
        )
    }
}

fn render_slots<'a>(slots: impl Iterator<Item = &'a SlotSpec>) -> String {
    slots
        .map(|s| format!("{}: {}", s.name, s.descriptor))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// A loaded, validated specification. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSpec {
    pub info: ModuleInfo,
    methods: BTreeMap<String, MethodSpec>,
}

/// Parses a specification document from JSON text.
pub fn load_spec(document: &str) -> Result<ModuleSpec, SpecError> {
    ModuleSpec::from_json(document)
}

impl ModuleSpec {
    /// Loads a specification from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a specification from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let raw: RawDocument = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Builds a specification from an already-parsed JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SpecError> {
        let raw: RawDocument = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDocument) -> Result<Self, SpecError> {
        let raw_methods = raw.methods.ok_or(SpecError::MissingSection("methods"))?;
        let info = raw.module.ok_or(SpecError::MissingSection("module"))?;

        let methods = raw_methods
            .into_iter()
            .map(|(name, m)| build_method(name.clone(), m).map(|spec| (name, spec)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let spec = Self { info, methods };
        tracing::info!("loaded specification: {}", spec.summary());
        Ok(spec)
    }

    /// Looks up a method by name.
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.get(name)
    }

    /// Method names in sorted order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// All methods in name order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodSpec> {
        self.methods.values()
    }

    /// Returns a one-line description of the module.
    pub fn summary(&self) -> String {
        let names: Vec<&str> = self.method_names().collect();
        let cases: usize = self.methods().map(|m| m.test_cases.len()).sum();
        format!(
            "'{}' v{}: {} method(s) [{}], {} test case(s)",
            self.info.name,
            self.info.version,
            names.len(),
            names.join(", "),
            cases,
        )
    }
}

// ── Raw document ───────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct RawDocument {
    methods: Option<BTreeMap<String, RawMethod>>,
    module: Option<ModuleInfo>,
}

#[derive(serde::Deserialize)]
struct RawMethod {
    #[serde(default)]
    input: Vec<RawSlot>,
    #[serde(default)]
    output: Vec<RawSlot>,
    #[serde(default)]
    test_cases: Vec<Vec<serde_json::Value>>,
}

#[derive(serde::Deserialize)]
struct RawSlot {
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    type_spec: Option<String>,
    category: Option<RawCategory>,
}

#[derive(serde::Deserialize)]
struct RawCategory {
    name: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    unit: Option<String>,
}

fn build_method(name: String, raw: RawMethod) -> Result<MethodSpec, SpecError> {
    let mut inputs = Vec::with_capacity(raw.input.len());
    for (index, slot) in raw.input.into_iter().enumerate() {
        let (slot, category) = build_slot(&name, "input", index, slot)?;
        if category.is_some() {
            tracing::warn!(
                "method '{}': ignoring category on input '{}'",
                name,
                slot.name
            );
        }
        inputs.push(slot);
    }

    let mut outputs = Vec::with_capacity(raw.output.len());
    for (index, slot) in raw.output.into_iter().enumerate() {
        let (slot, category) = build_slot(&name, "output", index, slot)?;
        let category = category
            .map(|c| build_category(&name, &slot.name, c))
            .transpose()?;
        outputs.push(OutputSpec { slot, category });
    }

    let arity = inputs.len() + outputs.len();
    let test_cases = raw
        .test_cases
        .into_iter()
        .enumerate()
        .map(|(row, mut values)| {
            if values.len() != arity {
                return Err(SpecError::TestCaseArity {
                    method: name.clone(),
                    row,
                    expected: arity,
                    actual: values.len(),
                });
            }
            let expected = values.split_off(inputs.len());
            Ok(TestCase {
                inputs: values,
                expected,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MethodSpec {
        name,
        inputs,
        outputs,
        test_cases,
    })
}

fn build_slot(
    method: &str,
    direction: &'static str,
    index: usize,
    raw: RawSlot,
) -> Result<(SlotSpec, Option<RawCategory>), SpecError> {
    let missing = |field| SpecError::MissingField {
        method: method.to_string(),
        direction,
        index,
        field,
    };
    let name = raw.name.ok_or_else(|| missing("name"))?;
    let type_spec = raw.type_spec.ok_or_else(|| missing("type"))?;
    let descriptor = type_grammar::parse(&type_spec).map_err(|source| SpecError::InvalidType {
        method: method.to_string(),
        slot: name.clone(),
        source,
    })?;

    Ok((
        SlotSpec {
            name,
            description: raw.description,
            descriptor,
        },
        raw.category,
    ))
}

fn build_category(method: &str, slot: &str, raw: RawCategory) -> Result<Category, SpecError> {
    let tag = raw.name.unwrap_or_default();
    let name = CategoryName::from_name(&tag).ok_or_else(|| SpecError::UnknownCategory {
        method: method.to_string(),
        slot: slot.to_string(),
        category: tag.clone(),
    })?;

    if name.requires_labels() && raw.labels.is_empty() {
        return Err(SpecError::MissingLabels {
            method: method.to_string(),
            slot: slot.to_string(),
            category: name,
        });
    }
    if name == CategoryName::Measurement && raw.unit.is_none() {
        tracing::warn!(
            "method '{}': measurement output '{}' declares no unit",
            method,
            slot
        );
    }

    Ok(Category {
        name,
        labels: raw.labels,
        unit: raw.unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use type_grammar::TypeKind;

    fn template_json() -> &'static str {
        r##"{
            "methods": {
                "process": {
                    "input": [
                        { "name": "image", "description": "RGB image of shape (h,w,3)",
                          "type": "ndarray/uint8///3" },
                        { "name": "threshold", "description": "Threshold for bright pixels",
                          "type": "numeric/int" }
                    ],
                    "output": [
                        { "name": "mask", "description": "Gray-scale segmentation mask",
                          "type": "ndarray/uint8//",
                          "category": { "name": "segmentation",
                                        "labels": ["background", "bright pixels"] } },
                        { "name": "#bright_pixels", "description": "Number of bright pixels",
                          "type": "numeric/int",
                          "category": { "name": "measurement" } }
                    ],
                    "test_cases": [
                        ["image.png", 130, "mask_130.png", 8865],
                        ["image.png", 150, "mask_150.png", 3593],
                        ["image.png", 0, "mask_0.png", 108204],
                        ["image.png", 255, "mask_255.png", 0]
                    ]
                }
            },
            "module": {
                "author": "Jane Doe",
                "author_email": "jane@example.com",
                "description": "Segments bright pixels.",
                "name": "Bright Pixel Segmenter",
                "url": "https://example.com/bright-pixels.git",
                "version": "1.0.0",
                "dependencies": ["numpy>=1.20"]
            }
        }"##
    }

    fn with(mutate: impl FnOnce(&mut serde_json::Value)) -> Result<ModuleSpec, SpecError> {
        let mut doc: serde_json::Value = serde_json::from_str(template_json()).unwrap();
        mutate(&mut doc);
        ModuleSpec::from_value(doc)
    }

    #[test]
    fn test_load_template() {
        let spec = load_spec(template_json()).unwrap();
        assert_eq!(spec.info.name, "Bright Pixel Segmenter");
        assert_eq!(spec.info.dependencies, vec!["numpy>=1.20"]);
        assert_eq!(spec.method_names().collect::<Vec<_>>(), vec!["process"]);

        let process = spec.method("process").unwrap();
        assert_eq!(process.inputs.len(), 2);
        assert_eq!(process.inputs[1].descriptor.kind, "numeric/int".parse::<TypeDescriptor>().unwrap().kind);
        assert!(matches!(process.outputs[0].slot.descriptor.kind, TypeKind::NdArray(_)));

        let mask_category = process.outputs[0].category.as_ref().unwrap();
        assert_eq!(mask_category.name, CategoryName::Segmentation);
        assert_eq!(mask_category.labels.len(), 2);

        assert_eq!(process.test_cases.len(), 4);
        let first = &process.test_cases[0];
        assert_eq!(first.inputs, vec![serde_json::json!("image.png"), serde_json::json!(130)]);
        assert_eq!(first.expected, vec![serde_json::json!("mask_130.png"), serde_json::json!(8865)]);
        assert!(spec.method("train").is_none());
    }

    #[test]
    fn test_signature_and_summary() {
        let spec = load_spec(template_json()).unwrap();
        assert_eq!(
            spec.method("process").unwrap().signature(),
            "process(image: ndarray/uint8///3, threshold: numeric/int) -> \
             (mask: ndarray/uint8//, #bright_pixels: numeric/int)"
        );
        assert_eq!(
            spec.summary(),
            "'Bright Pixel Segmenter' v1.0.0: 1 method(s) [process], 4 test case(s)"
        );
    }

    #[test]
    fn test_missing_sections() {
        let err = with(|d| {
            d.as_object_mut().unwrap().remove("methods");
        })
        .unwrap_err();
        assert!(matches!(err, SpecError::MissingSection("methods")));

        let err = with(|d| {
            d.as_object_mut().unwrap().remove("module");
        })
        .unwrap_err();
        assert!(matches!(err, SpecError::MissingSection("module")));
    }

    #[test]
    fn test_missing_slot_keys() {
        let err = with(|d| {
            d["methods"]["process"]["input"][1]
                .as_object_mut()
                .unwrap()
                .remove("type");
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SpecError::MissingField {
                direction: "input",
                index: 1,
                field: "type",
                ..
            }
        ));

        let err = with(|d| {
            d["methods"]["process"]["output"][0]
                .as_object_mut()
                .unwrap()
                .remove("name");
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SpecError::MissingField {
                direction: "output",
                field: "name",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_type_string() {
        let err = with(|d| {
            d["methods"]["process"]["input"][0]["type"] = "tensor/uint8".into();
        })
        .unwrap_err();
        let SpecError::InvalidType { slot, source, .. } = err else {
            panic!("expected InvalidType");
        };
        assert_eq!(slot, "image");
        assert_eq!(source.offending(), "tensor");
    }

    #[test]
    fn test_category_errors() {
        let err = with(|d| {
            d["methods"]["process"]["output"][0]["category"]["name"] = "regression".into();
        })
        .unwrap_err();
        assert!(matches!(err, SpecError::UnknownCategory { ref category, .. } if category == "regression"));

        let err = with(|d| {
            d["methods"]["process"]["output"][0]["category"]
                .as_object_mut()
                .unwrap()
                .remove("labels");
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SpecError::MissingLabels {
                category: CategoryName::Segmentation,
                ..
            }
        ));
    }

    #[test]
    fn test_measurement_without_unit_loads() {
        let spec = load_spec(template_json()).unwrap();
        let count = &spec.method("process").unwrap().outputs[1];
        let category = count.category.as_ref().unwrap();
        assert_eq!(category.name, CategoryName::Measurement);
        assert_eq!(category.unit, None);
    }

    #[test]
    fn test_test_case_arity() {
        let err = with(|d| {
            d["methods"]["process"]["test_cases"][2] = serde_json::json!(["image.png", 0, 1]);
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SpecError::TestCaseArity {
                row: 2,
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(load_spec("{ not json"), Err(SpecError::Parse(_))));
        assert!(matches!(
            ModuleSpec::from_file(Path::new("/nonexistent/specification.json")),
            Err(SpecError::Read(_))
        ));
    }
}
