// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Semantic categories attached to method outputs.

use std::fmt;

/// What an output means, for downstream rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryName {
    Classification,
    Segmentation,
    Detection,
    Measurement,
    Transformation,
}

impl CategoryName {
    pub const ALL: [CategoryName; 5] = [
        CategoryName::Classification,
        CategoryName::Segmentation,
        CategoryName::Detection,
        CategoryName::Measurement,
        CategoryName::Transformation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryName::Classification => "classification",
            CategoryName::Segmentation => "segmentation",
            CategoryName::Detection => "detection",
            CategoryName::Measurement => "measurement",
            CategoryName::Transformation => "transformation",
        }
    }

    /// Parses a category name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Categories whose outputs are only meaningful with class labels.
    pub fn requires_labels(self) -> bool {
        matches!(
            self,
            CategoryName::Classification | CategoryName::Segmentation | CategoryName::Detection
        )
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Category {
    pub name: CategoryName,
    /// Class labels, in index order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Unit of a measurement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.labels.is_empty() {
            write!(f, " [{}]", self.labels.join(", "))?;
        }
        if let Some(unit) = &self.unit {
            write!(f, " ({unit})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        for c in CategoryName::ALL {
            assert_eq!(CategoryName::from_name(c.as_str()), Some(c));
        }
        assert_eq!(CategoryName::from_name("Segmentation"), None);
        assert_eq!(CategoryName::from_name("regression"), None);
    }

    #[test]
    fn test_requires_labels() {
        assert!(CategoryName::Segmentation.requires_labels());
        assert!(!CategoryName::Measurement.requires_labels());
        assert!(!CategoryName::Transformation.requires_labels());
    }

    #[test]
    fn test_display() {
        let c = Category {
            name: CategoryName::Segmentation,
            labels: vec!["background".into(), "bright pixels".into()],
            unit: None,
        };
        assert_eq!(c.to_string(), "segmentation [background, bright pixels]");

        let m = Category {
            name: CategoryName::Measurement,
            labels: vec![],
            unit: Some("px".into()),
        };
        assert_eq!(m.to_string(), "measurement (px)");
    }
}
