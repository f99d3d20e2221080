// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Geometric annotations: a shape tag plus coordinate tuples.

use std::fmt;

/// The recognised annotation shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// `(x, y)`
    Point,
    /// `(x, y, r)`
    Circle,
    /// `(x, y, rx, ry, angle)`
    Ellipse,
    /// `(x, y, w, h)`
    Rect,
    /// A sequence of `(x, y)` vertices.
    Polyline,
}

impl ShapeKind {
    /// All shape kinds, in declaration order.
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Point,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Rect,
        ShapeKind::Polyline,
    ];

    /// Returns the number of components each coordinate tuple must have.
    pub fn arity(self) -> usize {
        match self {
            ShapeKind::Point => 2,
            ShapeKind::Circle => 3,
            ShapeKind::Ellipse => 5,
            ShapeKind::Rect => 4,
            ShapeKind::Polyline => 2,
        }
    }

    /// Returns the wire tag for this shape.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Rect => "rect",
            ShapeKind::Polyline => "polyline",
        }
    }

    /// Parses a wire tag. Tags are matched exactly.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged pair `(shape, coordinate tuples)`.
///
/// The tag is kept as a string so that values decoded from the wire can
/// carry an unknown tag until the validator rejects it.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Shape tag, normally one of [`ShapeKind::as_str`].
    pub shape: String,
    /// Ordered coordinate tuples.
    pub coords: Vec<Vec<f64>>,
}

impl Annotation {
    /// Creates an annotation from a tag and coordinate tuples.
    pub fn new(shape: impl Into<String>, coords: Vec<Vec<f64>>) -> Self {
        Self {
            shape: shape.into(),
            coords,
        }
    }

    /// A single point.
    pub fn point(x: f64, y: f64) -> Self {
        Self::new("point", vec![vec![x, y]])
    }

    /// A single axis-aligned rectangle.
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new("rect", vec![vec![x, y, w, h]])
    }

    /// A single circle.
    pub fn circle(x: f64, y: f64, r: f64) -> Self {
        Self::new("circle", vec![vec![x, y, r]])
    }

    /// A polyline through the given vertices.
    pub fn polyline(points: &[(f64, f64)]) -> Self {
        Self::new(
            "polyline",
            points.iter().map(|&(x, y)| vec![x, y]).collect(),
        )
    }

    /// Returns the recognised shape kind, if the tag is known.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        ShapeKind::from_tag(&self.shape)
    }
}
