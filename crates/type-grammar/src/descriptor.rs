// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The parsed form of a type-specification string.
//!
//! A [`TypeDescriptor`] is a tagged variant over the five main types plus a
//! list flag. Rendering (`Display`) produces the canonical string form, so
//! `parse(s).to_string() == s` for every canonical `s`.

use std::fmt;
use value_core::DType;

/// Refinement of the `numeric` main type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericSubtype {
    /// Exact integers only.
    Int,
    /// Any number; integers are accepted as floats.
    Float,
}

/// Refinement of the `text` main type. `str` is the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSubtype {
    Str,
}

/// Refinement of the `boolean` main type. `bool` is the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolSubtype {
    Bool,
}

/// Refinement of the `ndarray` main type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArraySubtype {
    /// A concrete element type that must match exactly.
    Element(DType),
    /// A `uint8` image: `(h, w)`, `(h, w, 3)` or `(h, w, 4)`.
    Image,
}

/// A single dimension constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// The axis must have exactly this size.
    Fixed(usize),
    /// Any positive size.
    Free,
}

/// Subtype and dimension constraints of an `ndarray` slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ArraySpec {
    pub subtype: Option<ArraySubtype>,
    /// Empty means "any rank". N entries fix the rank to N.
    pub dims: Vec<Dim>,
}

impl ArraySpec {
    /// Returns the required rank, or `None` if the rank is unconstrained.
    ///
    /// `image` reports `None` here; its rank rule is handled separately.
    pub fn rank(&self) -> Option<usize> {
        (!self.dims.is_empty()).then_some(self.dims.len())
    }

    /// Returns the element type the array must have, if any.
    pub fn element_dtype(&self) -> Option<DType> {
        match self.subtype {
            Some(ArraySubtype::Element(dtype)) => Some(dtype),
            Some(ArraySubtype::Image) => Some(DType::UInt8),
            None => None,
        }
    }

    /// Returns `true` for `ndarray/image`.
    pub fn is_image(&self) -> bool {
        self.subtype == Some(ArraySubtype::Image)
    }
}

/// The main type of a slot together with its refinements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Numeric(Option<NumericSubtype>),
    Text(Option<TextSubtype>),
    Boolean(Option<BoolSubtype>),
    NdArray(ArraySpec),
    /// Fixed native domain: `(shape tag, coordinate tuples)`.
    Annotation,
}

impl TypeKind {
    /// Returns the main-type token (`"numeric"`, `"ndarray"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Numeric(_) => "numeric",
            TypeKind::Text(_) => "text",
            TypeKind::Boolean(_) => "boolean",
            TypeKind::NdArray(_) => "ndarray",
            TypeKind::Annotation => "annotation",
        }
    }

    fn subtype_token(&self) -> Option<&'static str> {
        match self {
            TypeKind::Numeric(Some(NumericSubtype::Int)) => Some("int"),
            TypeKind::Numeric(Some(NumericSubtype::Float)) => Some("float"),
            TypeKind::Text(Some(TextSubtype::Str)) => Some("str"),
            TypeKind::Boolean(Some(BoolSubtype::Bool)) => Some("bool"),
            TypeKind::NdArray(ArraySpec {
                subtype: Some(ArraySubtype::Image),
                ..
            }) => Some("image"),
            TypeKind::NdArray(ArraySpec {
                subtype: Some(ArraySubtype::Element(dtype)),
                ..
            }) => Some(dtype.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if let Some(sub) = self.subtype_token() {
            write!(f, "/{sub}")?;
        }
        if let TypeKind::NdArray(spec) = self {
            for dim in &spec.dims {
                match dim {
                    Dim::Fixed(n) => write!(f, "/{n}")?,
                    Dim::Free => f.write_str("/")?,
                }
            }
        }
        Ok(())
    }
}

/// A parsed type specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    /// The native value is a sequence of values each matching `kind`.
    pub is_list: bool,
}

impl TypeDescriptor {
    /// Creates a non-list descriptor.
    pub fn scalar(kind: TypeKind) -> Self {
        Self {
            kind,
            is_list: false,
        }
    }

    /// Creates a list descriptor.
    pub fn list(kind: TypeKind) -> Self {
        Self {
            kind,
            is_list: true,
        }
    }

    /// Returns the descriptor each list element must match.
    pub fn element(&self) -> TypeDescriptor {
        Self::scalar(self.kind.clone())
    }

    /// Returns the array constraints when this is an `ndarray` slot.
    pub fn array_spec(&self) -> Option<&ArraySpec> {
        match &self.kind {
            TypeKind::NdArray(spec) => Some(spec),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_list {
            write!(f, "[{}]", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_array() {
        let d = TypeDescriptor::scalar(TypeKind::NdArray(ArraySpec {
            subtype: Some(ArraySubtype::Element(DType::UInt8)),
            dims: vec![Dim::Free, Dim::Free, Dim::Fixed(3)],
        }));
        assert_eq!(d.to_string(), "ndarray/uint8///3");
    }

    #[test]
    fn test_render_list() {
        let d = TypeDescriptor::list(TypeKind::Numeric(Some(NumericSubtype::Float)));
        assert_eq!(d.to_string(), "[numeric/float]");
        assert_eq!(d.element().to_string(), "numeric/float");
    }

    #[test]
    fn test_array_spec_helpers() {
        let image = ArraySpec {
            subtype: Some(ArraySubtype::Image),
            dims: vec![],
        };
        assert!(image.is_image());
        assert_eq!(image.element_dtype(), Some(DType::UInt8));
        assert_eq!(image.rank(), None);

        let free = ArraySpec::default();
        assert_eq!(free.element_dtype(), None);
        assert_eq!(free.rank(), None);
    }
}
