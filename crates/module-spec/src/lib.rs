// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # module-spec
//!
//! The specification document of an analytics module, loaded once at
//! startup and read-only afterwards.
//!
//! - [`ModuleSpec`]: packaging metadata ([`ModuleInfo`]) plus methods by name.
//! - [`MethodSpec`]: ordered input and output slots with parsed
//!   [`type_grammar::TypeDescriptor`]s, and the regression test cases.
//! - [`Category`]: what an output means (segmentation, measurement, ...).
//!
//! Every type string is parsed and every structural rule is checked at load
//! time, so a loaded specification never fails later on format grounds.
//!
//! # Example
//! ```no_run
//! use module_spec::ModuleSpec;
//! use std::path::Path;
//!
//! let spec = ModuleSpec::from_file(Path::new("./specification.json")).unwrap();
//! println!("{}", spec.summary());
//! for method in spec.methods() {
//!     println!("  {}", method.signature());
//! }
//! ```

mod category;
mod error;
mod spec;

pub use category::{Category, CategoryName};
pub use error::SpecError;
pub use spec::{load_spec, MethodSpec, ModuleInfo, ModuleSpec, OutputSpec, SlotSpec, TestCase};
