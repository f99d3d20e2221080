// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Resolution of filenames named in test cases.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Supplies raw bytes for filenames referenced by test cases.
pub trait TestDataSource: Send + Sync {
    /// Returns true if `name` refers to an available file.
    fn contains(&self, name: &str) -> bool;

    /// Reads the file named `name`.
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Test data stored under a module-local directory.
///
/// Names are relative paths below the root; absolute paths and `..`
/// components are never resolved.
#[derive(Debug, Clone)]
pub struct TestDataDir {
    root: PathBuf,
}

impl TestDataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let confined = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        confined.then(|| self.root.join(relative))
    }
}

impl TestDataSource for TestDataDir {
    fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some_and(|p| p.is_file())
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self.resolve(name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{name}' is not a path below {}", self.root.display()),
            )
        })?;
        tracing::debug!("reading test data {}", path.display());
        std::fs::read(&path)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))
    }
}

/// In-memory test data, keyed by filename.
impl TestDataSource for HashMap<String, Vec<u8>> {
    fn contains(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no test data named '{name}'"))
        })
    }
}
