// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `package.json` descriptor

use crate::error::{ModuleError, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// File name of the package descriptor
pub const PACKAGE_JSON: &str = "package.json";

/// The fields of `package.json` that matter for resolution
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageDescriptor {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,
    /// Entry point, relative to the package directory
    #[serde(default)]
    pub main: Option<String>,
}

impl PackageDescriptor {
    /// Read the descriptor of the package in `dir`
    ///
    /// A missing file is not an error. Malformed JSON is.
    pub fn read(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(PACKAGE_JSON);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ModuleError::io(path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ModuleError::PackageDescriptor { path, source })
    }

    /// `main`, if set to a non-empty string
    pub fn main(&self) -> Option<&str> {
        self.main.as_deref().filter(|m| !m.is_empty())
    }
}
