// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The resolver capability shared by every strategy in the chain

use crate::error::{ModuleError, Result};
use std::path::{Component, Path, PathBuf};

/// A module resolution strategy
///
/// Both operations answer in three ways:
/// - `Ok(Some(_))`: the resolver claims the identifier
/// - `Ok(None)`: not found here; the chain asks the next resolver
/// - `Err(_)`: hard failure; the chain stops and reports it
///
/// A resolver may implement only one of the operations; the defaults decline.
pub trait Resolver: Send + Sync {
    /// Short name for diagnostics
    fn name(&self) -> &str;

    /// Read the bytes of module `id`
    fn load(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let _ = id;
        Ok(None)
    }

    /// Map `id`, requested from `wd`, to its canonical identity
    ///
    /// `wd` is always absolute when called through the chain.
    fn resolve(&self, id: &str, wd: &Path) -> Result<Option<String>> {
        let _ = (id, wd);
        Ok(None)
    }
}

/// Check if `id` is a path-form identifier
///
/// That is a `/`, `./` or `../` prefix, or a path the host considers absolute
/// (`C:\lib\x.js` on Windows).
pub fn is_path_form(id: &str) -> bool {
    id.starts_with('/')
        || id.starts_with("./")
        || id.starts_with("../")
        || Path::new(id).is_absolute()
}

/// Check if `id` is a bare identifier, looked up in `node_modules`
pub fn is_bare(id: &str) -> bool {
    !id.is_empty() && !is_path_form(id)
}

/// Canonical identity of a resolved path
pub(crate) fn path_id(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Read a resolved module file; failures here are hard errors
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| ModuleError::io(path, e))
}

/// Process working directory, for loads that carry no working directory
pub(crate) fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| ModuleError::io(".", e))
}

/// Make `path` absolute and fold its `.` and `..` segments lexically
///
/// An empty path means the current directory.
pub(crate) fn absolute_dir(path: &Path) -> Result<PathBuf> {
    let path = if path.as_os_str().is_empty() { Path::new(".") } else { path };
    let abs = std::path::absolute(path).map_err(|e| ModuleError::io(path, e))?;
    Ok(clean(&abs))
}

/// Fold `.` and `..` segments without touching the file system
///
/// `..` at the root stays at the root; leading `..` of a relative path is kept.
pub(crate) fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
