// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! File modules: exact path, then path + extension

use crate::error::{ModuleError, Result};
use crate::module_system::resolver::{current_dir, is_path_form, path_id, read_file, Resolver};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Extensions probed, in order, when the exact path is not a file
pub const EXTENSIONS: [&str; 2] = [".js", ".json"];

/// Resolves path-form identifiers to regular files
///
/// Never yields a directory. Results are symlink-resolved absolute paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResolver;

impl FileResolver {
    /// Create a file resolver
    pub fn new() -> Self {
        Self
    }

    /// Find the file for `path` and return its canonical path
    ///
    /// Tries `path` itself, then `path` with each of [`EXTENSIONS`] appended.
    pub fn resolve_path(&self, path: &Path) -> Result<Option<PathBuf>> {
        let found = std::iter::once(path.to_path_buf())
            .chain(EXTENSIONS.iter().map(|ext| with_suffix(path, ext)))
            .find(|candidate| is_file(candidate));

        match found {
            Some(file) => {
                trace!(candidate = %file.display(), "file match");
                std::fs::canonicalize(&file)
                    .map(Some)
                    .map_err(|e| ModuleError::io(file, e))
            }
            None => Ok(None),
        }
    }
}

impl Resolver for FileResolver {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self, id: &str) -> Result<Option<Vec<u8>>> {
        if !is_path_form(id) {
            return Ok(None);
        }
        let direct = Path::new(id);
        if is_file(direct) {
            return read_file(direct).map(Some);
        }
        match self.resolve_path(&current_dir()?.join(id))? {
            Some(path) => read_file(&path).map(Some),
            None => Ok(None),
        }
    }

    fn resolve(&self, id: &str, wd: &Path) -> Result<Option<String>> {
        if !is_path_form(id) {
            return Ok(None);
        }
        Ok(self.resolve_path(&wd.join(id))?.as_deref().map(path_id))
    }
}

/// Check if `path` exists and is a regular file (following symlinks)
pub(crate) fn is_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file())
}

/// `path` with `suffix` appended to its last component
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}
