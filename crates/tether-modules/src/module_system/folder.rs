// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Folder modules: `package.json` main, then `index`

use crate::error::Result;
use crate::module_system::file::FileResolver;
use crate::module_system::package::PackageDescriptor;
use crate::module_system::resolver::{current_dir, is_path_form, path_id, read_file, Resolver};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves path-form identifiers naming a package directory
///
/// Only a malformed `package.json` is a hard failure; any other miss means the
/// directory is not a loadable module.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderResolver {
    file: FileResolver,
}

impl FolderResolver {
    /// Create a folder resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the entry file of the package in `dir`
    ///
    /// Order: `main`, `main/index`, then `index`. A `main` that resolves to
    /// nothing falls back to `index` instead of failing.
    pub fn resolve_dir(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let descriptor = PackageDescriptor::read(dir)?;
        if let Some(main) = descriptor.as_ref().and_then(PackageDescriptor::main) {
            let target = dir.join(main);
            if let Some(found) = self.try_file(&target) {
                return Ok(Some(found));
            }
            if let Some(found) = self.try_file(&target.join("index")) {
                return Ok(Some(found));
            }
            debug!(dir = %dir.display(), main, "main did not resolve, trying index");
        }
        Ok(self.try_file(&dir.join("index")))
    }

    fn try_file(&self, path: &Path) -> Option<PathBuf> {
        match self.file.resolve_path(path) {
            Ok(found) => found,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping candidate");
                None
            }
        }
    }
}

impl Resolver for FolderResolver {
    fn name(&self) -> &str {
        "folder"
    }

    fn load(&self, id: &str) -> Result<Option<Vec<u8>>> {
        if !is_path_form(id) {
            return Ok(None);
        }
        match self.resolve_dir(&current_dir()?.join(id))? {
            Some(path) => read_file(&path).map(Some),
            None => Ok(None),
        }
    }

    fn resolve(&self, id: &str, wd: &Path) -> Result<Option<String>> {
        if !is_path_form(id) {
            return Ok(None);
        }
        Ok(self.resolve_dir(&wd.join(id))?.as_deref().map(path_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModuleError;
    use std::fs;
    use tempfile::TempDir;

    fn canonical(path: PathBuf) -> Option<String> {
        Some(path_id(&fs::canonicalize(path).unwrap()))
    }

    #[test]
    fn test_main_field() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir_all(pkg.join("lib")).unwrap();
        fs::write(pkg.join("package.json"), r#"{"main": "lib/x"}"#).unwrap();
        fs::write(pkg.join("lib/x.js"), "").unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();

        let r = FolderResolver::new();
        let resolved = r.resolve("./pkg", dir.path()).unwrap().unwrap();
        assert!(resolved.ends_with(&format!("lib{}x.js", std::path::MAIN_SEPARATOR)));
    }

    #[test]
    fn test_main_directory_index() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir_all(pkg.join("lib")).unwrap();
        fs::write(pkg.join("package.json"), r#"{"main": "./lib"}"#).unwrap();
        fs::write(pkg.join("lib/index.json"), "{}").unwrap();

        let r = FolderResolver::new();
        assert_eq!(
            r.resolve("./pkg", dir.path()).unwrap(),
            canonical(pkg.join("lib/index.json"))
        );
    }

    #[test]
    fn test_index_without_descriptor() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir(&pkg).unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();

        let r = FolderResolver::new();
        assert_eq!(r.resolve("./pkg", dir.path()).unwrap(), canonical(pkg.join("index.js")));
    }

    #[test]
    fn test_broken_main_falls_back_to_index() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir(&pkg).unwrap();
        fs::write(pkg.join("package.json"), r#"{"name": "pkg", "main": "nope"}"#).unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();

        let r = FolderResolver::new();
        assert_eq!(r.resolve("./pkg", dir.path()).unwrap(), canonical(pkg.join("index.js")));
    }

    #[test]
    fn test_not_a_module() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("file.js"), "").unwrap();

        let r = FolderResolver::new();
        assert_eq!(r.resolve("./empty", dir.path()).unwrap(), None);
        assert_eq!(r.resolve("./file.js", dir.path()).unwrap(), None);
        assert_eq!(r.resolve("./missing", dir.path()).unwrap(), None);
        assert_eq!(r.resolve("empty", dir.path()).unwrap(), None);
    }

    #[test]
    fn test_absolute_id_load_and_resolve_agree() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir(&pkg).unwrap();
        fs::write(pkg.join("index.js"), "exports.pkg = 1;").unwrap();

        let r = FolderResolver::new();
        let id = pkg.to_string_lossy();
        assert_eq!(r.resolve(&id, elsewhere.path()).unwrap(), canonical(pkg.join("index.js")));
        assert_eq!(r.load(&id).unwrap().unwrap(), b"exports.pkg = 1;");
    }

    #[test]
    fn test_malformed_descriptor_is_hard_failure() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir(&pkg).unwrap();
        fs::write(pkg.join("package.json"), "{\"main\": ").unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();

        let r = FolderResolver::new();
        let err = r.resolve("./pkg", dir.path()).unwrap_err();
        assert!(matches!(err, ModuleError::PackageDescriptor { .. }));
    }
}
