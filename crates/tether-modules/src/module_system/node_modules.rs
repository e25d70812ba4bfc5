// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Bare identifiers, searched in `node_modules` up the directory tree

use crate::error::Result;
use crate::module_system::file::FileResolver;
use crate::module_system::folder::FolderResolver;
use crate::module_system::resolver::{
    absolute_dir, clean, current_dir, is_bare, path_id, read_file, Resolver,
};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Name of the dependency directory probed at each level
pub const NODE_MODULES: &str = "node_modules";

/// Resolves bare identifiers by ascending from the working directory
///
/// The nearest ancestor with a match wins. An anchored resolver ignores the
/// requesting directory and always starts from its anchor.
#[derive(Debug, Clone, Default)]
pub struct NodeModulesResolver {
    file: FileResolver,
    folder: FolderResolver,
    anchor: Option<PathBuf>,
}

impl NodeModulesResolver {
    /// Resolver that starts from the requesting directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that always starts from `root`
    ///
    /// A relative `root` is taken against the current directory now, not at
    /// lookup time.
    pub fn anchored(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            anchor: Some(absolute_dir(root.as_ref())?),
            ..Self::default()
        })
    }

    /// The fixed starting directory, if any
    pub fn anchor(&self) -> Option<&Path> {
        self.anchor.as_deref()
    }

    /// Search for `id` starting at `start`
    ///
    /// `..` segments in `start` are folded first, so only real ancestors are
    /// searched.
    pub fn search(&self, id: &str, start: &Path) -> Result<Option<PathBuf>> {
        let start = clean(start);
        let mut dir = start.as_path();
        loop {
            let probe = if dir.file_name().is_some_and(|n| n == NODE_MODULES) {
                dir.to_path_buf()
            } else {
                dir.join(NODE_MODULES)
            };
            trace!(id, probe = %probe.display(), "probing");

            let target = probe.join(id);
            if let Some(found) = self.file.resolve_path(&target)? {
                return Ok(Some(found));
            }
            if let Some(found) = self.folder.resolve_dir(&target)? {
                return Ok(Some(found));
            }

            match dir.parent() {
                Some(parent) if parent != dir => dir = parent,
                _ => return Ok(None),
            }
        }
    }

    fn start<'a>(&'a self, wd: &'a Path) -> &'a Path {
        self.anchor.as_deref().unwrap_or(wd)
    }
}

impl Resolver for NodeModulesResolver {
    fn name(&self) -> &str {
        if self.anchor.is_some() {
            "node_modules (anchored)"
        } else {
            "node_modules"
        }
    }

    fn load(&self, id: &str) -> Result<Option<Vec<u8>>> {
        if !is_bare(id) {
            return Ok(None);
        }
        let cwd = current_dir()?;
        match self.search(id, self.start(&cwd))? {
            Some(path) => read_file(&path).map(Some),
            None => Ok(None),
        }
    }

    fn resolve(&self, id: &str, wd: &Path) -> Result<Option<String>> {
        if !is_bare(id) {
            return Ok(None);
        }
        Ok(self.search(id, self.start(wd))?.as_deref().map(path_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn canonical(path: PathBuf) -> Option<String> {
        Some(path_id(&fs::canonicalize(path).unwrap()))
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("a/b/node_modules")).unwrap();
        fs::create_dir_all(root.join("a/node_modules")).unwrap();
        fs::write(root.join("a/b/node_modules/foo.js"), "near").unwrap();
        fs::write(root.join("a/node_modules/foo.js"), "far").unwrap();

        let r = NodeModulesResolver::new();
        assert_eq!(
            r.resolve("foo", &root.join("a/b/c")).unwrap(),
            canonical(root.join("a/b/node_modules/foo.js"))
        );
        assert_eq!(r.resolve("foo", &root.join("a")).unwrap(), canonical(root.join("a/node_modules/foo.js")));
    }

    #[test]
    fn test_package_directory() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("node_modules/pkg");
        fs::create_dir_all(pkg.join("lib")).unwrap();
        fs::write(pkg.join("package.json"), r#"{"main": "lib/entry"}"#).unwrap();
        fs::write(pkg.join("lib/entry.js"), "").unwrap();
        fs::write(pkg.join("util.js"), "").unwrap();

        let r = NodeModulesResolver::new();
        let wd = dir.path().join("src");
        fs::create_dir(&wd).unwrap();
        assert_eq!(r.resolve("pkg", &wd).unwrap(), canonical(pkg.join("lib/entry.js")));
        assert_eq!(r.resolve("pkg/util", &wd).unwrap(), canonical(pkg.join("util.js")));
    }

    #[test]
    fn test_inside_node_modules() {
        let dir = TempDir::new().unwrap();
        let nm = dir.path().join("node_modules");
        fs::create_dir_all(nm.join("dep")).unwrap();
        fs::write(nm.join("other.js"), "").unwrap();

        // wd already ends in node_modules, so it is probed directly
        let r = NodeModulesResolver::new();
        assert_eq!(r.resolve("other", &nm).unwrap(), canonical(nm.join("other.js")));
    }

    #[test]
    fn test_path_form_declined() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/foo.js"), "").unwrap();
        fs::write(dir.path().join("foo.js"), "").unwrap();

        let r = NodeModulesResolver::new();
        assert_eq!(r.resolve("./foo", dir.path()).unwrap(), None);
        assert_eq!(r.resolve("missing", dir.path()).unwrap(), None);
    }

    #[test]
    fn test_anchored() {
        let deps = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        fs::create_dir(deps.path().join("node_modules")).unwrap();
        fs::write(deps.path().join("node_modules/shared.json"), "{}").unwrap();

        let r = NodeModulesResolver::anchored(deps.path()).unwrap();
        assert_eq!(r.anchor(), Some(deps.path()));
        assert_eq!(
            r.resolve("shared", elsewhere.path()).unwrap(),
            canonical(deps.path().join("node_modules/shared.json"))
        );
        assert_eq!(r.load("shared").unwrap().unwrap(), b"{}");
    }

    #[test]
    fn test_parent_segments_only_visit_real_ancestors() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("x/other")).unwrap();
        fs::create_dir_all(root.join("x/a/node_modules")).unwrap();
        fs::write(root.join("x/a/node_modules/foo.js"), "").unwrap();

        let r = NodeModulesResolver::new();
        assert_eq!(r.resolve("foo", &root.join("x/a/../other")).unwrap(), None);
        assert_eq!(
            r.resolve("foo", &root.join("x/other/../a/b")).unwrap(),
            canonical(root.join("x/a/node_modules/foo.js"))
        );
    }

    #[test]
    fn test_anchor_made_absolute() {
        let r = NodeModulesResolver::anchored("deps/../vendor").unwrap();
        let anchor = r.anchor().unwrap();
        assert!(anchor.is_absolute());
        assert_eq!(anchor, std::env::current_dir().unwrap().join("vendor"));
    }

    #[test]
    fn test_malformed_descriptor_aborts_search() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("a/node_modules/pkg");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("package.json"), "not json").unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "").unwrap();

        let r = NodeModulesResolver::new();
        assert!(r.resolve("pkg", &dir.path().join("a")).is_err());
    }
}
