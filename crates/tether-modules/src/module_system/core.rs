// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Embedded core modules (bootstrap and built-in library sources)

use crate::error::Result;
use crate::module_system::resolver::Resolver;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Key of the bootstrap script
pub const BOOTSTRAP: &str = "internal/bootstrap.js";

const SOURCES: &[(&str, &[u8])] = &[
    (BOOTSTRAP, include_bytes!("../../lib/internal/bootstrap.js")),
    ("internal/module.js", include_bytes!("../../lib/internal/module.js")),
    ("module.js", include_bytes!("../../lib/module.js")),
    ("path.js", include_bytes!("../../lib/path.js")),
];

static BUILTIN: LazyLock<Arc<CoreModules>> =
    LazyLock::new(|| Arc::new(SOURCES.iter().map(|&(k, v)| (k, v)).collect()));

/// Immutable table from exact key to module source
///
/// Keys carry their extension (`module.js`), and lookups match them exactly.
#[derive(Debug, Clone, Default)]
pub struct CoreModules {
    sources: HashMap<Cow<'static, str>, Cow<'static, [u8]>>,
}

impl CoreModules {
    /// The process-wide table compiled into the crate
    pub fn builtin() -> Arc<CoreModules> {
        Arc::clone(&BUILTIN)
    }

    /// Source for `key`
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.sources.get(key).map(|v| v.as_ref())
    }

    /// Check if `key` exists
    pub fn contains(&self, key: &str) -> bool {
        self.sources.contains_key(key)
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sources.keys().map(|k| k.as_ref()).collect();
        keys.sort_unstable();
        keys
    }

    /// Iterate over key and source pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.sources.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    /// Number of modules
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CoreModules
where
    K: Into<Cow<'static, str>>,
    V: Into<Cow<'static, [u8]>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Resolver over a [`CoreModules`] table
///
/// The table is never mutated after construction, so it is shared without a lock.
#[derive(Debug, Clone)]
pub struct CoreResolver {
    modules: Arc<CoreModules>,
}

impl CoreResolver {
    /// Resolver over the built-in table
    pub fn new() -> Self {
        Self::with_modules(CoreModules::builtin())
    }

    /// Resolver over a custom table
    pub fn with_modules(modules: Arc<CoreModules>) -> Self {
        Self { modules }
    }

    /// The backing table
    pub fn modules(&self) -> &Arc<CoreModules> {
        &self.modules
    }
}

impl Default for CoreResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for CoreResolver {
    fn name(&self) -> &str {
        "core"
    }

    fn load(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.modules.get(id).map(<[u8]>::to_vec))
    }

    fn resolve(&self, id: &str, _wd: &Path) -> Result<Option<String>> {
        Ok(self.modules.contains(id).then(|| id.to_string()))
    }
}
