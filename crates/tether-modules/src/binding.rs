// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Lazily built native bindings (`process.binding(name)`)

use crate::error::{ModuleError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Constructor that populates a freshly created capability object
pub type Constructor<O> = Arc<dyn Fn(&mut O) -> Result<()> + Send + Sync>;

enum Entry<O> {
    Unbuilt(Constructor<O>),
    Built(Arc<O>),
}

/// Thread-safe cache of named bindings
///
/// A single lock spans check, construct and store, so concurrent first-time
/// lookups of a name run its constructor exactly once. Constructors must not
/// resolve bindings from the same cache.
pub struct BindingCache<O> {
    entries: Mutex<HashMap<String, Entry<O>>>,
}

impl<O: Default> BindingCache<O> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a constructor, discarding any value built by a previous one
    pub fn bind<F>(&self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&mut O) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(binding = %name, "bind");
        self.entries
            .lock()
            .insert(name, Entry::Unbuilt(Arc::new(constructor)));
    }

    /// Get the value for `name`, building it on first use
    ///
    /// A failing constructor leaves the entry unbuilt; the next call retries.
    pub fn resolve(&self, name: &str) -> Result<Arc<O>> {
        let mut entries = self.entries.lock();
        let entry = entries
            .get_mut(name)
            .ok_or_else(|| ModuleError::BindingNotFound(name.to_string()))?;

        let constructor = match entry {
            Entry::Built(value) => return Ok(Arc::clone(value)),
            Entry::Unbuilt(constructor) => Arc::clone(constructor),
        };

        debug!(binding = %name, "building binding");
        let mut object = O::default();
        constructor(&mut object)?;
        let value = Arc::new(object);
        *entry = Entry::Built(Arc::clone(&value));
        Ok(value)
    }

    /// Check if a constructor is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    /// Check if `name` has been built since it was last bound
    pub fn is_built(&self, name: &str) -> bool {
        matches!(self.entries.lock().get(name), Some(Entry::Built(_)))
    }

    /// Registered binding names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<O: Default> Default for BindingCache<O> {
    fn default() -> Self {
        Self::new()
    }
}
