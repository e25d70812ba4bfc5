// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host-side capability objects exposed to scripts through `process.binding()`

use crate::error::{ModuleError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Native function callable from scripts
pub type NativeFunction = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A single property of a capability object
#[derive(Clone)]
pub enum Capability {
    /// Plain data
    Value(Value),
    /// Native function
    Function(NativeFunction),
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Function(_) => f.write_str("Function"),
        }
    }
}

/// Object populated by a binding constructor
///
/// Starts empty; the constructor fills it with data and native functions and
/// the engine adapter mirrors it into the script world.
#[derive(Debug, Clone, Default)]
pub struct CapabilityObject {
    entries: BTreeMap<String, Capability>,
}

impl CapabilityObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a data property
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), Capability::Value(value.into()));
    }

    /// Set a function property
    pub fn set_function<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Capability::Function(Arc::new(f)));
    }

    /// Get a property
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.entries.get(name)
    }

    /// Get a data property
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.entries.get(name)? {
            Capability::Value(v) => Some(v),
            Capability::Function(_) => None,
        }
    }

    /// Call a function property
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.entries.get(name) {
            Some(Capability::Function(f)) => f(args),
            _ => Err(ModuleError::type_error(format!("{} is not a function", name))),
        }
    }

    /// Property names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fetch a required string argument
pub fn string_arg<'a>(args: &'a [Value], index: usize, name: &str) -> Result<&'a str> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(ModuleError::type_error(format!("{} must be a String", name))),
    }
}

/// Fetch an optional string argument
///
/// Missing or falsy arguments (`null`, `false`, `0`, `""`) read as `None`;
/// any other non-string is a TypeError.
pub fn optional_string_arg<'a>(args: &'a [Value], index: usize, name: &str) -> Result<Option<&'a str>> {
    match args.get(index) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ModuleError::type_error(format!("{} must be a String", name))),
    }
}
