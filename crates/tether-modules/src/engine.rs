// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Contract with the script-execution engine
//!
//! The module layer never interprets script semantics. It hands source text to
//! an engine for compilation, runs the result, and passes the `process` object
//! to the bootstrap function. Everything else (values, scopes, raising errors
//! inside scripts) belongs to the engine.

use crate::binding::BindingCache;
use crate::capability::CapabilityObject;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// A script engine able to compile and run module bodies
pub trait ScriptEngine {
    /// Compiled form of a source text
    type Script;
    /// Value produced by running a script
    type Value;

    /// Compile `source` under `name` (used in diagnostics)
    fn compile(&mut self, name: &str, source: &[u8]) -> std::result::Result<Self::Script, ScriptError>;

    /// Run a compiled script and return its completion value
    fn run(&mut self, script: &Self::Script) -> std::result::Result<Self::Value, ScriptError>;

    /// Call the bootstrap function with the `process` object as its only argument
    fn call_bootstrap(
        &mut self,
        entry: &Self::Value,
        process: &Process,
    ) -> std::result::Result<Self::Value, ScriptError>;
}

/// Category of an engine error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptErrorKind {
    /// Source failed to parse
    Syntax,
    /// Exception thrown while running
    Runtime,
}

/// Position of a diagnostic in a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source name; empty for anonymous scripts
    pub file: String,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

/// Error reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// Syntax or runtime
    pub kind: ScriptErrorKind,
    /// Engine message (for runtime errors, the full `Name: message` text)
    pub message: String,
    /// Where the first error occurred
    pub location: Option<SourceLocation>,
    /// Number of further syntax errors reported together with this one
    pub additional: usize,
}

impl ScriptError {
    /// Create a syntax error
    pub fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: ScriptErrorKind::Syntax,
            message: message.into(),
            location: Some(location),
            additional: 0,
        }
    }

    /// Create a runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ScriptErrorKind::Runtime,
            message: message.into(),
            location: None,
            additional: 0,
        }
    }

    /// Record further errors reported together with this one
    pub fn with_additional(mut self, additional: usize) -> Self {
        self.additional = additional;
        self
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.location) {
            (ScriptErrorKind::Syntax, Some(loc)) => {
                let file = if loc.file.is_empty() {
                    "<anonymous>"
                } else {
                    loc.file.as_str()
                };
                write!(f, "{}:{}:{}: {}", file, loc.line, loc.column, self.message)?;
                if self.additional > 0 {
                    write!(f, " (and {} more errors)", self.additional)?;
                }
                Ok(())
            }
            _ => f.write_str(self.message.trim()),
        }
    }
}

impl std::error::Error for ScriptError {}

/// The `process` object handed to the bootstrap script
#[derive(Clone)]
pub struct Process {
    platform: String,
    bindings: Arc<BindingCache<CapabilityObject>>,
}

impl Process {
    pub(crate) fn new(platform: impl Into<String>, bindings: Arc<BindingCache<CapabilityObject>>) -> Self {
        Self {
            platform: platform.into(),
            bindings,
        }
    }

    /// `process.platform`
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// `process.binding(name)`
    pub fn binding(&self, name: &str) -> Result<Arc<CapabilityObject>> {
        self.bindings.resolve(name)
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

/// `process.platform` for the host: `win32` on Windows, otherwise the OS name
pub fn host_platform() -> &'static str {
    if cfg!(windows) {
        "win32"
    } else {
        std::env::consts::OS
    }
}
