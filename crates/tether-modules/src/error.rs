// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for module resolution and the runtime glue

use crate::engine::{ScriptError, ScriptErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for module operations
pub type Result<T> = std::result::Result<T, ModuleError>;

/// Errors that can occur while resolving, loading or binding modules
///
/// "Not found" inside a resolver is not an error: resolvers answer `Ok(None)`
/// and the chain moves on. Only the chain itself produces
/// [`ModuleError::ModuleNotFound`], once every resolver has declined.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Every registered resolver declined the identifier
    #[error("cannot find module '{0}'")]
    ModuleNotFound(String),

    /// A resolver failed; carries the identifier the caller asked for
    #[error("{id}: {source}")]
    Module {
        /// Identifier as requested by the calling script
        id: String,
        /// What went wrong inside the chain
        #[source]
        source: Box<ModuleError>,
    },

    /// `package.json` exists but is not a valid descriptor
    #[error("{}: {source}", path.display())]
    PackageDescriptor {
        /// Location of the descriptor
        path: PathBuf,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// File system error
    #[error("{}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No constructor was bound under this name
    #[error("cannot find binding '{0}'")]
    BindingNotFound(String),

    /// Wrong argument type passed from a script
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Error raised by the script engine
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Invalid runtime configuration
    #[error("invalid configuration in {origin}: {reason}")]
    Config {
        /// Config file or environment variable the value came from
        origin: String,
        /// Reason for failure
        reason: String,
    },

    /// Failure reported by host-supplied code (resolvers, binding constructors)
    #[error("{0}")]
    Host(String),
}

impl ModuleError {
    /// Wrap an error with the identifier that was requested
    pub fn module(id: impl Into<String>, source: ModuleError) -> Self {
        Self::Module {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Create an I/O error tied to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new TypeError
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a host error
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Script-visible error class to raise for this error
    pub fn script_class(&self) -> &'static str {
        match self {
            Self::Script(err) if err.kind == ScriptErrorKind::Syntax => "SyntaxError",
            Self::Module { source, .. } => match source.as_ref() {
                Self::PackageDescriptor { .. } => "SyntaxError",
                _ => "Error",
            },
            Self::TypeError(_) => "TypeError",
            _ => "Error",
        }
    }

    /// Returns true for the terminal "every resolver declined" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModuleNotFound(_))
    }
}
