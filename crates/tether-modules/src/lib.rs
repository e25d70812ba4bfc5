// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # tether-modules
//!
//! A CommonJS module layer for embedded JavaScript engines.
//!
//! The crate does not execute scripts itself. It provides:
//!
//! - An ordered resolver chain (`require()` resolution): embedded core
//!   modules, files, folders with `package.json`, and `node_modules` search
//! - A lexical path service with POSIX and Windows flavors
//! - A lazily built, thread-safe binding cache (`process.binding()`)
//! - [`ModuleRuntime`], which ties these to any [`ScriptEngine`] and runs the
//!   bootstrap script
//!
//! ## Quick Start
//!
//! ```rust
//! use tether_modules::module_system::{FileResolver, ResolverChain};
//!
//! let chain = ResolverChain::new();
//! chain.register(FileResolver::new());
//! assert!(chain.resolve("./does-not-exist", ".").unwrap_err().is_not_found());
//! ```
//!
//! ```rust
//! use tether_modules::path::{Flavor, Posix, Win32};
//!
//! assert_eq!(Posix::normalize("a/b/../c"), "a/c");
//! assert_eq!(Win32::normalize("C:/a/./b"), "C:\\a\\b");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod capability;
pub mod config;
pub mod engine;
pub mod error;
pub mod module_system;
pub mod path;
pub mod runtime;

// Re-exports
pub use binding::BindingCache;
pub use capability::{Capability, CapabilityObject, NativeFunction};
pub use config::RuntimeConfig;
pub use engine::{Process, ScriptEngine, ScriptError, ScriptErrorKind, SourceLocation};
pub use error::{ModuleError, Result};
pub use module_system::{Resolver, ResolverChain};
pub use path::{ParsedPath, PathFlavor};
pub use runtime::ModuleRuntime;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
