// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CommonJS module resolution
//!
//! Identifiers are resolved by an ordered [`ResolverChain`]. The stock chain is:
//!
//! 1. [`CoreResolver`] - embedded sources, exact key match
//! 2. [`FileResolver`] - `./x`, `./x.js`, `./x.json`
//! 3. [`FolderResolver`] - `package.json` `main`, then `index`
//! 4. [`NodeModulesResolver`] - bare identifiers, nearest `node_modules` first
//!
//! Identifiers always use `/` separators, whatever the host OS.

mod chain;
mod core;
mod file;
mod folder;
mod node_modules;
mod package;
mod resolver;

pub use chain::ResolverChain;
pub use self::core::{CoreModules, CoreResolver, BOOTSTRAP};
pub use file::{FileResolver, EXTENSIONS};
pub use folder::FolderResolver;
pub use node_modules::{NodeModulesResolver, NODE_MODULES};
pub use package::{PackageDescriptor, PACKAGE_JSON};
pub use resolver::{is_bare, is_path_form, Resolver};
