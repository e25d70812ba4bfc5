// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Runtime configuration
//!
//! Values are layered: defaults, then `$CONFIG_DIR/tether/tether.toml`, then
//! `./tether.toml`, then `TETHER_*` environment variables.

use crate::engine::host_platform;
use crate::error::{ModuleError, Result};
use crate::module_system::BOOTSTRAP;
use crate::path::PathFlavor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "tether.toml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "TETHER_";

/// Configuration for a [`ModuleRuntime`](crate::runtime::ModuleRuntime)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Path flavor exposed to scripts as `path`; host flavor when unset
    pub platform: Option<PathFlavor>,

    /// Register the file, folder and `node_modules` resolvers after the core one
    pub default_resolvers: bool,

    /// Extra roots searched for bare identifiers, after the defaults
    pub search_paths: Vec<PathBuf>,

    /// Core key of the bootstrap script
    pub bootstrap: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            platform: None,
            default_resolvers: true,
            search_paths: Vec::new(),
            bootstrap: BOOTSTRAP.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the default locations and the environment
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(global) = global_config_path() {
            config.merge_from_file(&global)?;
        }
        config.merge_from_file(Path::new(CONFIG_FILE))?;
        config.merge_env(std::env::vars())?;

        Ok(config)
    }

    /// Load configuration from one file, ignoring the default locations
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ModuleError::io(path, e))?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Parse TOML text; `origin` names it in errors
    pub fn from_toml(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ModuleError::Config {
            origin: origin.to_string(),
            reason: e.message().to_string(),
        })
    }

    /// Overlay the settings of `path`, if it exists
    ///
    /// Only keys present in the file replace current values.
    fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(ModuleError::io(path, e)),
        };
        debug!(path = %path.display(), "loading config");

        let origin = path.display().to_string();
        let table: toml::Table = toml::from_str(&content).map_err(|e| ModuleError::Config {
            origin: origin.clone(),
            reason: e.message().to_string(),
        })?;
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Array(items) => {
                    for item in items {
                        match item {
                            toml::Value::String(s) if key == "search_paths" => {
                                self.search_paths.push(PathBuf::from(s))
                            }
                            other => {
                                return Err(ModuleError::Config {
                                    origin,
                                    reason: format!("unexpected value {} for '{}'", other, key),
                                });
                            }
                        }
                    }
                    continue;
                }
                other => other.to_string(),
            };
            self.set(&key, &value).map_err(|reason| ModuleError::Config {
                origin: origin.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    /// Overlay `TETHER_*` variables from `vars`
    pub fn merge_env<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_lowercase();
            if key == "search_paths" {
                self.search_paths.extend(std::env::split_paths(&value));
                continue;
            }
            self.set(&key, &value)
                .map_err(|reason| ModuleError::Config { origin: name.clone(), reason })?;
        }
        Ok(())
    }

    /// Set one value from its string form
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "platform" => self.platform = Some(value.parse()?),
            "default_resolvers" => {
                self.default_resolvers = value
                    .parse()
                    .map_err(|_| format!("'{}' expects true or false, got '{}'", key, value))?
            }
            "search_paths" => self.search_paths.push(PathBuf::from(value)),
            "bootstrap" => self.bootstrap = value.to_string(),
            other => return Err(format!("unknown key '{}'", other)),
        }
        Ok(())
    }

    /// The configured path flavor, or the host's
    pub fn flavor(&self) -> PathFlavor {
        self.platform.unwrap_or_else(PathFlavor::host)
    }

    /// `process.platform` string for the configured flavor
    pub fn platform_name(&self) -> &'static str {
        match (self.flavor(), host_platform()) {
            (PathFlavor::Win32, _) => "win32",
            (PathFlavor::Posix, "win32") => "posix",
            (PathFlavor::Posix, host) => host,
        }
    }
}

/// `$CONFIG_DIR/tether/tether.toml`
fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tether").join(CONFIG_FILE))
}
