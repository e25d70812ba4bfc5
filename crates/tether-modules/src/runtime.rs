// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! One module runtime per VM: resolver chain, bindings and bootstrap

use crate::binding::BindingCache;
use crate::capability::{optional_string_arg, string_arg, CapabilityObject};
use crate::config::RuntimeConfig;
use crate::engine::{Process, ScriptEngine};
use crate::error::{ModuleError, Result};
use crate::module_system::{
    CoreModules, CoreResolver, FileResolver, FolderResolver, NodeModulesResolver, Resolver,
    ResolverChain,
};
use crate::path::{Flavor, ParsedPath, PathFlavor, Posix};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Text placed around a module body to turn it into a function expression
pub const WRAPPER: [&str; 2] = [
    "(function(exports, require, module, __filename, __dirname) { ",
    "\n});",
];

/// Wrap a CommonJS module body
pub fn wrap(source: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WRAPPER[0].len() + source.len() + WRAPPER[1].len());
    out.extend_from_slice(WRAPPER[0].as_bytes());
    out.extend_from_slice(source);
    out.extend_from_slice(WRAPPER[1].as_bytes());
    out
}

/// Build the resolver chain described by `config`
///
/// The core resolver always comes first. With `default_resolvers` set, the
/// file, folder and `node_modules` resolvers follow, then one anchored
/// `node_modules` resolver per search path. Relative search paths are taken
/// against the current directory.
pub fn default_chain(config: &RuntimeConfig, core: Arc<CoreModules>) -> Result<ResolverChain> {
    let chain = ResolverChain::new();
    chain.register(CoreResolver::with_modules(core));
    if config.default_resolvers {
        chain.register(FileResolver::new());
        chain.register(FolderResolver::new());
        chain.register(NodeModulesResolver::new());
    }
    for root in &config.search_paths {
        chain.register(NodeModulesResolver::anchored(root)?);
    }
    Ok(chain)
}

/// The module layer of a single VM
///
/// Construction registers the resolvers, binds the built-in capabilities and
/// runs the bootstrap script; a runtime that exists has bootstrapped.
pub struct ModuleRuntime<E: ScriptEngine> {
    /// Script engine
    engine: E,
    /// Resolver chain, shared with the `vm` binding
    chain: Arc<ResolverChain>,
    /// Native bindings, shared with `process`
    bindings: Arc<BindingCache<CapabilityObject>>,
    /// The `process` object given to the bootstrap script
    process: Process,
    /// Configuration the runtime was built with
    config: RuntimeConfig,
}

impl<E: ScriptEngine> ModuleRuntime<E> {
    /// Create a runtime over the built-in core modules and bootstrap it
    pub fn new(engine: E, config: RuntimeConfig) -> Result<Self> {
        Self::with_core(engine, config, CoreModules::builtin())
    }

    /// Create a runtime over a custom core module table and bootstrap it
    pub fn with_core(engine: E, config: RuntimeConfig, core: Arc<CoreModules>) -> Result<Self> {
        let chain = Arc::new(default_chain(&config, Arc::clone(&core))?);
        let bindings = Arc::new(BindingCache::new());
        bind_builtins(&bindings, &chain, &core, config.flavor());

        let process = Process::new(config.platform_name(), Arc::clone(&bindings));
        let mut runtime = Self {
            engine,
            chain,
            bindings,
            process,
            config,
        };
        runtime.bootstrap()?;
        Ok(runtime)
    }

    fn bootstrap(&mut self) -> Result<E::Value> {
        let id = self.config.bootstrap.clone();
        info!(bootstrap = %id, platform = self.process.platform(), "bootstrapping");

        let source = self.chain.load(&id)?;
        let script = self.engine.compile(&id, &source)?;
        let entry = self.engine.run(&script)?;
        let value = self.engine.call_bootstrap(&entry, &self.process)?;

        debug!(resolvers = ?self.chain.names(), "bootstrap complete");
        Ok(value)
    }

    /// Append a resolver to the chain
    pub fn register<R: Resolver + 'static>(&self, resolver: R) {
        self.chain.register(resolver);
    }

    /// Bind a native capability; see [`BindingCache::bind`]
    pub fn bind<F>(&self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&mut CapabilityObject) -> Result<()> + Send + Sync + 'static,
    {
        self.bindings.bind(name, constructor);
    }

    /// Get a bound capability, building it on first use
    pub fn binding(&self, name: &str) -> Result<Arc<CapabilityObject>> {
        self.bindings.resolve(name)
    }

    /// Load the bytes of `id` through the chain
    pub fn load(&self, id: &str) -> Result<Vec<u8>> {
        self.chain.load(id)
    }

    /// Resolve `id`, requested from `wd`, through the chain
    pub fn resolve(&self, id: &str, wd: impl AsRef<Path>) -> Result<String> {
        self.chain.resolve(id, wd)
    }

    /// Load, wrap, compile and run the module `id`
    ///
    /// Returns the module function produced by the wrapper.
    pub fn compile(&mut self, id: &str) -> Result<E::Value> {
        let source = self.chain.load(id)?;
        let script = self.engine.compile(id, &wrap(&source))?;
        Ok(self.engine.run(&script)?)
    }

    /// The `process` object
    pub fn process(&self) -> &Process {
        &self.process
    }

    /// The resolver chain
    pub fn chain(&self) -> &Arc<ResolverChain> {
        &self.chain
    }

    /// The configuration the runtime was built with
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The script engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The script engine, mutably
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

fn bind_builtins(
    bindings: &BindingCache<CapabilityObject>,
    chain: &Arc<ResolverChain>,
    core: &Arc<CoreModules>,
    flavor: PathFlavor,
) {
    let core = Arc::clone(core);
    bindings.bind("natives", move |o| {
        for (key, source) in core.iter() {
            let name = &key[..key.len() - Posix::extname(key).len()];
            o.set(name, String::from_utf8_lossy(source).into_owned());
        }
        Ok(())
    });

    let chain = Arc::clone(chain);
    bindings.bind("vm", move |o| {
        let c = Arc::clone(&chain);
        o.set_function("load", move |args| {
            let id = string_arg(args, 0, "id")?;
            let bytes = c.load(id)?;
            Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        });
        let c = Arc::clone(&chain);
        o.set_function("resolve", move |args| {
            let id = string_arg(args, 0, "id")?;
            let wd = optional_string_arg(args, 1, "wd")?.unwrap_or(".");
            c.resolve(id, wd).map(Value::String)
        });
        o.set_function("wrap", |args| {
            let source = string_arg(args, 0, "source")?;
            Ok(Value::String(String::from_utf8_lossy(&wrap(source.as_bytes())).into_owned()))
        });
        Ok(())
    });

    bindings.bind("path", move |o| populate_path(o, flavor));
    bindings.bind("path/posix", |o| populate_path(o, PathFlavor::Posix));
    bindings.bind("path/win32", |o| populate_path(o, PathFlavor::Win32));
}

fn populate_path(o: &mut CapabilityObject, flavor: PathFlavor) -> Result<()> {
    o.set("sep", flavor.sep().to_string());
    o.set("delimiter", flavor.delimiter().to_string());

    o.set_function("basename", move |args| {
        let path = string_arg(args, 0, "path")?;
        let ext = match args.get(1) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => return Err(ModuleError::type_error("ext must be a String")),
        };
        Ok(Value::String(flavor.basename(path, ext)))
    });
    o.set_function("dirname", move |args| {
        Ok(Value::String(flavor.dirname(string_arg(args, 0, "path")?)))
    });
    o.set_function("extname", move |args| {
        Ok(Value::String(flavor.extname(string_arg(args, 0, "path")?)))
    });
    o.set_function("isAbsolute", move |args| {
        Ok(Value::Bool(flavor.is_absolute(string_arg(args, 0, "path")?)))
    });
    o.set_function("normalize", move |args| {
        Ok(Value::String(flavor.normalize(string_arg(args, 0, "path")?)))
    });
    o.set_function("parse", move |args| {
        let parsed = flavor.parse(string_arg(args, 0, "path")?);
        serde_json::to_value(parsed).map_err(|e| ModuleError::host(e.to_string()))
    });
    o.set_function("format", move |args| {
        let parsed: ParsedPath = match args.first() {
            Some(v @ Value::Object(_)) => serde_json::from_value(v.clone())
                .map_err(|e| ModuleError::type_error(format!("pathObject: {}", e)))?,
            _ => return Err(ModuleError::type_error("pathObject must be an Object")),
        };
        Ok(Value::String(flavor.format(&parsed)))
    });
    Ok(())
}
