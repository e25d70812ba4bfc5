// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Ordered resolver chain

use crate::error::{ModuleError, Result};
use crate::module_system::resolver::{absolute_dir, Resolver};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Append-only list of resolvers queried in registration order
///
/// A resolver that declines passes the identifier to the next one; a resolver
/// that fails ends the lookup. Lookups work on a snapshot of the list, so a
/// slow file system never blocks registration.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Mutex<Vec<Arc<dyn Resolver>>>,
}

impl ResolverChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver; it gets the lowest priority so far
    pub fn register<R: Resolver + 'static>(&self, resolver: R) {
        self.register_arc(Arc::new(resolver));
    }

    /// Append a shared resolver
    pub fn register_arc(&self, resolver: Arc<dyn Resolver>) {
        debug!(resolver = resolver.name(), "register resolver");
        self.resolvers.lock().push(resolver);
    }

    /// Number of registered resolvers
    pub fn len(&self) -> usize {
        self.resolvers.lock().len()
    }

    /// Check if no resolver is registered
    pub fn is_empty(&self) -> bool {
        self.resolvers.lock().is_empty()
    }

    /// Names of the registered resolvers, in priority order
    pub fn names(&self) -> Vec<String> {
        self.resolvers.lock().iter().map(|r| r.name().to_string()).collect()
    }

    fn snapshot(&self) -> Vec<Arc<dyn Resolver>> {
        self.resolvers.lock().clone()
    }

    /// Load the bytes of `id` from the first resolver that claims it
    pub fn load(&self, id: &str) -> Result<Vec<u8>> {
        for resolver in self.snapshot() {
            match resolver.load(id) {
                Ok(Some(bytes)) => {
                    debug!(id, resolver = resolver.name(), len = bytes.len(), "loaded module");
                    return Ok(bytes);
                }
                Ok(None) => trace!(id, resolver = resolver.name(), "not found"),
                Err(err) => {
                    warn!(id, resolver = resolver.name(), error = %err, "load failed");
                    return Err(ModuleError::module(id, err));
                }
            }
        }
        Err(ModuleError::ModuleNotFound(id.to_string()))
    }

    /// Resolve `id` requested from `wd` to its canonical identity
    ///
    /// `wd` is made absolute and its `..` segments are folded before any
    /// resolver sees it. An empty `wd` means the current directory.
    pub fn resolve(&self, id: &str, wd: impl AsRef<Path>) -> Result<String> {
        let wd = absolute_dir(wd.as_ref()).map_err(|e| ModuleError::module(id, e))?;

        for resolver in self.snapshot() {
            match resolver.resolve(id, &wd) {
                Ok(Some(name)) => {
                    debug!(id, wd = %wd.display(), resolver = resolver.name(), resolved = %name, "resolved module");
                    return Ok(name);
                }
                Ok(None) => trace!(id, resolver = resolver.name(), "not found"),
                Err(err) => {
                    warn!(id, resolver = resolver.name(), error = %err, "resolve failed");
                    return Err(ModuleError::module(id, err));
                }
            }
        }
        Err(ModuleError::ModuleNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resolver with a fixed answer that counts how often it is asked
    struct Fixed {
        name: &'static str,
        answer: Option<std::result::Result<&'static str, &'static str>>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, answer: Option<std::result::Result<&'static str, &'static str>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Resolver for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn load(&self, _id: &str) -> Result<Option<Vec<u8>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                None => Ok(None),
                Some(Ok(s)) => Ok(Some(s.as_bytes().to_vec())),
                Some(Err(e)) => Err(ModuleError::host(e)),
            }
        }

        fn resolve(&self, _id: &str, wd: &Path) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(wd.is_absolute());
            match self.answer {
                None => Ok(None),
                Some(Ok(s)) => Ok(Some(s.to_string())),
                Some(Err(e)) => Err(ModuleError::host(e)),
            }
        }
    }

    #[test]
    fn test_first_claim_wins() {
        let chain = ResolverChain::new();
        let a = Fixed::new("a", None);
        let b = Fixed::new("b", Some(Ok("from-b")));
        let c = Fixed::new("c", Some(Ok("from-c")));
        chain.register_arc(a.clone());
        chain.register_arc(b.clone());
        chain.register_arc(c.clone());

        assert_eq!(chain.load("x").unwrap(), b"from-b");
        assert_eq!(chain.resolve("x", ".").unwrap(), "from-b");
        assert_eq!(a.calls(), 2);
        assert_eq!(b.calls(), 2);
        assert_eq!(c.calls(), 0);
        assert_eq!(chain.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failure_aborts_chain() {
        let chain = ResolverChain::new();
        let broken = Fixed::new("broken", Some(Err("permission denied")));
        let later = Fixed::new("later", Some(Ok("never")));
        chain.register_arc(broken);
        chain.register_arc(later.clone());

        let err = chain.load("./x").unwrap_err();
        assert_eq!(err.to_string(), "./x: permission denied");
        let err = chain.resolve("./x", "").unwrap_err();
        assert!(matches!(err, ModuleError::Module { ref id, .. } if id == "./x"));
        assert_eq!(later.calls(), 0);
    }

    #[test]
    fn test_exhausted_chain() {
        let chain = ResolverChain::new();
        assert!(chain.is_empty());
        chain.register_arc(Fixed::new("a", None));
        chain.register_arc(Fixed::new("b", None));

        let err = chain.load("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "cannot find module 'missing'");
        assert!(chain.resolve("missing", "/").unwrap_err().is_not_found());
    }

    #[test]
    fn test_workdir_is_made_absolute() {
        struct Echo;
        impl Resolver for Echo {
            fn name(&self) -> &str {
                "echo"
            }
            fn resolve(&self, _id: &str, wd: &Path) -> Result<Option<String>> {
                Ok(Some(wd.to_string_lossy().into_owned()))
            }
        }

        let chain = ResolverChain::new();
        chain.register(Echo);
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(PathBuf::from(chain.resolve("x", "").unwrap()), cwd);
        assert_eq!(PathBuf::from(chain.resolve("x", "sub").unwrap()), cwd.join("sub"));
        assert_eq!(PathBuf::from(chain.resolve("x", "a/../other/.").unwrap()), cwd.join("other"));
        assert_eq!(chain.load("x").unwrap_err().to_string(), "cannot find module 'x'");
    }
}
