//! Runtime bootstrap with a stand-in engine

use serde_json::json;
use std::fs;
use tempfile::TempDir;
use tether_modules::engine::host_platform;
use tether_modules::runtime::WRAPPER;
use tether_modules::{
    ModuleRuntime, PathFlavor, Process, RuntimeConfig, ScriptEngine, ScriptError, SourceLocation,
};

/// Engine that keeps sources as text and checks braces balance
#[derive(Default)]
struct TextEngine {
    compiled: Vec<String>,
    platform: Option<String>,
    natives: Vec<String>,
}

impl ScriptEngine for TextEngine {
    type Script = String;
    type Value = String;

    fn compile(&mut self, name: &str, source: &[u8]) -> Result<String, ScriptError> {
        let text = String::from_utf8_lossy(source).into_owned();
        let opens = text.matches('{').count();
        let closes = text.matches('}').count();
        if opens != closes {
            return Err(ScriptError::syntax(
                "Unexpected end of input",
                SourceLocation {
                    file: name.to_string(),
                    line: text.lines().count() as u32,
                    column: 1,
                },
            ));
        }
        self.compiled.push(name.to_string());
        Ok(text)
    }

    fn run(&mut self, script: &String) -> Result<String, ScriptError> {
        Ok(script.clone())
    }

    fn call_bootstrap(&mut self, entry: &String, process: &Process) -> Result<String, ScriptError> {
        if !entry.contains("(function(process)") {
            return Err(ScriptError::runtime("TypeError: not a bootstrap function"));
        }
        self.platform = Some(process.platform().to_string());
        let natives = process
            .binding("natives")
            .map_err(|e| ScriptError::runtime(e.to_string()))?;
        self.natives = natives.keys().map(str::to_string).collect();
        Ok(String::new())
    }
}

#[test]
fn test_builtin_bootstrap() {
    let rt = ModuleRuntime::new(TextEngine::default(), RuntimeConfig::default()).unwrap();
    let engine = rt.engine();
    assert_eq!(engine.compiled, vec!["internal/bootstrap.js"]);
    assert_eq!(engine.platform.as_deref(), Some(host_platform()));
    assert_eq!(engine.natives, vec!["internal/bootstrap", "internal/module", "module", "path"]);
}

#[test]
fn test_platform_follows_config() {
    let config = RuntimeConfig {
        platform: Some(PathFlavor::Win32),
        ..RuntimeConfig::default()
    };
    let rt = ModuleRuntime::new(TextEngine::default(), config).unwrap();
    assert_eq!(rt.process().platform(), "win32");
    let path = rt.binding("path").unwrap();
    assert_eq!(path.value("sep"), Some(&json!("\\")));
    assert_eq!(path.value("delimiter"), Some(&json!(";")));
}

#[test]
fn test_compile_user_module() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("hello.js"), "module.exports = 'hi';").unwrap();
    fs::write(dir.path().join("unclosed.js"), "if (x) {").unwrap();

    let mut rt = ModuleRuntime::new(TextEngine::default(), RuntimeConfig::default()).unwrap();
    let id = rt.resolve("./hello", dir.path()).unwrap();
    let value = rt.compile(&id).unwrap();
    assert!(value.starts_with(WRAPPER[0]));
    assert!(value.ends_with(WRAPPER[1]));
    assert!(value.contains("module.exports = 'hi';"));
    assert_eq!(rt.engine().compiled.last(), Some(&id));

    let id = rt.resolve("./unclosed", dir.path()).unwrap();
    let err = rt.compile(&id).unwrap_err();
    assert_eq!(err.script_class(), "SyntaxError");
    assert!(err.to_string().starts_with(&id));
}

#[test]
fn test_vm_binding_uses_runtime_chain() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("node_modules/dep")).unwrap();
    fs::write(dir.path().join("node_modules/dep/index.js"), "exports.dep = 1;").unwrap();

    let rt = ModuleRuntime::new(TextEngine::default(), RuntimeConfig::default()).unwrap();
    let vm = rt.binding("vm").unwrap();
    let wd = dir.path().to_string_lossy().into_owned();

    let resolved = vm.call("resolve", &[json!("dep"), json!(wd)]).unwrap();
    let expected = fs::canonicalize(dir.path().join("node_modules/dep/index.js")).unwrap();
    assert_eq!(resolved, json!(expected.to_string_lossy()));
    assert_eq!(vm.call("load", &[resolved]).unwrap(), json!("exports.dep = 1;"));
}

#[test]
fn test_bootstrap_failures_abort_construction() {
    let config = RuntimeConfig {
        bootstrap: "module.js".to_string(),
        ..RuntimeConfig::default()
    };
    let err = ModuleRuntime::new(TextEngine::default(), config).err().unwrap();
    assert_eq!(err.to_string(), "TypeError: not a bootstrap function");
    assert_eq!(err.script_class(), "Error");

    let config = RuntimeConfig {
        bootstrap: "internal/missing.js".to_string(),
        ..RuntimeConfig::default()
    };
    let err = ModuleRuntime::new(TextEngine::default(), config).err().unwrap();
    assert!(err.is_not_found());
}
