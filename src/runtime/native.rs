//! In-process runtime over registered Rust closures
//!
//! Rust has no way to introspect a closure's parameters, so each callable is
//! registered together with a declared parameter list. The synthesizer reads
//! that list exactly as it would read an interpreter's signature.

use super::{Invocation, Runtime, RuntimeError};
use crate::models::{CallableInfo, ParamSpec, Value};
use std::time::Instant;
use tracing::debug;

/// A registered callable: arguments in, textual result out
pub type NativeFn = Box<dyn FnMut(&[Value]) -> anyhow::Result<String>>;

type ScriptFn = Box<dyn FnMut() -> anyhow::Result<String>>;

type LoadFn = Box<dyn FnMut(&str) -> anyhow::Result<()>>;

struct NativeCallable {
    info: CallableInfo,
    func: NativeFn,
}

/// Registry of Rust closures exposed through the [`Runtime`] interface.
///
/// ```rust,ignore
/// let runtime = NativeRuntime::new().register(
///     "sum_all",
///     vec![ParamSpec::new("arr")],
///     |args| Ok(format!("{:?}", args)),
/// );
/// ```
#[derive(Default)]
pub struct NativeRuntime {
    callables: Vec<NativeCallable>,
    script: Option<ScriptFn>,
    on_load: Option<LoadFn>,
}

impl NativeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callable. A later registration under the same name replaces
    /// the earlier one in place.
    pub fn register<F>(mut self, name: impl Into<String>, params: Vec<ParamSpec>, func: F) -> Self
    where
        F: FnMut(&[Value]) -> anyhow::Result<String> + 'static,
    {
        let info = CallableInfo::new(name, params);
        let callable = NativeCallable {
            info,
            func: Box::new(func),
        };
        match self
            .callables
            .iter_mut()
            .find(|c| c.info.name == callable.info.name)
        {
            Some(existing) => *existing = callable,
            None => self.callables.push(callable),
        }
        self
    }

    /// Body executed by [`Runtime::run_script`]; without one the script run
    /// produces an empty output
    pub fn with_script<F>(mut self, script: F) -> Self
    where
        F: FnMut() -> anyhow::Result<String> + 'static,
    {
        self.script = Some(Box::new(script));
        self
    }

    /// Hook run with the snippet text on every [`Runtime::load`], standing in
    /// for the snippet's top-level code. An error fails the load.
    pub fn on_load<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str) -> anyhow::Result<()> + 'static,
    {
        self.on_load = Some(Box::new(hook));
        self
    }
}

impl Runtime for NativeRuntime {
    fn name(&self) -> &'static str {
        "native"
    }

    fn load(&mut self, source: &str) -> Result<Vec<CallableInfo>, RuntimeError> {
        if let Some(hook) = self.on_load.as_mut() {
            hook(source).map_err(|e| RuntimeError::Execution(format!("{:#}", e)))?;
        }
        debug!("Native runtime exposes {} callables", self.callables.len());
        Ok(self.callables.iter().map(|c| c.info.clone()).collect())
    }

    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Invocation, RuntimeError> {
        let callable = self
            .callables
            .iter_mut()
            .find(|c| c.info.name == name)
            .ok_or_else(|| RuntimeError::UnknownCallable(name.to_string()))?;

        let start = Instant::now();
        let result = (callable.func)(args);
        let elapsed = start.elapsed();

        let output = result.map_err(|e| RuntimeError::Execution(format!("{:#}", e)))?;
        Ok(Invocation { elapsed, output })
    }

    fn run_script(&mut self, _source: &str) -> Result<Invocation, RuntimeError> {
        let start = Instant::now();
        let result = match self.script.as_mut() {
            Some(script) => script(),
            None => Ok(String::new()),
        };
        let elapsed = start.elapsed();

        let output = result.map_err(|e| RuntimeError::Execution(format!("{:#}", e)))?;
        Ok(Invocation { elapsed, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn test_load_lists_registered_callables_in_order() {
        let mut runtime = NativeRuntime::new()
            .register("b", vec![ParamSpec::new("n")], |_| Ok("1".into()))
            .register("a", vec![], |_| Ok("2".into()));
        let infos = runtime.load("").unwrap();
        let names: Vec<_> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(infos[0].params, vec![ParamSpec::new("n")]);
    }

    #[test]
    fn test_reregister_replaces() {
        let mut runtime = NativeRuntime::new()
            .register("f", vec![], |_| Ok("old".into()))
            .register("f", vec![], |_| Ok("new".into()));
        assert_eq!(runtime.load("").unwrap().len(), 1);
        assert_eq!(runtime.invoke("f", &[]).unwrap().output, "new");
    }

    #[test]
    fn test_invoke_passes_args() {
        let mut runtime = NativeRuntime::new().register("len", vec![ParamSpec::new("arr")], |args| {
            Ok(args[0].len().unwrap_or(0).to_string())
        });
        let inv = runtime.invoke("len", &[Value::List(vec![3, 2, 1])]).unwrap();
        assert_eq!(inv.output, "3");
    }

    #[test]
    fn test_invoke_errors() {
        let mut runtime =
            NativeRuntime::new().register("boom", vec![], |_| bail!("division by zero"));
        match runtime.invoke("boom", &[]) {
            Err(RuntimeError::Execution(msg)) => assert_eq!(msg, "division by zero"),
            other => panic!("expected execution error, got {:?}", other),
        }
        assert!(matches!(
            runtime.invoke("missing", &[]),
            Err(RuntimeError::UnknownCallable(_))
        ));
    }

    #[test]
    fn test_load_hook_failure() {
        let mut runtime = NativeRuntime::new()
            .register("f", vec![], |_| Ok("1".into()))
            .on_load(|source| {
                if source.contains("raise") {
                    bail!("ValueError: boom");
                }
                Ok(())
            });
        assert_eq!(runtime.load("def f(): ...").unwrap().len(), 1);
        match runtime.load("raise ValueError('boom')") {
            Err(RuntimeError::Execution(msg)) => assert_eq!(msg, "ValueError: boom"),
            other => panic!("expected execution error, got {:?}", other),
        }
    }

    #[test]
    fn test_run_script() {
        let mut bare = NativeRuntime::new();
        assert_eq!(bare.run_script("x = 1").unwrap().output, "");

        let mut scripted = NativeRuntime::new().with_script(|| Ok("{'x': 1}".into()));
        assert_eq!(scripted.run_script("x = 1").unwrap().output, "{'x': 1}");
    }
}
