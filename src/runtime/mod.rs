//! Callable discovery and invocation
//!
//! A [`Runtime`] is the only place user code runs. It loads a snippet into a
//! fresh scope, reports the invokable bindings it finds together with their
//! parameter metadata, and invokes them by name.
//!
//! Two runtimes ship with the crate:
//! - [`PythonRuntime`] runs snippets in an external Python interpreter
//! - [`NativeRuntime`] wraps Rust closures registered with declared parameters
//!
//! Nothing here sandboxes the code beyond what the host process boundary gives.

mod native;
mod python;

pub use native::{NativeFn, NativeRuntime};
pub use python::PythonRuntime;

use crate::models::{CallableInfo, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or running user code
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The user code itself raised
    #[error("{0}")]
    Execution(String),

    #[error("No callable named '{0}' in the loaded snippet")]
    UnknownCallable(String),

    #[error("Failed to start interpreter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Interpreter protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one timed invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Wall-clock time of the call alone
    pub elapsed: Duration,
    /// Textual representation of the return value
    pub output: String,
}

pub trait Runtime {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Run `source` in a fresh scope and list the invokable bindings, in
    /// binding order. Replaces whatever was loaded before.
    fn load(&mut self, source: &str) -> Result<Vec<CallableInfo>, RuntimeError>;

    /// Call a loaded callable once and time it
    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Invocation, RuntimeError>;

    /// Execute the whole snippet once more as a single timed trial; the output
    /// is a dump of the resulting scope
    fn run_script(&mut self, source: &str) -> Result<Invocation, RuntimeError>;
}

impl<R: Runtime + ?Sized> Runtime for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn load(&mut self, source: &str) -> Result<Vec<CallableInfo>, RuntimeError> {
        (**self).load(source)
    }

    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Invocation, RuntimeError> {
        (**self).invoke(name, args)
    }

    fn run_script(&mut self, source: &str) -> Result<Invocation, RuntimeError> {
        (**self).run_script(source)
    }
}
