//! Python runtime backed by an external interpreter
//!
//! The worker script is embedded in the binary and passed to the interpreter
//! with `-c`. Each [`Runtime::load`] starts a new worker, so every analysis
//! gets a fresh scope. Calls are timed inside the worker with
//! `time.perf_counter`, keeping pipe overhead out of the measurement.

use super::{Invocation, Runtime, RuntimeError};
use crate::models::{CallableInfo, Value};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;
use tracing::{debug, warn};

/// Worker script (Python)
pub const PROBE_WORKER: &str = include_str!("../../scripts/probe_worker.py");

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request<'a> {
    Load { source: &'a str },
    Call { name: &'a str, args: &'a [Value] },
    Run { source: &'a str },
}

#[derive(Debug, Deserialize)]
struct Response {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    callables: Vec<CallableInfo>,
    #[serde(default)]
    elapsed: Option<f64>,
    #[serde(default)]
    output: String,
}

impl Response {
    fn into_invocation(self) -> Result<Invocation, RuntimeError> {
        let secs = self
            .elapsed
            .ok_or_else(|| RuntimeError::Protocol("reply is missing 'elapsed'".to_string()))?;
        let elapsed = Duration::try_from_secs_f64(secs)
            .map_err(|e| RuntimeError::Protocol(format!("bad elapsed time {}: {}", secs, e)))?;
        Ok(Invocation {
            elapsed,
            output: self.output,
        })
    }
}

struct Worker {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Worker {
    fn spawn(program: &str) -> Result<Self, RuntimeError> {
        debug!("Starting probe worker with {}", program);
        let mut child = Command::new(program)
            .arg("-u")
            .arg("-c")
            .arg(PROBE_WORKER)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| RuntimeError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RuntimeError::Protocol("worker stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RuntimeError::Protocol("worker stdout unavailable".to_string()))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn request(&mut self, request: &Request<'_>) -> Result<Response, RuntimeError> {
        let mut line = serde_json::to_string(request)
            .map_err(|e| RuntimeError::Protocol(format!("cannot encode request: {}", e)))?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.flush()?;

        let mut reply = String::new();
        if self.stdout.read_line(&mut reply)? == 0 {
            return Err(RuntimeError::Protocol(
                "worker exited without replying".to_string(),
            ));
        }

        let response: Response = serde_json::from_str(reply.trim_end()).map_err(|e| {
            RuntimeError::Protocol(format!(
                "unreadable reply ({}): {}",
                e,
                reply.chars().take(200).collect::<String>()
            ))
        })?;

        if response.ok {
            Ok(response)
        } else {
            Err(RuntimeError::Execution(
                response
                    .error
                    .unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!("Probe worker already gone: {}", e);
        }
        let _ = self.child.wait();
    }
}

/// Runs Python snippets through an external interpreter
pub struct PythonRuntime {
    program: String,
    worker: Option<Worker>,
}

impl PythonRuntime {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            worker: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that the interpreter can be started
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn worker(&mut self) -> Result<&mut Worker, RuntimeError> {
        self.worker
            .as_mut()
            .ok_or_else(|| RuntimeError::Protocol("no snippet loaded".to_string()))
    }
}

impl Runtime for PythonRuntime {
    fn name(&self) -> &'static str {
        "python"
    }

    fn load(&mut self, source: &str) -> Result<Vec<CallableInfo>, RuntimeError> {
        // Drop the previous worker first so its scope dies with it
        self.worker = None;
        let mut worker = Worker::spawn(&self.program)?;
        let response = worker.request(&Request::Load { source })?;
        self.worker = Some(worker);
        if response.callables.is_empty() {
            warn!("Snippet defines no callables");
        }
        Ok(response.callables)
    }

    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Invocation, RuntimeError> {
        self.worker()?
            .request(&Request::Call { name, args })?
            .into_invocation()
    }

    fn run_script(&mut self, source: &str) -> Result<Invocation, RuntimeError> {
        self.worker()?
            .request(&Request::Run { source })?
            .into_invocation()
    }
}
