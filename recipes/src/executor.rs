//! Process execution engine.
//!
//! The `ProcessExecutor` runs one external command per call with a bounded
//! lifetime: stdin closed, stdout/stderr captured, and the whole process group
//! killed when the session timeout fires.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::{RecipeError, Result};

/// Default per-invocation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// A program plus its argument vector. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Create a command line for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments passed to the program.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        match shlex::try_join(words) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => write!(f, "{} {:?}", self.program, self.args),
        }
    }
}

/// Outcome of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Captured standard output, trimmed.
    pub stdout: String,

    /// Captured standard error, trimmed.
    pub stderr: String,

    /// Exit status. A missing OS code is reported as 0; killed-by-timeout
    /// processes never produce an `ExecutionResult`.
    pub exit_code: i32,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Anything that can run a [`CommandLine`] to completion.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` and collect its output.
    async fn run(&self, command: &CommandLine) -> Result<ExecutionResult>;
}

/// Context shared by every process the executor starts.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Working directory (None = inherit the server's).
    pub working_dir: Option<PathBuf>,

    /// Maximum execution time.
    pub timeout: Duration,
}

impl ExecutionContext {
    /// Create a context with the default timeout.
    pub fn new() -> Self {
        Self {
            working_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Executor for external processes.
///
/// Holds no mutable state, so one instance can serve overlapping calls.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    context: ExecutionContext,
}

impl ProcessExecutor {
    /// Create an executor with the default context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor from an explicit context.
    pub fn with_context(context: ExecutionContext) -> Self {
        Self { context }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.context.timeout = timeout;
        self
    }

    /// The timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.context.timeout
    }

    fn build(&self, command: &CommandLine) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.context.working_dir {
            cmd.current_dir(dir);
        }

        // Own process group so a timeout can take down just's shell children.
        #[cfg(unix)]
        {
            cmd.process_group(0);
        }

        cmd
    }
}

#[async_trait]
impl ProcessRunner for ProcessExecutor {
    async fn run(&self, command: &CommandLine) -> Result<ExecutionResult> {
        let start = Instant::now();
        let timeout = self.context.timeout;

        debug!(%command, timeout_ms = timeout.as_millis() as u64, "spawning process");

        let mut child = self
            .build(command)
            .spawn()
            .map_err(|source| RecipeError::ProcessSpawn {
                program: command.program().to_string(),
                source,
            })?;
        // Taken now: once the leader is reaped `id()` is gone, but background
        // children can still hold the group and the output pipes.
        let group = child.id();

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let outcome = tokio::time::timeout(timeout, async {
            let (status, stdout, stderr) =
                tokio::join!(child.wait(), read_all(stdout), read_all(stderr));
            Ok::<_, std::io::Error>((status?, stdout?, stderr?))
        })
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok((status, stdout, stderr))) => {
                let exit_code = match status.code() {
                    Some(code) => code,
                    None => {
                        warn!(%command, ?status, "process ended without an exit code");
                        0
                    }
                };
                debug!(%command, exit_code, duration_ms, "process finished");
                Ok(ExecutionResult {
                    stdout: String::from_utf8_lossy(&stdout).trim().to_string(),
                    stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
                    exit_code,
                    duration_ms,
                })
            }
            Ok(Err(e)) => {
                terminate(&mut child, group).await;
                Err(RecipeError::Io(e))
            }
            Err(_) => {
                warn!(%command, timeout_ms = timeout.as_millis() as u64, "process timed out, killing");
                terminate(&mut child, group).await;
                Err(RecipeError::Timeout(timeout))
            }
        }
    }
}

async fn read_all<R>(stream: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Kill the process group on unix, then the child itself, and reap it.
async fn terminate(child: &mut Child, group: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pgid) = group.and_then(|pid| libc::pid_t::try_from(pid).ok()) {
            // SAFETY: killpg only sends a signal; the group was created by `build`.
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
    #[cfg(not(unix))]
    let _ = group;

    if let Err(e) = child.kill().await {
        warn!("failed to reap killed process: {e}");
    }
}
