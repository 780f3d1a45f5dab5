use crate::error::{Result, SvnError};
use crate::svn::command::Invocation;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Result of executing an svn command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured stdout, split into lines
    pub lines: Vec<String>,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

/// Runs an assembled invocation and captures its output
pub trait Invoker: Send + Sync {
    fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Executes svn as a child process, never through a shell
#[derive(Debug, Clone)]
pub struct SvnExecutor {
    timeout: Duration,
}

impl SvnExecutor {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn wait(&self, mut child: Child, command: &str) -> Result<CommandOutput> {
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                warn!(command, timeout = ?self.timeout, "svn timed out, killing");
                let _ = child.kill();
                let _ = child.wait();
                return Err(SvnError::Timeout(timeout_millis(self.timeout)));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = join_reader(stdout)?;
        let stderr = join_reader(stderr)?;
        let exit_code = status.code().unwrap_or(-1);

        if !status.success() {
            return Err(SvnError::CommandFailed(format!(
                "Command '{}' failed with exit code {}: {}",
                command,
                exit_code,
                stderr.trim()
            )));
        }

        Ok(CommandOutput {
            lines: stdout.lines().map(String::from).collect(),
            stderr,
            exit_code,
            success: true,
        })
    }
}

impl Default for SvnExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Invoker for SvnExecutor {
    fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let command = invocation.redacted_command_line();
        debug!(%command, "executing svn");

        let child = Command::new(invocation.program())
            .args(invocation.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SvnError::CommandFailed(format!("Failed to execute svn: {}", e)))?;

        self.wait(child, &command)
    }
}

fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

type Reader = thread::JoinHandle<std::io::Result<String>>;

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Reader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

fn join_reader(reader: Option<Reader>) -> Result<String> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| SvnError::CommandFailed("output reader panicked".to_string()))?
            .map_err(SvnError::from),
        None => Ok(String::new()),
    }
}
