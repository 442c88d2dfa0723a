//! Subprocess execution utilities.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output, Stdio};

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    env_remove: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            env_remove: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Remove an environment variable.
    pub fn env_remove(mut self, key: impl AsRef<str>) -> Self {
        self.env_remove.push(key.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        for key in &self.env_remove {
            cmd.env_remove(key);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.kill_on_drop(true);
        cmd
    }

    /// Execute the command with captured output and wait for completion.
    pub async fn exec(&self) -> Result<Output> {
        let token = CancellationToken::new();
        match self.exec_cancellable(&token).await? {
            Some(output) => Ok(output),
            None => bail!("`{}` was cancelled", self.display_command()),
        }
    }

    /// Execute with captured output; returns `None` if `token` fires first.
    ///
    /// On cancellation the child is killed instead of awaited. stdout and
    /// stderr are each drained by their own task so a child blocked on one
    /// full pipe cannot stall the other.
    pub async fn exec_cancellable(&self, token: &CancellationToken) -> Result<Option<Output>> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = tokio::select! {
            status = child.wait() => status
                .with_context(|| format!("failed to wait for `{}`", self.program.display()))?,
            _ = token.cancelled() => {
                tracing::debug!("killing `{}`", self.display_command());
                if let Err(e) = child.kill().await {
                    tracing::debug!("failed to kill `{}`: {}", self.program.display(), e);
                }
                stdout.abort();
                stderr.abort();
                return Ok(None);
            }
        };

        let stdout = stdout
            .await
            .context("stdout reader panicked")?
            .with_context(|| format!("failed to read stdout of `{}`", self.program.display()))?;
        let stderr = stderr
            .await
            .context("stderr reader panicked")?
            .with_context(|| format!("failed to read stderr of `{}`", self.program.display()))?;

        Ok(Some(Output {
            status,
            stdout,
            stderr,
        }))
    }

    /// Execute with inherited stdio and return status only.
    pub async fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .await
            .with_context(|| format!("failed to execute `{}`", self.program.display()))?;
        Ok(status)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Read a child pipe to the end on its own task.
fn drain<R>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    })
}

/// Exit code of a finished process; signal termination maps to 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
