//! Spawning child runtimes.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use crate::errors::{GroveError, GroveResult};

/// Fluent builder for a child process.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandBuilder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// The command line, for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> GroveError {
        GroveError::Generic {
            message: format!("Failed to start {}: {e}", self.program.display()),
        }
    }

    /// Run with inherited standard I/O and wait for the child to exit.
    pub fn status(&self) -> GroveResult<ExitStatus> {
        tracing::debug!("spawning {}", self.command_line());
        self.command().status().map_err(|e| self.spawn_error(e))
    }
}
