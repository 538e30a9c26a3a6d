//! Process lifecycles behind one narrow contract.
//!
//! Three lifecycles implement [`ExecProcess`]:
//! - [`ImmediateProcess`] - run to completion off the UI loop, capturing output
//! - [`InteractiveProcess`] - take over the terminal until the child exits
//! - [`CapturingProcess`] - take over the terminal while mirroring output into buffers
//!
//! The lifecycle is picked once when a command is dispatched; whoever runs the
//! process only sees the trait.

mod capturing;
mod immediate;
mod interactive;
mod stdio;
mod tee;

use std::ffi::OsStr;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub use capturing::CapturingProcess;
pub use immediate::ImmediateProcess;
pub use interactive::InteractiveProcess;
pub use tee::{CaptureBuffer, TeeWriter};

use crate::dispatch::display_args;
use crate::error::CommandError;

/// A child process that can be pointed at custom stdio and run to completion.
///
/// Sinks must be assigned before [`ExecProcess::run`]; unset streams fall back
/// to the lifecycle's default (the terminal for hand-offs, nothing for
/// immediate runs).
pub trait ExecProcess: Send {
    fn set_stdin(&mut self, stdin: Box<dyn Read + Send>);

    fn set_stdout(&mut self, stdout: Box<dyn Write + Send>);

    fn set_stderr(&mut self, stderr: Box<dyn Write + Send>);

    /// Spawn the child and wait for it.
    ///
    /// Fails with [`CommandError::Spawn`] if the child could not start and
    /// [`CommandError::Exit`] if it exited unsuccessfully.
    fn run(&mut self) -> Result<(), CommandError>;

    /// Display form of the command line.
    fn describe(&self) -> String;
}

/// Program, arguments, working directory and extra environment of a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    program: String,
    args: Vec<String>,
    location: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            location: None,
            env: Vec::new(),
        }
    }

    #[must_use]
    pub fn current_dir(mut self, location: impl AsRef<Path>) -> Self {
        self.location = Some(location.as_ref().to_path_buf());
        self
    }

    /// Extra variables on top of the inherited environment.
    #[must_use]
    pub fn envs(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn display(&self) -> String {
        display_args(&self.program, &self.args)
    }

    fn command(&self) -> std::process::Command {
        let mut command = std::process::Command::new(&self.program);
        command.args(&self.args);
        if let Some(location) = &self.location {
            command.current_dir(location);
        }
        command.envs(
            self.env
                .iter()
                .map(|(name, value)| (OsStr::new(name), OsStr::new(value))),
        );
        command
    }
}
