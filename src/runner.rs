//! The seam between dispatch and the driven CLI.
//!
//! Dispatch only talks to [`CommandRunner`]. The real implementation is
//! [`ProcessRunner`]; tests substitute the mock runner so no process is ever
//! spawned.

#[cfg(test)]
pub mod mock;
mod process_runner;
mod streaming;

use std::sync::Arc;

use async_trait::async_trait;
pub use process_runner::ProcessRunner;
pub use streaming::StreamingCommand;

use crate::error::CommandError;
use crate::message::AppMessage;
use crate::task::Task;

/// A shell script bound to the shell that should run it interactively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub program: String,
    pub script: String,
    /// Extra `NAME=value` pairs for the child.
    pub env: Vec<(String, String)>,
}

/// Runs the driven CLI, either directly (argument vectors) or through a shell.
///
/// The `run*` methods that return a [`Task`] do not execute anything: they
/// describe work for the App to schedule. Background tasks post a
/// `CommandRunning` message, then exactly one `CommandCompleted`, then the
/// continuations, in that order.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Program that receives argument vectors, e.g. `jj`.
    fn program(&self) -> &str;

    /// Run to completion and return stdout.
    async fn run_immediate(&self, args: &[String]) -> Result<Vec<u8>, CommandError>;

    /// Start the command and hand back its stdout as a stream.
    async fn run_streaming(&self, args: &[String]) -> Result<StreamingCommand, CommandError>;

    /// Background run reporting a completion event, followed by `continuations`.
    fn run(self: Arc<Self>, args: Vec<String>, continuations: Vec<AppMessage>) -> Task;

    /// Terminal hand-off, posting `continuation` once the child exits.
    fn run_interactive(self: Arc<Self>, args: Vec<String>, continuation: AppMessage) -> Task;

    async fn run_shell_immediate(&self, script: &str) -> Result<Vec<u8>, CommandError>;

    async fn run_shell_streaming(&self, script: &str) -> Result<StreamingCommand, CommandError>;

    fn run_shell(self: Arc<Self>, script: String, continuations: Vec<AppMessage>) -> Task;

    fn run_shell_interactive(self: Arc<Self>, shell: ShellInvocation, continuation: AppMessage) -> Task;
}
