use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;

use super::{CommandRunner, ShellInvocation, StreamingCommand};
use crate::commands::RunCmd;
use crate::dispatch::shell_args;
use crate::error::CommandError;
use crate::message::{AppMessage, CompletionEvent};
use crate::process::{ExecProcess, ImmediateProcess, InteractiveProcess, ProcessSpec};
use crate::task::{ExecRequest, Task};

/// Spawns real processes in the repository directory.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    location: PathBuf,
    /// Shell for background shell-form runs.
    shell: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>, location: impl Into<PathBuf>, shell: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            location: location.into(),
            shell: shell.into(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    fn args_spec(&self, args: Vec<String>) -> ProcessSpec {
        ProcessSpec::new(&self.program, args).current_dir(&self.location)
    }

    fn shell_spec(&self, program: &str, script: &str) -> ProcessSpec {
        ProcessSpec::new(program, shell_args(script)).current_dir(&self.location)
    }

    async fn capture(spec: ProcessSpec) -> Result<Vec<u8>, CommandError> {
        let display = spec.display();
        tokio::task::spawn_blocking(move || {
            let mut process = ImmediateProcess::new(spec);
            process.run()?;
            Ok(process.stdout())
        })
        .await
        .map_err(|e| CommandError::collaborator(format!("`{display}` did not finish: {e}")))?
    }

    fn stream(&self, spec: &ProcessSpec) -> Result<StreamingCommand, CommandError> {
        let display = spec.display();
        let mut command = tokio::process::Command::new(spec.program());
        command
            .args(spec.args())
            .envs(spec.env().iter().map(|(k, v)| (k, v)))
            .current_dir(&self.location)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let child = command.spawn().map_err(|e| CommandError::spawn(&display, &e))?;
        StreamingCommand::from_child(display, child)
    }
}

/// Hand-off request that posts `continuation` after the child exits, preceded
/// by a completion event when it failed.
fn hand_off(process: InteractiveProcess, continuation: AppMessage) -> Task {
    Task::Exec(ExecRequest::new(process, move |result| {
        let mut messages = Vec::with_capacity(2);
        if let Err(e) = result {
            messages.push(AppMessage::CommandCompleted(CompletionEvent::failed(e)));
        }
        messages.push(continuation);
        messages
    }))
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    fn program(&self) -> &str {
        &self.program
    }

    async fn run_immediate(&self, args: &[String]) -> Result<Vec<u8>, CommandError> {
        Self::capture(self.args_spec(args.to_vec())).await
    }

    async fn run_streaming(&self, args: &[String]) -> Result<StreamingCommand, CommandError> {
        self.stream(&self.args_spec(args.to_vec()))
    }

    fn run(self: Arc<Self>, args: Vec<String>, continuations: Vec<AppMessage>) -> Task {
        let spec = self.args_spec(args);
        let display = spec.display();
        Task::spawn(RunCmd::new(spec, display, continuations))
    }

    fn run_interactive(self: Arc<Self>, args: Vec<String>, continuation: AppMessage) -> Task {
        hand_off(InteractiveProcess::new(self.args_spec(args)), continuation)
    }

    async fn run_shell_immediate(&self, script: &str) -> Result<Vec<u8>, CommandError> {
        Self::capture(self.shell_spec(&self.shell, script)).await
    }

    async fn run_shell_streaming(&self, script: &str) -> Result<StreamingCommand, CommandError> {
        self.stream(&self.shell_spec(&self.shell, script))
    }

    fn run_shell(self: Arc<Self>, script: String, continuations: Vec<AppMessage>) -> Task {
        let spec = self.shell_spec(&self.shell, &script);
        Task::spawn(RunCmd::new(spec, script, continuations))
    }

    fn run_shell_interactive(self: Arc<Self>, shell: ShellInvocation, continuation: AppMessage) -> Task {
        let spec = self.shell_spec(&shell.program, &shell.script).envs(shell.env);
        hand_off(InteractiveProcess::new(spec), continuation)
    }
}
