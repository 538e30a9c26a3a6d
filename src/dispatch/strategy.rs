//! Mapping a show mode onto a process lifecycle.
//!
//! | show               | lifecycle                                          |
//! |--------------------|----------------------------------------------------|
//! | silent             | background run, completion event, `Refresh`        |
//! | diff               | background capture into `ShowDiff`                 |
//! | interactive        | terminal hand-off, `Refresh` on exit               |
//! | interactive_notify | terminal hand-off with tee capture, one completion |
//! | notify             | background run, completion event                   |

use std::path::PathBuf;
use std::sync::Arc;

use crate::commands::DiffCmd;
use crate::dispatch::definition::{CommandForm, CustomCommand, ShowMode, display_args};
use crate::dispatch::placeholder::{templated_args, templated_shell};
use crate::dispatch::selection::SelectedItem;
use crate::dispatch::shell::{EnvLookup, ProcessEnv, interactive_shell, shell_args};
use crate::message::{AppMessage, CompletionEvent};
use crate::process::{CapturingProcess, ProcessSpec};
use crate::runner::{CommandRunner, ShellInvocation};
use crate::task::{ExecRequest, Task};

/// Everything dispatch needs besides the command and the selection.
#[derive(Clone)]
pub struct DispatchContext {
    pub runner: Arc<dyn CommandRunner>,
    /// Working directory for hand-off processes.
    pub location: PathBuf,
    pub env: Arc<dyn EnvLookup>,
}

impl DispatchContext {
    pub fn new(runner: Arc<dyn CommandRunner>, location: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            location: location.into(),
            env: Arc::new(ProcessEnv),
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: Arc<dyn EnvLookup>) -> Self {
        self.env = env;
        self
    }
}

/// The four ways a command can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Background { refresh: bool },
    Capture,
    HandOff,
    CapturingHandOff,
}

impl From<ShowMode> for Lifecycle {
    fn from(show: ShowMode) -> Self {
        match show {
            ShowMode::Silent => Self::Background { refresh: true },
            ShowMode::Notify => Self::Background { refresh: false },
            ShowMode::Diff => Self::Capture,
            ShowMode::Interactive => Self::HandOff,
            ShowMode::InteractiveNotify => Self::CapturingHandOff,
        }
    }
}

impl CustomCommand {
    /// Build the task that runs this command against `item`.
    ///
    /// Applicability is the caller's concern; unmapped placeholders are left
    /// in place.
    pub fn prepare(&self, ctx: &DispatchContext, item: &SelectedItem) -> Task {
        let replacements = item.replacements();
        let lifecycle = Lifecycle::from(self.show);
        tracing::debug!(
            "Dispatching {} as {lifecycle:?} for {item}",
            self.description(ctx.runner.program(), &replacements)
        );

        let target = Target {
            env: replacements.env_vars(),
            revision: item.revision_id().map(ToString::to_string),
        };
        match self.form() {
            CommandForm::Args(args) => {
                prepare_args(ctx, templated_args(args, &replacements), target, lifecycle)
            }
            CommandForm::Shell(shell) => {
                prepare_shell(ctx, templated_shell(shell, &replacements), target, lifecycle)
            }
        }
    }
}

/// What a lifecycle may need from the selection besides the templates.
struct Target {
    /// Replacements as `NAME=value`, exported to capturing and shell hand-offs.
    env: Vec<(String, String)>,
    /// Revision a diff capture was taken for.
    revision: Option<String>,
}

fn background_continuations(refresh: bool) -> Vec<AppMessage> {
    if refresh {
        vec![AppMessage::Refresh]
    } else {
        Vec::new()
    }
}

fn prepare_args(ctx: &DispatchContext, args: Vec<String>, target: Target, lifecycle: Lifecycle) -> Task {
    let runner = Arc::clone(&ctx.runner);
    match lifecycle {
        Lifecycle::Background { refresh } => runner.run(args, background_continuations(refresh)),
        Lifecycle::Capture => Task::spawn(DiffCmd::args(runner, args).for_revision(target.revision)),
        Lifecycle::HandOff => runner.run_interactive(args, AppMessage::Refresh),
        Lifecycle::CapturingHandOff => {
            let display = display_args(runner.program(), &args);
            let spec = ProcessSpec::new(runner.program(), args)
                .current_dir(&ctx.location)
                .envs(target.env);
            capturing_hand_off(spec, display)
        }
    }
}

fn prepare_shell(ctx: &DispatchContext, script: String, target: Target, lifecycle: Lifecycle) -> Task {
    let runner = Arc::clone(&ctx.runner);
    match lifecycle {
        Lifecycle::Background { refresh } => {
            runner.run_shell(script, background_continuations(refresh))
        }
        Lifecycle::Capture => {
            Task::spawn(DiffCmd::shell(runner, script).for_revision(target.revision))
        }
        Lifecycle::HandOff => {
            let shell = ShellInvocation {
                program: interactive_shell(ctx.env.as_ref()),
                script,
                env: target.env,
            };
            runner.run_shell_interactive(shell, AppMessage::Refresh)
        }
        Lifecycle::CapturingHandOff => {
            let spec = ProcessSpec::new(interactive_shell(ctx.env.as_ref()), shell_args(&script))
                .current_dir(&ctx.location)
                .envs(target.env);
            capturing_hand_off(spec, script)
        }
    }
}

/// Announce the command, hand it the terminal, then report what it printed.
fn capturing_hand_off(spec: ProcessSpec, display: String) -> Task {
    let process = CapturingProcess::new(spec);
    let (stdout, stderr) = process.buffers();
    let running = AppMessage::CommandRunning(display.clone());

    let exec = ExecRequest::new(process, move |result| {
        let event = CompletionEvent::from_output(
            &display,
            &stdout.contents(),
            &stderr.contents(),
            result.err(),
        );
        vec![AppMessage::CommandCompleted(event)]
    });

    Task::batch([running.into(), Task::Exec(exec)])
}
