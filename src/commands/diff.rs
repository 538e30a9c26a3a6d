use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::commands::{Command, post};
use crate::message::{AppMessage, CompletionEvent};
use crate::runner::CommandRunner;

enum DiffSource {
    Args(Vec<String>),
    Shell(String),
}

/// Captures a command's stdout and opens it in the diff view.
///
/// Failures never reach the diff view; they are reported as a completion
/// event instead.
pub struct DiffCmd {
    runner: Arc<dyn CommandRunner>,
    source: DiffSource,
    revision: Option<String>,
}

impl DiffCmd {
    pub fn args(runner: Arc<dyn CommandRunner>, args: Vec<String>) -> Self {
        Self {
            runner,
            source: DiffSource::Args(args),
            revision: None,
        }
    }

    pub fn shell(runner: Arc<dyn CommandRunner>, script: String) -> Self {
        Self {
            runner,
            source: DiffSource::Shell(script),
            revision: None,
        }
    }

    /// Remember the revision the output belongs to, for copying a git diff.
    #[must_use]
    pub fn for_revision(mut self, revision: Option<String>) -> Self {
        self.revision = revision;
        self
    }
}

#[async_trait]
impl Command for DiffCmd {
    fn name(&self) -> String {
        match &self.source {
            DiffSource::Args(args) => format!("Diff {} {}", self.runner.program(), args.join(" ")),
            DiffSource::Shell(script) => format!("Diff {script}"),
        }
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let result = match &self.source {
            DiffSource::Args(args) => self.runner.run_immediate(args).await,
            DiffSource::Shell(script) => self.runner.run_shell_immediate(script).await,
        };

        let message = match result {
            Ok(bytes) => AppMessage::ShowDiff {
                text: String::from_utf8_lossy(&bytes).into_owned(),
                revision: self.revision,
            },
            Err(e) => AppMessage::CommandCompleted(CompletionEvent::failed(e)),
        };
        post(&action_tx, message)
    }
}
