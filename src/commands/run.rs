use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::commands::{Command, post};
use crate::error::CommandError;
use crate::message::{AppMessage, CompletionEvent};
use crate::process::{ExecProcess, ImmediateProcess, ProcessSpec};

/// Runs a process in the background and reports it.
///
/// Posts `CommandRunning`, one `CommandCompleted`, then the continuations.
pub struct RunCmd {
    spec: ProcessSpec,
    display: String,
    continuations: Vec<AppMessage>,
}

impl RunCmd {
    pub fn new(spec: ProcessSpec, display: impl Into<String>, continuations: Vec<AppMessage>) -> Self {
        Self {
            spec,
            display: display.into(),
            continuations,
        }
    }
}

struct Finished {
    stdout: Vec<u8>,
    stderr: String,
    error: Option<CommandError>,
}

fn run_blocking(spec: ProcessSpec) -> Finished {
    let mut process = ImmediateProcess::new(spec);
    let result = process.run();
    Finished {
        stdout: process.stdout(),
        stderr: process.stderr(),
        error: result.err(),
    }
}

#[async_trait]
impl Command for RunCmd {
    fn name(&self) -> String {
        format!("Running {}", self.display)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let Self {
            spec,
            display,
            continuations,
        } = *self;

        post(&action_tx, AppMessage::CommandRunning(display.clone()))?;

        let finished = tokio::task::spawn_blocking(move || run_blocking(spec))
            .await
            .unwrap_or_else(|e| Finished {
                stdout: Vec::new(),
                stderr: String::new(),
                error: Some(CommandError::collaborator(format!("`{display}` did not finish: {e}"))),
            });

        if let Some(error) = &finished.error {
            let command = display.as_str();
            tracing::debug!("{command} failed: {error}");
        }

        let event = CompletionEvent::from_output(
            &display,
            &String::from_utf8_lossy(&finished.stdout),
            &finished.stderr,
            finished.error,
        );
        post(&action_tx, AppMessage::CommandCompleted(event))?;

        for message in continuations {
            post(&action_tx, message)?;
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::task::Task;

    #[tokio::test]
    async fn test_reports_running_then_completed_then_continuations() {
        let spec = ProcessSpec::new("sh", vec!["-c".into(), "echo done".into()]);
        let task = Task::spawn(RunCmd::new(spec, "echo done", vec![AppMessage::Refresh]));

        let messages = task.collect().await;

        assert!(matches!(&messages[0], AppMessage::CommandRunning(d) if d == "echo done"));
        assert!(matches!(
            &messages[1],
            AppMessage::CommandCompleted(CompletionEvent { output, error: None, .. }) if output == "done"
        ));
        assert!(matches!(messages[2], AppMessage::Refresh));
        assert_eq!(messages.len(), 3);
    }

    #[tokio::test]
    async fn test_failure_still_runs_continuations() {
        let spec = ProcessSpec::new("sh", vec!["-c".into(), "echo nope 1>&2; exit 1".into()]);
        let task = Task::spawn(RunCmd::new(spec, "false", vec![AppMessage::Refresh]));

        let messages = task.collect().await;

        let AppMessage::CommandCompleted(event) = &messages[1] else {
            panic!("expected completion, got {:?}", messages[1]);
        };
        assert_eq!(event.output, "nope");
        assert!(matches!(event.error, Some(CommandError::Exit { code: Some(1), .. })));
        assert!(matches!(messages[2], AppMessage::Refresh));
    }
}
