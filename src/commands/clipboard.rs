use std::sync::Arc;

use arboard::Clipboard;
use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::commands::{Command, post};
use crate::error::CommandError;
use crate::message::{AppMessage, CompletionEvent};
use crate::runner::CommandRunner;

/// Copies a string to the system clipboard and reports the outcome as a
/// completion event.
pub struct CopyToClipboardCmd {
    text: String,
    what: String,
}

impl CopyToClipboardCmd {
    pub fn new(text: impl Into<String>, what: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            what: what.into(),
        }
    }
}

fn copy(text: String) -> Result<(), arboard::Error> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)
}

#[async_trait]
impl Command for CopyToClipboardCmd {
    fn name(&self) -> String {
        format!("Copying {}", self.what)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let event = match copy(self.text) {
            Ok(()) => CompletionEvent::notice(format!("Copied {} to clipboard", self.what)),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {e}");
                CompletionEvent::failed(CommandError::collaborator(format!("clipboard: {e}")))
            }
        };
        post(&action_tx, AppMessage::CommandCompleted(event))
    }
}

/// Copies what the diff view shows.
///
/// When the output was captured for a revision, the clipboard gets that
/// revision's git-format diff instead, falling back to the captured output if
/// the VCS program fails.
pub struct CopyDiffCmd {
    runner: Arc<dyn CommandRunner>,
    raw: String,
    revision: Option<String>,
}

impl CopyDiffCmd {
    pub fn new(runner: Arc<dyn CommandRunner>, raw: String, revision: Option<String>) -> Self {
        Self {
            runner,
            raw,
            revision,
        }
    }

    fn git_diff_args(revision: &str) -> Vec<String> {
        vec!["diff".into(), "--git".into(), "-r".into(), revision.into()]
    }

    /// The text to copy and how to name it in the report.
    async fn resolve(self) -> CopyToClipboardCmd {
        let Some(revision) = &self.revision else {
            return CopyToClipboardCmd::new(self.raw, "output");
        };

        match self.runner.run_immediate(&Self::git_diff_args(revision)).await {
            Ok(bytes) => CopyToClipboardCmd::new(
                String::from_utf8_lossy(&bytes),
                format!("'{} diff --git' output", self.runner.program()),
            ),
            Err(e) => {
                tracing::warn!("Git diff of {revision} failed, copying the output instead: {e}");
                CopyToClipboardCmd::new(self.raw, "output")
            }
        }
    }
}

#[async_trait]
impl Command for CopyDiffCmd {
    fn name(&self) -> String {
        match &self.revision {
            Some(revision) => format!("Copying diff of {revision}"),
            None => "Copying output".to_string(),
        }
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        Box::new(self.resolve().await).execute(action_tx).await
    }
}
