//! Error types for command execution.
//!
//! Every failure that happens while running a custom command ends up as the
//! optional error of a [`crate::message::CompletionEvent`]. The variants are
//! kept cheap to clone so the event can travel through the message channel.

use thiserror::Error;

/// Failure raised while running a command or one of its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The child process could not be started.
    #[error("failed to start `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    /// The child process ran and exited unsuccessfully.
    #[error("{}", exit_message(.command, .code, .stderr))]
    Exit {
        command: String,
        /// Exit code, `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Trimmed stderr, only filled for immediate runs.
        stderr: String,
    },

    /// A non-process collaborator failed (clipboard, etc.).
    #[error("{0}")]
    Collaborator(String),
}

impl CommandError {
    pub fn spawn(command: impl Into<String>, source: &std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            reason: source.to_string(),
        }
    }

    pub fn exit(command: impl Into<String>, code: Option<i32>) -> Self {
        Self::Exit {
            command: command.into(),
            code,
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn with_stderr(self, stderr: &str) -> Self {
        match self {
            Self::Exit { command, code, .. } => Self::Exit {
                command,
                code,
                stderr: stderr.trim().to_string(),
            },
            other => other,
        }
    }

    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator(message.into())
    }
}

#[allow(clippy::ref_option)]
fn exit_message(command: &str, code: &Option<i32>, stderr: &str) -> String {
    let status = code.map_or_else(
        || "was terminated by a signal".to_string(),
        |code| format!("exited with status {code}"),
    );
    if stderr.is_empty() {
        format!("`{command}` {status}")
    } else {
        format!("`{command}` {status}: {stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_display() {
        let err = CommandError::exit("jj new", Some(1));
        assert_eq!(err.to_string(), "`jj new` exited with status 1");

        let err = CommandError::exit("jj new", None).with_stderr("  boom\n");
        assert_eq!(err.to_string(), "`jj new` was terminated by a signal: boom");
    }

    #[test]
    fn test_spawn_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CommandError::spawn("nope", &io);
        assert_eq!(err.to_string(), "failed to start `nope`: no such file");
    }

    #[test]
    fn test_with_stderr_keeps_other_variants() {
        let err = CommandError::collaborator("clipboard unavailable").with_stderr("ignored");
        assert_eq!(err, CommandError::Collaborator("clipboard unavailable".into()));
    }
}
