//! Turning a finished process into a single completion event.

use crate::error::CommandError;
use crate::message::CompletionEvent;

/// Combine trimmed stdout and stderr into one display string.
///
/// Stdout comes first; stderr is appended on its own line when both have
/// content.
pub fn combine_output(stdout: &str, stderr: &str) -> String {
    let stdout = stdout.trim();
    let stderr = stderr.trim();
    match (stdout.is_empty(), stderr.is_empty()) {
        (true, _) => stderr.to_string(),
        (false, true) => stdout.to_string(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}

/// Message shown when a successful command printed nothing.
pub fn completed_message(display: &str) -> String {
    format!("'{display}' completed")
}

impl CompletionEvent {
    /// Build the event for a finished invocation announced as `display`.
    ///
    /// `display` also names the command in the canned message used when the
    /// command succeeded silently.
    pub fn from_output(
        display: &str,
        stdout: &str,
        stderr: &str,
        error: Option<CommandError>,
    ) -> Self {
        let mut output = combine_output(stdout, stderr);
        if output.is_empty() && error.is_none() {
            output = completed_message(display);
        }
        Self {
            command: Some(display.to_string()),
            output,
            error,
        }
    }

    /// Event for a failure that was never announced as running.
    pub fn failed(error: CommandError) -> Self {
        Self {
            command: None,
            output: String::new(),
            error: Some(error),
        }
    }

    /// Event for an outcome that was never announced as running.
    pub fn notice(output: impl Into<String>) -> Self {
        Self {
            command: None,
            output: output.into(),
            error: None,
        }
    }

    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_output() {
        assert_eq!(combine_output("A", ""), "A");
        assert_eq!(combine_output("", "B"), "B");
        assert_eq!(combine_output("A", "B"), "A\nB");
        assert_eq!(combine_output("", ""), "");
    }

    #[test]
    fn test_combine_output_trims_each_stream() {
        assert_eq!(combine_output("  A\n\n", "\tB \n"), "A\nB");
        assert_eq!(combine_output("\n", " B "), "B");
    }

    #[test]
    fn test_canned_message_when_silent() {
        let event = CompletionEvent::from_output("jj new", "", "", None);
        assert_eq!(event.output, "'jj new' completed");
        assert_eq!(event.command.as_deref(), Some("jj new"));
        assert!(event.is_success());
    }

    #[test]
    fn test_error_keeps_empty_output() {
        let error = CommandError::exit("jj new", Some(1));
        let event = CompletionEvent::from_output("jj new", "", "", Some(error.clone()));

        assert_eq!(event.output, "");
        assert_eq!(event.error, Some(error));
    }

    #[test]
    fn test_unannounced_events_name_no_command() {
        assert_eq!(CompletionEvent::failed(CommandError::collaborator("x")).command, None);
        assert_eq!(CompletionEvent::notice("Copied").command, None);
    }

    #[test]
    fn test_error_keeps_captured_output() {
        let error = CommandError::exit("jj squash", Some(1));
        let event = CompletionEvent::from_output("jj squash", "", "Error: nothing to squash\n", Some(error));

        assert_eq!(event.output, "Error: nothing to squash");
        assert!(!event.is_success());
    }
}
