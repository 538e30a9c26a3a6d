//! Custom command definitions as read from configuration.

use serde::{Deserialize, Serialize};

use crate::config::key::KeyBinding;
use crate::dispatch::placeholder::{Placeholder, Replacements, templated_args, templated_shell};
use crate::dispatch::selection::SelectedItem;

/// How a custom command presents itself while and after it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowMode {
    /// Run in the background and refresh once done.
    #[default]
    Silent,
    /// Capture the output into the diff view.
    Diff,
    /// Hand the terminal over to the command.
    Interactive,
    /// Hand the terminal over and report the captured output afterwards.
    #[serde(alias = "interactive_notification")]
    InteractiveNotify,
    /// Run in the background and report the output.
    #[serde(alias = "notification")]
    Notify,
}

/// The runnable part of a definition: exactly one of the two forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandForm<'a> {
    Args(&'a [String]),
    Shell(&'a str),
}

/// A user-defined command bound to a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommand {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<KeyBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(default)]
    pub show: ShowMode,
}

#[cfg(test)]
impl CustomCommand {
    pub fn from_args(name: impl Into<String>, args: &[&str], show: ShowMode) -> Self {
        Self {
            name: name.into(),
            key: None,
            args: Some(args.iter().map(ToString::to_string).collect()),
            shell: None,
            show,
        }
    }

    pub fn from_shell(name: impl Into<String>, shell: impl Into<String>, show: ShowMode) -> Self {
        Self {
            name: name.into(),
            key: None,
            args: None,
            shell: Some(shell.into()),
            show,
        }
    }

}

impl CustomCommand {
    /// Check that exactly one form is populated.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.args, &self.shell) {
            (Some(_), Some(_)) => Err("`args` and `shell` are mutually exclusive".to_string()),
            (None, None) => Err("one of `args` or `shell` is required".to_string()),
            (Some(args), None) if args.is_empty() => Err("`args` must not be empty".to_string()),
            (None, Some(shell)) if shell.trim().is_empty() => {
                Err("`shell` must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }

    /// The populated form; a shell snippet wins over arguments.
    ///
    /// Definitions are validated when configuration loads, so the empty
    /// fallback only shows up for hand-built values.
    pub fn form(&self) -> CommandForm<'_> {
        match &self.shell {
            Some(shell) => CommandForm::Shell(shell),
            None => CommandForm::Args(self.args.as_deref().unwrap_or_default()),
        }
    }

    /// Whether the command may run against the selected item.
    pub fn is_applicable_to(&self, item: &SelectedItem) -> bool {
        let uses = |placeholder: Placeholder| match self.form() {
            CommandForm::Shell(shell) => placeholder.appears_in(&[shell]),
            CommandForm::Args(args) => placeholder.appears_in(args),
        };

        let change_id = uses(Placeholder::ChangeId);
        let commit_id = uses(Placeholder::CommitId);
        let file = uses(Placeholder::File);
        let operation_id = uses(Placeholder::OperationId);

        if !(change_id || commit_id || file || operation_id) {
            return true;
        }

        match item {
            SelectedItem::Revision { .. } => change_id || commit_id,
            SelectedItem::File { .. } => file,
            SelectedItem::Operation { .. } => operation_id,
            SelectedItem::None => false,
        }
    }

    /// Display form after substitution, e.g. `jj log -r abc123`.
    pub fn description(&self, program: &str, replacements: &Replacements) -> String {
        match self.form() {
            CommandForm::Shell(shell) => templated_shell(shell, replacements),
            CommandForm::Args(args) => {
                display_args(program, &templated_args(args, replacements))
            }
        }
    }

    /// Name shown in menus, falling back to the raw template.
    pub fn label(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        match self.form() {
            CommandForm::Shell(shell) => shell.to_string(),
            CommandForm::Args(args) => args.join(" "),
        }
    }
}

/// Join a program and its arguments the way they are shown to the user.
pub fn display_args(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}
