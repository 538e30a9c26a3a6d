//! Placeholder tokens and template substitution.

use std::collections::HashMap;
use std::fmt;

/// Prefix shared by every placeholder token.
const TOKEN_PREFIX: char = '$';

/// The fixed placeholder vocabulary understood inside command templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    ChangeId,
    CommitId,
    File,
    OperationId,
}

impl Placeholder {
    pub const ALL: [Self; 4] = [Self::ChangeId, Self::CommitId, Self::File, Self::OperationId];

    /// Literal token as written in a template.
    pub const fn token(self) -> &'static str {
        match self {
            Self::ChangeId => "$change_id",
            Self::CommitId => "$commit_id",
            Self::File => "$file",
            Self::OperationId => "$operation_id",
        }
    }

    /// Environment variable name exported to interactive children.
    pub fn env_name(self) -> &'static str {
        self.token().trim_start_matches(TOKEN_PREFIX)
    }

    /// Whether the token appears anywhere in the given templates.
    pub fn appears_in<S: AsRef<str>>(self, templates: &[S]) -> bool {
        templates
            .iter()
            .any(|template| template.as_ref().contains(self.token()))
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Placeholder values for a single invocation.
///
/// Built fresh from the current selection every time a command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    values: HashMap<Placeholder, String>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.insert(placeholder, value);
        self
    }

    pub fn insert(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.values.insert(placeholder, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    /// Substitute every mapped token in a single template string.
    ///
    /// Tokens without a value are left as written.
    pub fn apply(&self, template: &str) -> String {
        Placeholder::ALL
            .into_iter()
            .fold(template.to_string(), |acc, placeholder| match self.get(placeholder) {
                Some(value) => acc.replace(placeholder.token(), value),
                None => acc,
            })
    }

    /// The values as `NAME=value` pairs with the token prefix stripped.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        let mut vars: Vec<_> = self
            .values
            .iter()
            .map(|(placeholder, value)| (placeholder.env_name().to_string(), value.clone()))
            .collect();
        vars.sort();
        vars
    }
}

/// Substitute placeholders in each argument independently.
///
/// The result has the same number of arguments in the same order; nothing is
/// re-split after substitution.
pub fn templated_args(args: &[String], replacements: &Replacements) -> Vec<String> {
    args.iter().map(|arg| replacements.apply(arg)).collect()
}

/// Substitute placeholders in a shell snippet.
pub fn templated_shell(shell: &str, replacements: &Replacements) -> String {
    replacements.apply(shell)
}
