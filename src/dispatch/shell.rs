//! Resolution of the shell used for shell-form commands.

use std::collections::HashMap;

/// Environment variable naming the user's interactive shell.
pub const SHELL_VAR: &str = "SHELL";

/// Shell used when [`SHELL_VAR`] is unset or empty.
pub const DEFAULT_SHELL: &str = "sh";

/// Read access to environment variables.
///
/// Kept behind a trait so tests can supply values without touching the real
/// process environment.
pub trait EnvLookup: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// The shell program to hand the terminal to.
pub fn interactive_shell(env: &dyn EnvLookup) -> String {
    env.var(SHELL_VAR)
        .filter(|shell| !shell.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SHELL.to_string())
}

/// Arguments passing a script to a POSIX-style shell.
pub fn shell_args(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}
