//! Scripted [`CommandRunner`] for tests.
//!
//! Register the exact argument vectors (or shell scripts) a test expects,
//! together with canned output. Any other invocation panics immediately, and
//! [`MockCommandRunner::verify`] fails the test if an expectation was never
//! used. Nothing is ever spawned.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use super::{CommandRunner, ShellInvocation, StreamingCommand};
use crate::commands::{Command, post};
use crate::dispatch::display_args;
use crate::error::CommandError;
use crate::message::{AppMessage, CompletionEvent};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Invocation {
    Args(Vec<String>),
    Shell(String),
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Args(args) => write!(f, "{}", args.join(" ")),
            Self::Shell(script) => write!(f, "shell: {script}"),
        }
    }
}

#[derive(Debug)]
pub struct ExpectedCommand {
    invocation: Invocation,
    output: Vec<u8>,
    error: Option<CommandError>,
    called: AtomicBool,
}

impl ExpectedCommand {
    fn new(invocation: Invocation) -> Self {
        Self {
            invocation,
            output: Vec::new(),
            error: None,
            called: AtomicBool::new(false),
        }
    }

    pub fn set_output(&mut self, output: impl Into<Vec<u8>>) -> &mut Self {
        self.output = output.into();
        self
    }

    pub fn set_error(&mut self, error: CommandError) -> &mut Self {
        self.error = Some(error);
        self
    }
}

#[derive(Debug)]
pub struct MockCommandRunner {
    program: String,
    expectations: Vec<ExpectedCommand>,
}

impl Default for MockCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self {
            program: "jj".to_string(),
            expectations: Vec::new(),
        }
    }

    pub fn expect<S: AsRef<str>>(&mut self, args: &[S]) -> &mut ExpectedCommand {
        let args = args.iter().map(|a| a.as_ref().to_string()).collect();
        self.push(Invocation::Args(args))
    }

    pub fn expect_shell(&mut self, script: &str) -> &mut ExpectedCommand {
        self.push(Invocation::Shell(script.to_string()))
    }

    fn push(&mut self, invocation: Invocation) -> &mut ExpectedCommand {
        self.expectations.push(ExpectedCommand::new(invocation));
        let last = self.expectations.len() - 1;
        &mut self.expectations[last]
    }

    /// Consume the matching expectation, preferring ones not yet used.
    fn take(&self, invocation: &Invocation) -> Result<Vec<u8>, CommandError> {
        let Some(expected) = self
            .expectations
            .iter()
            .filter(|e| e.invocation == *invocation)
            .min_by_key(|e| e.called.load(Ordering::SeqCst))
        else {
            panic!("unexpected command: {invocation}");
        };

        expected.called.store(true, Ordering::SeqCst);
        match &expected.error {
            Some(error) => Err(error.clone()),
            None => Ok(expected.output.clone()),
        }
    }

    pub fn is_verified(&self) -> bool {
        self.expectations.iter().all(|e| e.called.load(Ordering::SeqCst))
    }

    /// Panic naming the first expectation that was never invoked.
    pub fn verify(&self) {
        if let Some(missing) = self
            .expectations
            .iter()
            .find(|e| !e.called.load(Ordering::SeqCst))
        {
            panic!("expected command not called: {}", missing.invocation);
        }
    }

    fn display(&self, invocation: &Invocation) -> String {
        match invocation {
            Invocation::Args(args) => display_args(&self.program, args),
            Invocation::Shell(script) => script.clone(),
        }
    }

    fn background(self: Arc<Self>, invocation: Invocation, continuations: Vec<AppMessage>) -> Task {
        Task::spawn(MockRunCmd {
            display: self.display(&invocation),
            runner: self,
            invocation,
            continuations,
        })
    }

    fn hand_off(self: Arc<Self>, invocation: Invocation, continuation: AppMessage) -> Task {
        Task::spawn(MockHandOffCmd {
            runner: self,
            invocation,
            continuation,
        })
    }
}

/// Same message protocol as the real background run, answered from the script.
struct MockRunCmd {
    runner: Arc<MockCommandRunner>,
    invocation: Invocation,
    display: String,
    continuations: Vec<AppMessage>,
}

#[async_trait]
impl Command for MockRunCmd {
    fn name(&self) -> String {
        format!("Mock {}", self.display)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        post(&action_tx, AppMessage::CommandRunning(self.display.clone()))?;

        let event = match self.runner.take(&self.invocation) {
            Ok(output) => CompletionEvent::from_output(&self.display, &String::from_utf8_lossy(&output), "", None),
            Err(e) => CompletionEvent::from_output(&self.display, "", "", Some(e)),
        };
        post(&action_tx, AppMessage::CommandCompleted(event))?;

        for message in self.continuations {
            post(&action_tx, message)?;
        }
        Ok(())
    }
}

/// Same messages as a real hand-off: nothing is announced, a failure is
/// reported, and the continuation always follows.
struct MockHandOffCmd {
    runner: Arc<MockCommandRunner>,
    invocation: Invocation,
    continuation: AppMessage,
}

#[async_trait]
impl Command for MockHandOffCmd {
    fn name(&self) -> String {
        format!("Mock hand-off {}", self.invocation)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        if let Err(e) = self.runner.take(&self.invocation) {
            post(&action_tx, AppMessage::CommandCompleted(CompletionEvent::failed(e)))?;
        }
        post(&action_tx, self.continuation)
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    fn program(&self) -> &str {
        &self.program
    }

    async fn run_immediate(&self, args: &[String]) -> Result<Vec<u8>, CommandError> {
        self.take(&Invocation::Args(args.to_vec()))
    }

    async fn run_streaming(&self, args: &[String]) -> Result<StreamingCommand, CommandError> {
        let invocation = Invocation::Args(args.to_vec());
        let output = self.take(&invocation)?;
        Ok(StreamingCommand::from_reader(self.display(&invocation), Box::new(Cursor::new(output))))
    }

    fn run(self: Arc<Self>, args: Vec<String>, continuations: Vec<AppMessage>) -> Task {
        self.background(Invocation::Args(args), continuations)
    }

    fn run_interactive(self: Arc<Self>, args: Vec<String>, continuation: AppMessage) -> Task {
        self.hand_off(Invocation::Args(args), continuation)
    }

    async fn run_shell_immediate(&self, script: &str) -> Result<Vec<u8>, CommandError> {
        self.take(&Invocation::Shell(script.to_string()))
    }

    async fn run_shell_streaming(&self, script: &str) -> Result<StreamingCommand, CommandError> {
        let output = self.take(&Invocation::Shell(script.to_string()))?;
        Ok(StreamingCommand::from_reader(script, Box::new(Cursor::new(output))))
    }

    fn run_shell(self: Arc<Self>, script: String, continuations: Vec<AppMessage>) -> Task {
        self.background(Invocation::Shell(script), continuations)
    }

    fn run_shell_interactive(self: Arc<Self>, shell: ShellInvocation, continuation: AppMessage) -> Task {
        self.hand_off(Invocation::Shell(shell.script), continuation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_repeated_expectations_are_consumed_in_order() {
        let mut runner = MockCommandRunner::new();
        runner.expect(&["status"]).set_output("first");
        runner.expect(&["status"]).set_output("second");

        let args = vec!["status".to_string()];
        assert_eq!(runner.run_immediate(&args).await.unwrap(), b"first");
        assert_eq!(runner.run_immediate(&args).await.unwrap(), b"second");
        runner.verify();
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_shell("make")
            .set_error(CommandError::exit("make", Some(2)));

        let err = runner.run_shell_immediate("make").await.unwrap_err();

        assert_eq!(err, CommandError::exit("make", Some(2)));
        assert!(runner.is_verified());
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected command: log")]
    async fn test_unexpected_command_panics() {
        let runner = MockCommandRunner::new();

        let _ = runner.run_immediate(&["log".to_string()]).await;
    }

    #[test]
    #[should_panic(expected = "expected command not called: shell: echo hi")]
    fn test_verify_names_unmet_expectation() {
        let mut runner = MockCommandRunner::new();
        runner.expect_shell("echo hi");

        assert!(!runner.is_verified());
        runner.verify();
    }

    #[tokio::test]
    async fn test_interactive_posts_only_the_continuation() {
        let mut mock = MockCommandRunner::new();
        mock.expect(&["describe"]);
        let mock = Arc::new(mock);

        let messages = Arc::clone(&mock)
            .run_interactive(vec!["describe".into()], AppMessage::Refresh)
            .collect()
            .await;

        assert!(matches!(messages.as_slice(), [AppMessage::Refresh]));
        mock.verify();
    }

    #[tokio::test]
    async fn test_interactive_failure_reports_before_continuation() {
        let mut mock = MockCommandRunner::new();
        mock.expect_shell("vim").set_error(CommandError::exit("sh -c vim", Some(1)));
        let mock = Arc::new(mock);
        let shell = ShellInvocation {
            program: "sh".into(),
            script: "vim".into(),
            env: vec![],
        };

        let messages = mock.run_shell_interactive(shell, AppMessage::Refresh).collect().await;

        let [AppMessage::CommandCompleted(event), AppMessage::Refresh] = messages.as_slice() else {
            panic!("unexpected messages: {messages:?}");
        };
        assert_eq!(event.error, Some(CommandError::exit("sh -c vim", Some(1))));
        assert_eq!(event.command, None);
    }

    #[tokio::test]
    async fn test_background_failure_is_announced() {
        let mut mock = MockCommandRunner::new();
        mock.expect(&["git", "push"]).set_error(CommandError::exit("jj git push", Some(1)));
        let mock = Arc::new(mock);

        let messages = mock.run(vec!["git".into(), "push".into()], vec![]).collect().await;

        let [AppMessage::CommandRunning(display), AppMessage::CommandCompleted(event)] = messages.as_slice() else {
            panic!("unexpected messages: {messages:?}");
        };
        assert_eq!(event.command.as_ref(), Some(display));
        assert!(event.error.is_some());
    }

    #[tokio::test]
    async fn test_streaming_yields_scripted_lines() {
        let mut runner = MockCommandRunner::new();
        runner.expect(&["op", "log"]).set_output("a one\nb two\n");

        let lines = runner
            .run_streaming(&["op".to_string(), "log".to_string()])
            .await
            .unwrap()
            .lines()
            .await
            .unwrap();

        assert_eq!(lines, vec!["a one", "b two"]);
    }
}
