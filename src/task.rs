//! Scheduled units of work returned by dispatch.
//!
//! A [`Task`] describes *what* should happen; the App decides *when*. Plain
//! messages are posted right away, commands are spawned onto the runtime and
//! terminal hand-offs are queued as [`AppMessage::Exec`] so they run in order
//! on the UI loop.

use std::fmt;

use crate::commands::Command;
use crate::error::CommandError;
use crate::message::AppMessage;
use crate::process::ExecProcess;

pub enum Task {
    /// Post a message to the loop.
    Message(AppMessage),
    /// Run a one-shot command off the loop.
    Spawn(Box<dyn Command>),
    /// Hand the terminal to a child process.
    Exec(ExecRequest),
    /// Schedule several tasks, in order.
    Batch(Vec<Task>),
}

impl Task {
    pub fn spawn(command: impl Command) -> Self {
        Self::Spawn(Box::new(command))
    }

    pub fn batch(tasks: impl IntoIterator<Item = Self>) -> Self {
        Self::Batch(tasks.into_iter().collect())
    }
}

impl From<AppMessage> for Task {
    fn from(message: AppMessage) -> Self {
        Self::Message(message)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Self::Spawn(command) => f.debug_tuple("Spawn").field(&command.name()).finish(),
            Self::Exec(request) => f.debug_tuple("Exec").field(request).finish(),
            Self::Batch(tasks) => f.debug_tuple("Batch").field(tasks).finish(),
        }
    }
}

type ExitHandler = Box<dyn FnOnce(Result<(), CommandError>) -> Vec<AppMessage> + Send>;

/// A process that needs the real terminal, plus what to post once it exits.
pub struct ExecRequest {
    process: Box<dyn ExecProcess>,
    on_exit: ExitHandler,
}

impl ExecRequest {
    pub fn new<P, F>(process: P, on_exit: F) -> Self
    where
        P: ExecProcess + 'static,
        F: FnOnce(Result<(), CommandError>) -> Vec<AppMessage> + Send + 'static,
    {
        Self {
            process: Box::new(process),
            on_exit: Box::new(on_exit),
        }
    }

    pub fn describe(&self) -> String {
        self.process.describe()
    }

    /// Access the process to redirect its stdio before it runs.
    pub fn process_mut(&mut self) -> &mut dyn ExecProcess {
        self.process.as_mut()
    }

    /// Run the process to completion and produce the follow-up messages.
    ///
    /// Blocks the calling thread; the caller must have released the terminal.
    pub fn run(self) -> Vec<AppMessage> {
        let Self {
            mut process,
            on_exit,
        } = self;
        let result = process.run();
        on_exit(result)
    }
}

impl fmt::Debug for ExecRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecRequest")
            .field("process", &self.describe())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl Task {
    /// Run the task and everything it schedules, collecting the messages in
    /// the order the App would receive them.
    pub async fn collect(self) -> Vec<AppMessage> {
        use std::collections::VecDeque;

        let mut pending = VecDeque::from([self]);
        let mut messages = Vec::new();

        while let Some(task) = pending.pop_front() {
            match task {
                Self::Message(message) => messages.push(message),
                Self::Spawn(command) => {
                    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
                    command.execute(tx).await.expect("command failed");
                    while let Ok(message) = rx.try_recv() {
                        messages.push(message);
                    }
                }
                Self::Exec(request) => messages.extend(request.run()),
                Self::Batch(tasks) => {
                    for task in tasks.into_iter().rev() {
                        pending.push_front(task);
                    }
                }
            }
        }

        messages
    }
}
