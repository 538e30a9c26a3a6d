//! Spawning a child with caller-provided stdio.

use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::error::CommandError;

pub enum Input {
    Inherit,
    Null,
    Reader(Box<dyn Read + Send>),
}

pub enum Output {
    Inherit,
    Writer(Box<dyn Write + Send>),
}

impl Output {
    fn stdio(&self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::Writer(_) => Stdio::piped(),
        }
    }

    fn into_writer(self) -> Option<Box<dyn Write + Send>> {
        match self {
            Self::Inherit => None,
            Self::Writer(writer) => Some(writer),
        }
    }
}

/// Spawn `command`, pump its piped streams into the given writers and wait.
///
/// The stdin pump runs detached: a reader attached to a terminal may never
/// reach end of file, and the child's exit must not wait on it.
pub fn run_attached(
    mut command: Command,
    command_line: &str,
    stdin: Input,
    stdout: Output,
    stderr: Output,
) -> Result<(), CommandError> {
    command
        .stdin(match &stdin {
            Input::Inherit => Stdio::inherit(),
            Input::Null => Stdio::null(),
            Input::Reader(_) => Stdio::piped(),
        })
        .stdout(stdout.stdio())
        .stderr(stderr.stdio());

    let mut child = command
        .spawn()
        .map_err(|e| CommandError::spawn(command_line, &e))?;

    if let (Input::Reader(mut reader), Some(mut pipe)) = (stdin, child.stdin.take()) {
        thread::spawn(move || {
            let _ = io::copy(&mut reader, &mut pipe);
        });
    }

    let stdout_pump = pump(child.stdout.take(), stdout.into_writer());
    let stderr_pump = pump(child.stderr.take(), stderr.into_writer());

    let status = child.wait().map_err(|e| CommandError::spawn(command_line, &e))?;

    for pump in [stdout_pump, stderr_pump].into_iter().flatten() {
        match pump.join() {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Failed to forward output of `{command_line}`: {e}"),
            Err(_) => warn!("Output pump of `{command_line}` panicked"),
        }
    }

    if status.success() {
        Ok(())
    } else {
        Err(CommandError::exit(command_line, status.code()))
    }
}

fn pump<R>(pipe: Option<R>, sink: Option<Box<dyn Write + Send>>) -> Option<JoinHandle<io::Result<u64>>>
where
    R: Read + Send + 'static,
{
    let (mut pipe, mut sink) = (pipe?, sink?);
    Some(thread::spawn(move || {
        let copied = io::copy(&mut pipe, &mut sink)?;
        sink.flush()?;
        Ok(copied)
    }))
}
