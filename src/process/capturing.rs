use std::io::{self, Read, Write};

use super::stdio::{Input, Output, run_attached};
use super::{CaptureBuffer, ExecProcess, ProcessSpec, TeeWriter};
use crate::error::CommandError;

/// Hands the terminal to a child while keeping a copy of its output.
///
/// Stdout and stderr go to the terminal (or the assigned sinks) and into
/// internal buffers at the same time, so the user sees the output live and it
/// can still be reported once the child exits.
pub struct CapturingProcess {
    spec: ProcessSpec,
    stdin: Option<Box<dyn Read + Send>>,
    stdout: Option<Box<dyn Write + Send>>,
    stderr: Option<Box<dyn Write + Send>>,
    captured_stdout: CaptureBuffer,
    captured_stderr: CaptureBuffer,
}

impl CapturingProcess {
    pub fn new(spec: ProcessSpec) -> Self {
        Self {
            spec,
            stdin: None,
            stdout: None,
            stderr: None,
            captured_stdout: CaptureBuffer::new(),
            captured_stderr: CaptureBuffer::new(),
        }
    }

    /// Handles on the capture buffers, readable after the process exits.
    pub fn buffers(&self) -> (CaptureBuffer, CaptureBuffer) {
        (self.captured_stdout.clone(), self.captured_stderr.clone())
    }
}

fn tee(terminal: Box<dyn Write + Send>, buffer: &CaptureBuffer) -> Output {
    Output::Writer(Box::new(TeeWriter::new(vec![
        terminal,
        Box::new(buffer.clone()),
    ])))
}

impl ExecProcess for CapturingProcess {
    fn set_stdin(&mut self, stdin: Box<dyn Read + Send>) {
        self.stdin = Some(stdin);
    }

    fn set_stdout(&mut self, stdout: Box<dyn Write + Send>) {
        self.stdout = Some(stdout);
    }

    fn set_stderr(&mut self, stderr: Box<dyn Write + Send>) {
        self.stderr = Some(stderr);
    }

    fn run(&mut self) -> Result<(), CommandError> {
        let stdout = self
            .stdout
            .take()
            .unwrap_or_else(|| Box::new(io::stdout()));
        let stderr = self
            .stderr
            .take()
            .unwrap_or_else(|| Box::new(io::stderr()));

        run_attached(
            self.spec.command(),
            &self.spec.display(),
            self.stdin.take().map_or(Input::Inherit, Input::Reader),
            tee(stdout, &self.captured_stdout),
            tee(stderr, &self.captured_stderr),
        )
    }

    fn describe(&self) -> String {
        self.spec.display()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CapturingProcess {
        CapturingProcess::new(ProcessSpec::new("sh", vec!["-c".into(), script.into()]))
    }

    #[test]
    fn test_output_reaches_terminal_and_buffers() {
        let terminal_out = CaptureBuffer::new();
        let terminal_err = CaptureBuffer::new();
        let mut process = sh("echo live; echo oops 1>&2");
        process.set_stdout(Box::new(terminal_out.clone()));
        process.set_stderr(Box::new(terminal_err.clone()));
        let (stdout, stderr) = process.buffers();

        process.run().unwrap();

        assert_eq!(terminal_out.contents(), "live\n");
        assert_eq!(terminal_err.contents(), "oops\n");
        assert_eq!(stdout.contents(), "live\n");
        assert_eq!(stderr.contents(), "oops\n");
    }

    #[test]
    fn test_replacements_are_exported() {
        let spec = ProcessSpec::new("sh", vec!["-c".into(), "printf '%s %s' \"$change_id\" \"$file\"".into()])
            .envs(vec![
                ("change_id".into(), "abc123".into()),
                ("file".into(), "src/main.rs".into()),
            ]);
        let mut process = CapturingProcess::new(spec);
        process.set_stdout(Box::new(io::sink()));
        let (stdout, _) = process.buffers();

        process.run().unwrap();

        assert_eq!(stdout.contents(), "abc123 src/main.rs");
    }

    #[test]
    fn test_failure_keeps_captured_output() {
        let mut process = sh("echo partial; exit 1");
        process.set_stdout(Box::new(io::sink()));
        let (stdout, _) = process.buffers();

        let err = process.run().unwrap_err();

        assert!(matches!(err, CommandError::Exit { code: Some(1), .. }));
        assert_eq!(stdout.contents(), "partial\n");
    }
}
