use std::io::{Read, Write};

use super::stdio::{Input, Output, run_attached};
use super::{CaptureBuffer, ExecProcess, ProcessSpec, TeeWriter};
use crate::error::CommandError;

/// Runs a child to completion and keeps its output.
///
/// Nothing reaches the terminal; assigned sinks receive a live copy of the
/// captured streams. Blocking, so callers run it off the UI loop.
pub struct ImmediateProcess {
    spec: ProcessSpec,
    stdin: Option<Box<dyn Read + Send>>,
    stdout: Option<Box<dyn Write + Send>>,
    stderr: Option<Box<dyn Write + Send>>,
    captured_stdout: CaptureBuffer,
    captured_stderr: CaptureBuffer,
}

impl ImmediateProcess {
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

    pub fn stdout(&self) -> Vec<u8> {
        self.captured_stdout.bytes()
    }

    pub fn stderr(&self) -> String {
        self.captured_stderr.contents()
    }
}

fn capture(sink: Option<Box<dyn Write + Send>>, buffer: &CaptureBuffer) -> Output {
    let mut targets: Vec<Box<dyn Write + Send>> = vec![Box::new(buffer.clone())];
    targets.extend(sink);
    Output::Writer(Box::new(TeeWriter::new(targets)))
}

impl ExecProcess for ImmediateProcess {
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
        let display = self.spec.display();
        let stdin = self.stdin.take().map_or(Input::Null, Input::Reader);
        let stdout = capture(self.stdout.take(), &self.captured_stdout);
        let stderr = capture(self.stderr.take(), &self.captured_stderr);

        run_attached(self.spec.command(), &display, stdin, stdout, stderr)
            .map_err(|e| e.with_stderr(&self.captured_stderr.contents()))
    }

    fn describe(&self) -> String {
        self.spec.display()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn sh(script: &str) -> ImmediateProcess {
        ImmediateProcess::new(ProcessSpec::new("sh", vec!["-c".into(), script.into()]))
    }

    #[test]
    fn test_captures_both_streams() {
        let mut process = sh("echo out; echo err 1>&2");

        process.run().unwrap();

        assert_eq!(process.stdout(), b"out\n");
        assert_eq!(process.stderr(), "err\n");
    }

    #[test]
    fn test_feeds_assigned_stdin() {
        let mut process = sh("cat");
        process.set_stdin(Box::new(Cursor::new(b"piped input".to_vec())));

        process.run().unwrap();

        assert_eq!(process.stdout(), b"piped input");
    }

    #[test]
    fn test_mirrors_into_assigned_sink() {
        let mirror = CaptureBuffer::new();
        let mut process = sh("printf mirrored");
        process.set_stdout(Box::new(mirror.clone()));

        process.run().unwrap();

        assert_eq!(mirror.contents(), "mirrored");
        assert_eq!(process.stdout(), b"mirrored");
    }

    #[test]
    fn test_nonzero_exit_carries_stderr() {
        let mut process = sh("echo broken 1>&2; exit 3");

        let err = process.run().unwrap_err();

        assert_eq!(
            err,
            CommandError::Exit {
                command: "sh -c echo broken 1>&2; exit 3".into(),
                code: Some(3),
                stderr: "broken".into(),
            }
        );
    }

    #[test]
    fn test_spawn_failure() {
        let mut process = ImmediateProcess::new(ProcessSpec::new("lazyrev-does-not-exist", vec![]));

        let err = process.run().unwrap_err();

        assert!(matches!(err, CommandError::Spawn { .. }), "{err:?}");
    }

    #[test]
    fn test_runs_in_directory_with_env() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ProcessSpec::new("sh", vec!["-c".into(), "pwd; printf %s \"$change_id\"".into()])
            .current_dir(dir.path())
            .envs(vec![("change_id".into(), "abc123".into())]);
        let mut process = ImmediateProcess::new(spec);

        process.run().unwrap();

        let stdout = String::from_utf8(process.stdout()).unwrap();
        let expected_dir = dir.path().canonicalize().unwrap();
        let mut lines = stdout.lines();
        assert_eq!(
            std::path::Path::new(lines.next().unwrap()).canonicalize().unwrap(),
            expected_dir
        );
        assert_eq!(lines.next(), Some("abc123"));
    }
}
