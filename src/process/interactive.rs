use std::io::{Read, Write};

use super::stdio::{Input, Output, run_attached};
use super::{ExecProcess, ProcessSpec};
use crate::error::CommandError;

/// Hands the terminal to a child for its whole lifetime.
///
/// Unassigned streams are inherited, so the child talks to the real terminal
/// directly. The UI must have released the terminal before [`ExecProcess::run`].
pub struct InteractiveProcess {
    spec: ProcessSpec,
    stdin: Option<Box<dyn Read + Send>>,
    stdout: Option<Box<dyn Write + Send>>,
    stderr: Option<Box<dyn Write + Send>>,
}

impl InteractiveProcess {
    pub const fn new(spec: ProcessSpec) -> Self {
        Self {
            spec,
            stdin: None,
            stdout: None,
            stderr: None,
        }
    }

    pub const fn spec(&self) -> &ProcessSpec {
        &self.spec
    }
}

impl ExecProcess for InteractiveProcess {
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
        run_attached(
            self.spec.command(),
            &self.spec.display(),
            self.stdin.take().map_or(Input::Inherit, Input::Reader),
            self.stdout.take().map_or(Output::Inherit, Output::Writer),
            self.stderr.take().map_or(Output::Inherit, Output::Writer),
        )
    }

    fn describe(&self) -> String {
        self.spec.display()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::process::CaptureBuffer;

    #[test]
    fn test_redirected_streams() {
        let out = CaptureBuffer::new();
        let spec = ProcessSpec::new("sh", vec!["-c".into(), "printf visible".into()]);
        let mut process = InteractiveProcess::new(spec);
        process.set_stdout(Box::new(out.clone()));

        process.run().unwrap();

        assert_eq!(out.contents(), "visible");
    }

    #[test]
    fn test_exit_status_is_reported() {
        let spec = ProcessSpec::new("sh", vec!["-c".into(), "exit 2".into()]);
        let mut process = InteractiveProcess::new(spec);
        process.set_stdout(Box::new(std::io::sink()));

        let err = process.run().unwrap_err();

        assert_eq!(err, CommandError::exit("sh -c exit 2", Some(2)));
    }
}
