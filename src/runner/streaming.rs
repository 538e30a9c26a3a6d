use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;

use crate::error::CommandError;

/// Stdout of a command that is still running.
///
/// Dropping it closes the stream; a real child is killed on drop.
pub struct StreamingCommand {
    display: String,
    reader: Box<dyn AsyncRead + Send + Unpin>,
    child: Option<Child>,
    /// Drains stderr while stdout is read, so a chatty child cannot block.
    stderr: Option<JoinHandle<Vec<u8>>>,
}

impl StreamingCommand {
    pub fn from_reader(display: impl Into<String>, reader: Box<dyn AsyncRead + Send + Unpin>) -> Self {
        Self {
            display: display.into(),
            reader,
            child: None,
            stderr: None,
        }
    }

    /// Wrap a spawned child whose stdout is piped.
    ///
    /// A piped stderr is read in the background and reported if the child
    /// fails.
    pub fn from_child(display: impl Into<String>, mut child: Child) -> Result<Self, CommandError> {
        let display = display.into();
        let stdout = child.stdout.take().ok_or_else(|| {
            CommandError::collaborator(format!("`{display}` was started without a stdout pipe"))
        })?;
        let stderr = child.stderr.take().map(|mut pipe| {
            tokio::spawn(async move {
                let mut buffer = Vec::new();
                if let Err(e) = pipe.read_to_end(&mut buffer).await {
                    tracing::warn!("Failed to read stderr: {e}");
                }
                buffer
            })
        });
        Ok(Self {
            display,
            reader: Box::new(stdout),
            child: Some(child),
            stderr,
        })
    }

    /// Read every line, then wait for the child and check its exit status.
    pub async fn lines(self) -> Result<Vec<String>, CommandError> {
        let Self {
            display,
            reader,
            child,
            stderr,
        } = self;

        let read_error = |e: std::io::Error| {
            CommandError::collaborator(format!("failed to read output of `{display}`: {e}"))
        };

        let mut lines = BufReader::new(reader).lines();
        let mut collected = Vec::new();
        while let Some(line) = lines.next_line().await.map_err(read_error)? {
            collected.push(line);
        }

        if let Some(mut child) = child {
            let status = child.wait().await.map_err(read_error)?;
            let stderr = match stderr {
                Some(drain) => drain.await.unwrap_or_default(),
                None => Vec::new(),
            };
            if !status.success() {
                return Err(CommandError::exit(&display, status.code())
                    .with_stderr(&String::from_utf8_lossy(&stderr)));
            }
        }

        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[tokio::test]
    async fn test_lines_from_reader() {
        let stream = StreamingCommand::from_reader("jj log", Box::new(Cursor::new(b"a b\nc d\n".to_vec())));

        assert_eq!(stream.lines().await.unwrap(), vec!["a b", "c d"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_failure_is_reported_after_output() {
        let child = tokio::process::Command::new("sh")
            .args(["-c", "echo partial; echo bad 1>&2; exit 4"])
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .unwrap();
        let stream = StreamingCommand::from_child("sh", child).unwrap();

        let err = stream.lines().await.unwrap_err();

        assert_eq!(
            err,
            CommandError::Exit {
                command: "sh".into(),
                code: Some(4),
                stderr: "bad".into(),
            }
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_large_stderr_does_not_block_stdout() {
        let child = tokio::process::Command::new("sh")
            .args(["-c", "head -c 200000 /dev/zero 1>&2; echo done"])
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .unwrap();
        let stream = StreamingCommand::from_child("sh", child).unwrap();

        let lines = tokio::time::timeout(std::time::Duration::from_secs(10), stream.lines())
            .await
            .expect("reading lines timed out")
            .unwrap();

        assert_eq!(lines, vec!["done"]);
    }
}
