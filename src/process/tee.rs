use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Writer that forwards every write to all of its targets.
///
/// Used to show a child's output live while keeping a copy of it.
pub struct TeeWriter {
    targets: Vec<Box<dyn Write + Send>>,
}

impl TeeWriter {
    pub fn new(targets: Vec<Box<dyn Write + Send>>) -> Self {
        Self { targets }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for target in &mut self.targets {
            target.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for target in &mut self.targets {
            target.flush()?;
        }
        Ok(())
    }
}

/// Shared, growable byte buffer that can be handed out as a writer.
///
/// Clones share the same storage, so one clone can be given to a child's
/// stdout pump while another is read after the child exits.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.bytes
            .lock()
            .map(|bytes| bytes.clone())
            .unwrap_or_default()
    }

    /// Contents as text, replacing invalid UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("capture buffer poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
