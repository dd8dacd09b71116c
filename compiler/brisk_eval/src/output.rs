//! Output sinks for `print` statements and recoverable warnings.
//!
//! Enum dispatch over the three destinations a host needs: the real
//! stdout, an in-memory buffer (tests, UI consoles), or nowhere. Warnings
//! always go to `tracing` as well, whatever the sink.

use std::sync::Arc;

use parking_lot::Mutex;

/// Shared handle to an [`OutputSink`].
pub type SharedOutput = Arc<OutputSink>;

/// Captured print lines and warnings.
#[derive(Debug, Default)]
pub struct BufferOutput {
    lines: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl BufferOutput {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    /// All printed text joined with newlines.
    pub fn text(&self) -> String {
        self.lines.lock().join("\n")
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
        self.warnings.lock().clear();
    }
}

/// Where printed text and warnings end up.
#[derive(Debug)]
pub enum OutputSink {
    Stdout,
    Buffer(BufferOutput),
    Silent,
}

impl OutputSink {
    pub fn print(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Buffer(buf) => buf.lines.lock().push(line.to_string()),
            Self::Silent => {}
        }
    }

    /// Report a recoverable problem. Execution continues.
    pub fn warn(&self, message: &str) {
        tracing::warn!("{message}");
        if let Self::Buffer(buf) = self {
            buf.warnings.lock().push(message.to_string());
        }
    }

    /// The buffer, when this sink captures output.
    pub fn as_buffer(&self) -> Option<&BufferOutput> {
        match self {
            Self::Buffer(buf) => Some(buf),
            Self::Stdout | Self::Silent => None,
        }
    }
}

pub fn stdout_output() -> SharedOutput {
    Arc::new(OutputSink::Stdout)
}

pub fn buffer_output() -> SharedOutput {
    Arc::new(OutputSink::Buffer(BufferOutput::default()))
}

pub fn silent_output() -> SharedOutput {
    Arc::new(OutputSink::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_prints_and_warnings() {
        let out = buffer_output();
        out.print("hello");
        out.print("world");
        out.warn("careful");
        let buf = out.as_buffer();
        assert_eq!(buf.map(BufferOutput::text), Some("hello\nworld".to_string()));
        assert_eq!(
            buf.map(BufferOutput::warnings),
            Some(vec!["careful".to_string()])
        );
    }

    #[test]
    fn silent_sink_has_no_buffer() {
        let out = silent_output();
        out.print("dropped");
        assert!(out.as_buffer().is_none());
    }
}
