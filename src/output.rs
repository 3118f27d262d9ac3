//! Output channels shared by both engines
//!
//! The host hands each engine an [`OutputSink`] at construction time. Engines
//! never print directly: everything user-visible goes through
//! [`OutputSink::log_output`], internal diagnostics through
//! [`OutputSink::debug_output`].
//!
//! - [`BufferedSink`]: records every line in order, tagged with its [`Channel`]
//! - [`TracingSink`]: forwards both channels to `tracing` events

/// Capability handed to an engine by its host
pub trait OutputSink {
    /// Normal, user-visible output (one line per call)
    fn log_output(&mut self, text: &str);

    /// Internal diagnostics not meant for end users
    fn debug_output(&mut self, text: &str);
}

/// Which channel a line was written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Log,
    Debug,
}

/// A single recorded line of output
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLine {
    pub channel: Channel,
    pub text: String,
}

/// In-memory sink recording output lines for the host to display
#[derive(Debug, Clone, Default)]
pub struct BufferedSink {
    lines: Vec<OutputLine>,
}

impl BufferedSink {
    pub fn new() -> Self {
        BufferedSink { lines: Vec::new() }
    }

    /// All recorded lines, both channels, in emission order
    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    /// Text of the user-visible lines only
    pub fn log_lines(&self) -> Vec<String> {
        self.channel_lines(Channel::Log)
    }

    /// Text of the diagnostic lines only
    pub fn debug_lines(&self) -> Vec<String> {
        self.channel_lines(Channel::Debug)
    }

    /// Drain everything recorded so far
    pub fn take(&mut self) -> Vec<OutputLine> {
        std::mem::take(&mut self.lines)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn channel_lines(&self, channel: Channel) -> Vec<String> {
        self.lines
            .iter()
            .filter(|line| line.channel == channel)
            .map(|line| line.text.clone())
            .collect()
    }
}

impl OutputSink for BufferedSink {
    fn log_output(&mut self, text: &str) {
        self.lines.push(OutputLine {
            channel: Channel::Log,
            text: text.to_string(),
        });
    }

    fn debug_output(&mut self, text: &str) {
        self.lines.push(OutputLine {
            channel: Channel::Debug,
            text: text.to_string(),
        });
    }
}

/// Sink that turns output into `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn log_output(&mut self, text: &str) {
        tracing::info!(target: "interp_farm::output", "{}", text);
    }

    fn debug_output(&mut self, text: &str) {
        tracing::debug!(target: "interp_farm::output", "{}", text);
    }
}
