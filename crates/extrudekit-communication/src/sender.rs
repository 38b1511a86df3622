//! Line transport abstraction
//!
//! A [`CommandSender`] delivers one G-code line at a time to whatever sits
//! on the other end (a printer host API, a serial link, a test double).

/// Outcome of sending a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    /// Whether the line was accepted
    pub success: bool,
    /// Optional message from the transport
    pub message: Option<String>,
}

impl SendResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Transport for G-code lines
pub trait CommandSender {
    /// Send one line and report whether it was accepted
    fn send_line(&mut self, line: &str) -> SendResponse;
}

/// Sender that accepts and discards every line
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSender;

impl CommandSender for NoOpSender {
    fn send_line(&mut self, line: &str) -> SendResponse {
        tracing::trace!("Discarding line: {}", line);
        SendResponse::ok()
    }
}

/// Sender that keeps every accepted line, optionally failing at one of them
#[derive(Debug, Default, Clone)]
pub struct RecordingSender {
    sent: Vec<String>,
    fail_at: Option<usize>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the line with this 0-based send index
    pub fn failing_at(index: usize) -> Self {
        Self {
            sent: Vec::new(),
            fail_at: Some(index),
        }
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl CommandSender for RecordingSender {
    fn send_line(&mut self, line: &str) -> SendResponse {
        if self.fail_at == Some(self.sent.len()) {
            return SendResponse::failed(format!("transport rejected '{}'", line));
        }
        self.sent.push(line.to_string());
        SendResponse::ok()
    }
}
