//! Line-by-line script streaming

use crate::error::CommunicationError;
use crate::sender::CommandSender;

/// Summary of a streaming run
#[derive(Debug, Default)]
pub struct StreamReport {
    /// Number of lines accepted by the transport
    pub sent: usize,
    /// Number of comment and blank lines skipped
    pub skipped: usize,
    /// First rejected line, if any
    pub failure: Option<CommunicationError>,
}

impl StreamReport {
    /// Check if every command line was accepted
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

fn classify(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(';') {
        None
    } else {
        Some(trimmed)
    }
}

/// Send every command line of `script` in order
///
/// Comment lines are not sent. Streaming stops at the first rejected line
/// and nothing is retried.
pub fn stream_script(script: &str, sender: &mut dyn CommandSender) -> StreamReport {
    let mut report = StreamReport::default();

    for (index, line) in script.lines().enumerate() {
        let Some(command) = classify(line) else {
            report.skipped += 1;
            continue;
        };

        let response = sender.send_line(command);
        if response.success {
            report.sent += 1;
            continue;
        }

        let message = response
            .message
            .unwrap_or_else(|| "no response message".to_string());
        tracing::warn!("Streaming stopped at line {}: {}", index + 1, message);
        report.failure = Some(CommunicationError::Rejected {
            line_number: index + 1,
            message,
        });
        break;
    }

    tracing::debug!(
        "Streamed {} line(s), skipped {}",
        report.sent,
        report.skipped
    );
    report
}
