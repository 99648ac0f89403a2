//! Line-by-line program streaming.
//!
//! The controller buffers exactly one command at a time: each line is
//! written, then its single-line acknowledgment is read before the next
//! line goes out. Comment and blank lines never leave the host.

use std::io;
use std::thread;
use std::time::Duration;

use crate::CommResult;

/// A line-oriented request/acknowledge channel.
///
/// Implemented by the real serial port and by in-memory mocks in tests.
pub trait LineTransport {
    /// Write one command line (terminator handled by the transport).
    fn send_line(&mut self, line: &str) -> io::Result<()>;

    /// Block until one acknowledgment line arrives.
    fn read_line(&mut self) -> io::Result<String>;
}

/// Summary of a completed streaming run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// Commands actually written to the transport.
    pub sent: usize,
    /// Lines skipped as comments or blanks.
    pub skipped: usize,
}

/// Streams a command sequence over a [`LineTransport`].
#[derive(Debug, Clone)]
pub struct StreamSender {
    /// Pause between acknowledged commands; some controllers drop
    /// characters when lines arrive back to back.
    inter_line_delay: Duration,
}

impl Default for StreamSender {
    fn default() -> Self {
        Self {
            inter_line_delay: Duration::from_millis(100),
        }
    }
}

impl StreamSender {
    pub fn new(inter_line_delay: Duration) -> Self {
        Self { inter_line_delay }
    }

    /// Send every command in order, waiting for one acknowledgment each.
    ///
    /// `progress` is called after each acknowledged command with
    /// (commands sent so far, total to send, acknowledgment text).
    /// The first transport failure aborts the stream; nothing is retried.
    pub fn stream<T, F>(
        &self,
        transport: &mut T,
        lines: &[String],
        mut progress: F,
    ) -> CommResult<SendOutcome>
    where
        T: LineTransport + ?Sized,
        F: FnMut(usize, usize, &str),
    {
        let to_send: Vec<&String> = lines
            .iter()
            .filter(|l| {
                let t = l.trim();
                !t.is_empty() && !t.starts_with(';')
            })
            .collect();
        let total = to_send.len();
        let skipped = lines.len() - total;

        for (i, line) in to_send.iter().enumerate() {
            transport.send_line(line)?;
            let ack = transport.read_line()?;
            tracing::debug!(line = line.as_str(), ack = ack.as_str(), "acknowledged");
            progress(i + 1, total, &ack);

            if !self.inter_line_delay.is_zero() {
                thread::sleep(self.inter_line_delay);
            }
        }

        tracing::info!(sent = total, skipped, "program streamed");
        Ok(SendOutcome {
            sent: total,
            skipped,
        })
    }
}
