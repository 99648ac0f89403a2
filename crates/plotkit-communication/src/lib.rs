//! # PlotKit Communication
//!
//! Serial transport for streaming a finished G-code program to a plotter
//! controller. The protocol is deliberately simple: write one command line,
//! wait for exactly one acknowledgment line, repeat. No pipelining, no
//! retries — transport failures surface to the caller.

pub mod sender;
pub mod serial;

pub use sender::{LineTransport, SendOutcome, StreamSender};
pub use serial::{list_ports, open_port, SerialLineTransport, SerialPortInfo};

use thiserror::Error;

/// Errors from the transport layer.
#[derive(Error, Debug)]
pub enum CommError {
    /// The serial port could not be enumerated, opened, or configured.
    #[error("Serial port error: {0}")]
    Port(String),

    /// The device stopped responding or the line dropped mid-stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for transport operations.
pub type CommResult<T> = Result<T, CommError>;
