//! Error handling for PlotKit
//!
//! The pipeline itself is pure and total over degenerate inputs (empty
//! rasters, zero contours). Errors here cover caller mistakes and the
//! I/O boundary only.

use thiserror::Error;

/// Workspace-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied an invalid argument (unknown axis name,
    /// empty or mismatched calibration samples, non-finite parameter).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Image decoding or processing failed.
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an [`Error::InvalidInput`] from any displayable value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("unknown axis 'W'");
        assert_eq!(err.to_string(), "Invalid input: unknown axis 'W'");

        let err = Error::Image("unsupported pixel layout".to_string());
        assert_eq!(err.to_string(), "Image error: unsupported pixel layout");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
