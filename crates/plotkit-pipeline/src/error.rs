//! Error types for the pipeline crate.

use thiserror::Error;

/// Errors that can occur while configuring or running the pipeline.
///
/// Degenerate geometry (empty rasters, tiny contours) is never an error;
/// these variants cover caller mistakes only.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid parameters were supplied to a pipeline stage.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A core operation failed.
    #[error(transparent)]
    Core(#[from] plotkit_core::Error),
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
