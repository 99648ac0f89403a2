//! # PlotKit Pipeline
//!
//! Turns a stylized raster image into a validated pen-plotter G-code program:
//!
//! 1. **Extractor** — traces boundary curves in a binary/grayscale raster and
//!    simplifies them into polyline contours.
//! 2. **Sequencer** — reorders the contours for short travel moves (spatial
//!    bucketing) or shuffles them on request.
//! 3. **Emitter** — maps the ordered contours to motion commands with
//!    pen-lift semantics, feed-rate switching, and coordinate scaling.
//! 4. **Validator** — drops any line that is not a well-formed command,
//!    reporting the rejects rather than failing the run.
//!
//! The stylization registry ([`styles`]) sits in front of the pipeline and
//! produces the raster the extractor consumes.

pub mod emitter;
pub mod error;
pub mod extractor;
pub mod sequencer;
pub mod styles;
pub mod validator;

pub use emitter::{ToolpathEmitter, ToolpathParameters};
pub use error::{PipelineError, PipelineResult};
pub use extractor::{ContourExtractor, ExtractionParameters};
pub use sequencer::ContourSequencer;
pub use styles::Style;
pub use validator::{CommandValidator, RejectedLine, ValidationReport};

use image::GrayImage;

/// Run the full raster-to-commands pipeline:
/// extract → sequence → emit → validate.
///
/// The returned report contains the final program in `accepted` and any
/// malformed lines in `rejected`. With a well-formed configuration the
/// rejected list is empty.
pub fn raster_to_commands(
    image: &GrayImage,
    extraction: &ExtractionParameters,
    toolpath: &ToolpathParameters,
) -> PipelineResult<ValidationReport> {
    extraction.validate()?;
    let contours = ContourExtractor::new(extraction.clone()).extract(image);
    tracing::debug!(contours = contours.len(), "extracted contours");

    let ordered =
        ContourSequencer::default().sequence(contours, toolpath.randomize_contours);

    let commands = ToolpathEmitter::new(toolpath.clone()).generate(&ordered)?;
    Ok(CommandValidator::validate(&commands))
}
