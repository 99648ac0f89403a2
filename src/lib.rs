//! # PlotKit
//!
//! Converts raster images into pen-plotter G-code and streams it to
//! GRBL-style controllers over serial.
//!
//! The workspace is organized as three crates plus this binary:
//!
//! 1. **plotkit-core** — geometry, error taxonomy, step calibration
//! 2. **plotkit-pipeline** — stylization, contour extraction, sequencing,
//!    toolpath emission, command validation
//! 3. **plotkit-communication** — serial discovery and the line/ack
//!    streaming loop
//! 4. **plotkit** — the CLI wiring them together

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use plotkit_communication;
pub use plotkit_core;
pub use plotkit_pipeline;

/// Initialize tracing with an env-filter, defaulting to INFO.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = fmt::layer().with_target(true).with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Write a finished program to disk, one command per line, preceded by a
/// comment banner. The banner lines are comments and therefore no-ops for
/// both the validator and the sender.
pub fn write_program(
    path: &Path,
    commands: &[String],
    source_description: &str,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "; PlotKit toolpath")?;
    writeln!(out, "; Source: {}", source_description)?;
    writeln!(
        out,
        "; Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    for command in commands {
        writeln!(out, "{}", command)?;
    }
    out.flush()?;
    Ok(())
}

/// Read a program back from disk, stripping blank and comment lines the
/// same way the sender would.
pub fn read_program(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with(';'))
        .map(str::to_string)
        .collect())
}
