//! Toolpath emission.
//!
//! Maps an ordered contour set plus a coordinate/feed configuration into a
//! linear G-code program with pen-lift semantics. Coordinates are written
//! with exactly 2 decimals; that is the output resolution of the whole
//! system and any finer input precision is lost here.

use rand::Rng;
use serde::{Deserialize, Serialize};

use plotkit_core::Contour;

use crate::error::{PipelineError, PipelineResult};

/// Toolpath generation parameters.
///
/// Scale maps raster pixels to output units; the offset is applied after
/// scaling. Delays are in seconds and a zero delay suppresses the dwell
/// entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolpathParameters {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Feed rate while the pen is down (units/min).
    pub feed_rate_drawing: f64,
    /// Feed rate for travel moves (units/min).
    pub feed_rate_travel: f64,
    /// Settle time after raising the pen, seconds.
    pub pen_up_delay: f64,
    /// Settle time after lowering the pen, seconds.
    pub pen_down_delay: f64,
    /// Draw contours in a random order instead of the spatial sort.
    pub randomize_contours: bool,
    /// Jitter vertices of long contours for a hand-drawn look.
    pub add_noise: bool,
    /// Half-range of the vertex jitter in output units. Cosmetic; the
    /// observed default, not a physical constant.
    pub noise_amplitude: f64,
}

impl Default for ToolpathParameters {
    fn default() -> Self {
        Self {
            scale_x: 0.5,
            scale_y: 0.5,
            offset_x: 50.0,
            offset_y: 50.0,
            feed_rate_drawing: 500.0,
            feed_rate_travel: 2000.0,
            pen_up_delay: 0.3,
            pen_down_delay: 0.3,
            randomize_contours: false,
            add_noise: false,
            noise_amplitude: 0.1,
        }
    }
}

/// Contours with more vertices than this get jitter when noise is enabled;
/// short contours stay exact so small features do not smear.
const NOISE_MIN_VERTICES: usize = 10;

impl ToolpathParameters {
    /// Validate parameter ranges before emission.
    pub fn validate(&self) -> PipelineResult<()> {
        for (name, value) in [
            ("scale_x", self.scale_x),
            ("scale_y", self.scale_y),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
        ] {
            if !value.is_finite() {
                return Err(PipelineError::InvalidParameters(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("feed_rate_drawing", self.feed_rate_drawing),
            ("feed_rate_travel", self.feed_rate_travel),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PipelineError::InvalidParameters(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("pen_up_delay", self.pen_up_delay),
            ("pen_down_delay", self.pen_down_delay),
            ("noise_amplitude", self.noise_amplitude),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::InvalidParameters(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Emits a G-code program from an ordered contour set.
pub struct ToolpathEmitter {
    params: ToolpathParameters,
}

impl ToolpathEmitter {
    pub fn new(params: ToolpathParameters) -> Self {
        Self { params }
    }

    /// Fixed program header: units, absolute positioning, XY plane,
    /// feed-per-minute, work coordinate system, pen up, origin, settle.
    pub fn header(&self) -> Vec<String> {
        vec![
            "G21".to_string(),
            "G90".to_string(),
            "G17".to_string(),
            "G94".to_string(),
            "G54".to_string(),
            "M5".to_string(),
            "G0 X0 Y0".to_string(),
            "G4 P1".to_string(),
        ]
    }

    /// Fixed program footer: pen up, return to origin, program end.
    pub fn footer(&self) -> Vec<String> {
        vec!["M5".to_string(), "G0 X0 Y0".to_string(), "M30".to_string()]
    }

    /// Generate the command sequence for the contours in their given order.
    ///
    /// An empty set still yields the full header and footer. Contours with
    /// fewer than 2 vertices should never reach this stage; if one does it
    /// is skipped without emitting anything.
    pub fn generate(&self, contours: &[Contour]) -> PipelineResult<Vec<String>> {
        self.params.validate()?;

        let mut rng = rand::thread_rng();
        let mut commands = self.header();
        commands.push(format!("G1 F{:.0}", self.params.feed_rate_travel));

        for contour in contours {
            if contour.len() < 2 {
                tracing::debug!(points = contour.len(), "skipping degenerate contour");
                continue;
            }
            self.emit_contour(contour, &mut commands, &mut rng);
        }

        commands.extend(self.footer());
        Ok(commands)
    }

    fn emit_contour(
        &self,
        contour: &Contour,
        commands: &mut Vec<String>,
        rng: &mut impl Rng,
    ) {
        let (start_x, start_y) = self.transform(contour.points()[0].x, contour.points()[0].y);

        commands.push(format!("G0 X{:.2} Y{:.2}", start_x, start_y));
        commands.push("M3 S0".to_string());
        if self.params.pen_down_delay > 0.0 {
            commands.push(format!("G4 P{}", self.params.pen_down_delay));
        }
        commands.push(format!("G1 F{:.0}", self.params.feed_rate_drawing));

        let jitter = self.params.add_noise && contour.len() > NOISE_MIN_VERTICES;
        for point in contour.points() {
            let (mut x, mut y) = self.transform(point.x, point.y);
            if jitter {
                let a = self.params.noise_amplitude;
                x += rng.gen_range(-a..=a);
                y += rng.gen_range(-a..=a);
            }
            commands.push(format!("G1 X{:.2} Y{:.2}", x, y));
        }

        // Closed contours loop back to the exact (non-jittered) start so
        // the pen lands where it began; pure lines end where they end.
        if contour.is_closed() {
            commands.push(format!("G1 X{:.2} Y{:.2}", start_x, start_y));
        }

        commands.push(format!("G1 F{:.0}", self.params.feed_rate_travel));
        commands.push("M5".to_string());
        if self.params.pen_up_delay > 0.0 {
            commands.push(format!("G4 P{}", self.params.pen_up_delay));
        }
    }

    fn transform(&self, px_x: i32, px_y: i32) -> (f64, f64) {
        (
            px_x as f64 * self.params.scale_x + self.params.offset_x,
            px_y as f64 * self.params.scale_y + self.params.offset_y,
        )
    }
}
