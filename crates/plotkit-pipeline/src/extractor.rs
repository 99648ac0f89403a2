//! Contour extraction.
//!
//! Traces all boundary curves in a binarized raster (outer borders and holes
//! alike, so interior detail survives) and simplifies each into a polyline
//! with a perimeter-relative Douglas-Peucker tolerance.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use plotkit_core::{polyline_length, Contour, PixelPoint};

use crate::error::{PipelineError, PipelineResult};

/// Contour extraction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionParameters {
    /// Minimum open arc length in pixels. Raw curves at or below this
    /// length are treated as noise and dropped.
    pub min_contour_length: f64,
    /// Simplification tolerance as a fraction of the closed perimeter of
    /// each curve.
    pub epsilon_factor: f64,
}

impl Default for ExtractionParameters {
    fn default() -> Self {
        Self {
            min_contour_length: 5.0,
            epsilon_factor: 0.005,
        }
    }
}

impl ExtractionParameters {
    /// Validate parameter ranges.
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.min_contour_length.is_finite() || self.min_contour_length < 0.0 {
            return Err(PipelineError::InvalidParameters(format!(
                "min_contour_length must be finite and non-negative, got {}",
                self.min_contour_length
            )));
        }
        if !self.epsilon_factor.is_finite() || self.epsilon_factor < 0.0 {
            return Err(PipelineError::InvalidParameters(format!(
                "epsilon_factor must be finite and non-negative, got {}",
                self.epsilon_factor
            )));
        }
        Ok(())
    }
}

/// Extracts simplified polyline contours from a raster image.
pub struct ContourExtractor {
    params: ExtractionParameters,
}

impl Default for ContourExtractor {
    fn default() -> Self {
        Self::new(ExtractionParameters::default())
    }
}

impl ContourExtractor {
    pub fn new(params: ExtractionParameters) -> Self {
        Self { params }
    }

    /// Find and simplify contours. Nonzero pixels are foreground.
    ///
    /// An empty or degenerate raster produces an empty set, never an error.
    /// The output order is the underlying detection order and carries no
    /// guarantee; callers that care about traversal cost run the result
    /// through the sequencer.
    pub fn extract(&self, image: &GrayImage) -> Vec<Contour> {
        if image.width() == 0 || image.height() == 0 {
            return Vec::new();
        }

        let raw = find_contours::<i32>(image);
        let mut contours = Vec::new();

        for curve in &raw {
            let points: Vec<PixelPoint> = curve
                .points
                .iter()
                .map(|p| PixelPoint::new(p.x, p.y))
                .collect();

            if polyline_length(&points, false) <= self.params.min_contour_length {
                continue;
            }

            // Tolerance is relative to the closed perimeter so large and
            // small curves simplify with comparable fidelity.
            let epsilon = self.params.epsilon_factor * polyline_length(&points, true);
            let simplified = simplify(&points, epsilon);
            if simplified.len() >= 2 {
                contours.push(Contour::new(simplified));
            }
        }

        contours
    }
}

fn simplify(points: &[PixelPoint], epsilon: f64) -> Vec<PixelPoint> {
    let curve: Vec<Point<i32>> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
    approximate_polygon_dp(&curve, epsilon, true)
        .into_iter()
        .map(|p| PixelPoint::new(p.x, p.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// A raster with a single filled axis-aligned square.
    fn filled_square(size: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
        let mut img = GrayImage::new(size, size);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        img
    }

    #[test]
    fn test_blank_raster_yields_no_contours() {
        let img = GrayImage::new(64, 64);
        let contours = ContourExtractor::default().extract(&img);
        assert!(contours.is_empty());
    }

    #[test]
    fn test_zero_sized_raster_yields_no_contours() {
        let img = GrayImage::new(0, 0);
        assert!(ContourExtractor::default().extract(&img).is_empty());
    }

    #[test]
    fn test_square_produces_closed_contour() {
        let img = filled_square(64, 10, 10, 30);
        let contours = ContourExtractor::default().extract(&img);
        assert!(!contours.is_empty());
        let largest = contours
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .unwrap();
        assert!(largest.len() >= 2);
        assert!(largest.is_closed());
        // The boundary of a 30px square encloses roughly 30^2 pixels.
        assert!(largest.area() > 600.0);
    }

    #[test]
    fn test_min_length_discards_specks() {
        // A single foreground pixel traces a degenerate curve well under
        // the default 5px minimum.
        let img = filled_square(32, 16, 16, 1);
        let contours = ContourExtractor::default().extract(&img);
        assert!(contours.is_empty());
    }

    #[test]
    fn test_every_contour_has_at_least_two_points() {
        let img = filled_square(64, 4, 4, 40);
        for c in ContourExtractor::default().extract(&img) {
            assert!(c.len() >= 2);
        }
    }

    #[test]
    fn test_parameter_validation() {
        let bad = ExtractionParameters {
            min_contour_length: -1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = ExtractionParameters {
            epsilon_factor: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        assert!(ExtractionParameters::default().validate().is_ok());
    }
}
