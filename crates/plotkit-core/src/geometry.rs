//! Contour geometry.
//!
//! A contour is a simplified polyline traced along a boundary of a raster
//! image, stored in integer pixel coordinates. Closure is a derived property:
//! a contour whose shoelace area is nonzero encloses something and is treated
//! as closed; a zero-area contour is a pure line.

use serde::{Deserialize, Serialize};

/// A raw contour vertex in pixel coordinates (y = 0 is the top of the image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Arc length of a polyline. With `closed` the segment from the last point
/// back to the first is included.
pub fn polyline_length(points: &[PixelPoint], closed: bool) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut length: f64 = points
        .windows(2)
        .map(|w| w[0].distance_to(&w[1]))
        .sum();
    if closed {
        length += points[points.len() - 1].distance_to(&points[0]);
    }
    length
}

/// An ordered polyline extracted from a raster image.
///
/// Invariant: every contour produced by the extractor has at least 2 points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    points: Vec<PixelPoint>,
}

impl Contour {
    pub fn new(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PixelPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arc length treating the contour as a closed ring.
    pub fn perimeter(&self) -> f64 {
        polyline_length(&self.points, true)
    }

    /// Arc length treating the contour as an open polyline.
    pub fn open_length(&self) -> f64 {
        polyline_length(&self.points, false)
    }

    /// Signed enclosed area via the shoelace formula.
    /// Positive for counter-clockwise winding in image coordinates.
    /// Exact for integer vertices, so a collinear contour yields exactly 0.
    pub fn signed_area(&self) -> f64 {
        let pts = &self.points;
        let n = pts.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area: i64 = 0;
        for i in 0..n {
            let j = (i + 1) % n;
            twice_area +=
                pts[i].x as i64 * pts[j].y as i64 - pts[j].x as i64 * pts[i].y as i64;
        }
        twice_area as f64 / 2.0
    }

    /// Absolute enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// A contour with nonzero enclosed area is drawn as a closed loop.
    pub fn is_closed(&self) -> bool {
        self.signed_area() != 0.0
    }

    /// Area-weighted centroid of the enclosed region.
    ///
    /// Zero-area contours (pure lines) have no defined mass center; they
    /// fall back to (0, 0) so the sequencer still places them in a bucket.
    pub fn centroid(&self) -> (f64, f64) {
        let area = self.signed_area();
        if area == 0.0 {
            return (0.0, 0.0);
        }
        let pts = &self.points;
        let n = pts.len();
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            let cross = (pts[i].x as i64 * pts[j].y as i64
                - pts[j].x as i64 * pts[i].y as i64) as f64;
            cx += (pts[i].x + pts[j].x) as f64 * cross;
            cy += (pts[i].y + pts[j].y) as f64 * cross;
        }
        (cx / (6.0 * area), cy / (6.0 * area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(coords: &[(i32, i32)]) -> Contour {
        Contour::new(coords.iter().map(|&(x, y)| PixelPoint::new(x, y)).collect())
    }

    #[test]
    fn test_polyline_length() {
        let pts = [
            PixelPoint::new(0, 0),
            PixelPoint::new(10, 0),
            PixelPoint::new(10, 10),
        ];
        assert_eq!(polyline_length(&pts, false), 20.0);
        let closed = polyline_length(&pts, true);
        assert!((closed - (20.0 + 200f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn test_square_area_and_centroid() {
        let c = contour(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(c.area(), 100.0);
        assert!(c.is_closed());
        let (cx, cy) = c.centroid();
        assert!((cx - 5.0).abs() < 1e-9);
        assert!((cy - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_contour_is_open() {
        let c = contour(&[(0, 0), (5, 0), (10, 0)]);
        assert_eq!(c.signed_area(), 0.0);
        assert!(!c.is_closed());
        assert_eq!(c.centroid(), (0.0, 0.0));
    }

    #[test]
    fn test_two_point_line() {
        let c = contour(&[(0, 0), (10, 0)]);
        assert_eq!(c.signed_area(), 0.0);
        assert_eq!(c.open_length(), 10.0);
        assert_eq!(c.perimeter(), 20.0);
    }

    #[test]
    fn test_triangle_area() {
        let c = contour(&[(0, 0), (10, 0), (5, 10)]);
        assert_eq!(c.area(), 50.0);
        assert!(c.is_closed());
    }
}
