//! Contour sequencing.
//!
//! The extractor's detection order is arbitrary, so drawing in that order
//! wastes travel moves. The sequencer buckets contour centroids into a
//! uniform grid and orders the buckets row-major (top to bottom, left to
//! right within a row). This trades shortest-path optimality for an
//! O(n log n) sort that still keeps spatially adjacent contours together.

use rand::seq::SliceRandom;

use plotkit_core::Contour;

/// Side length in pixels of a spatial bucket. The observed value from the
/// machine this was tuned on; not a physical constant.
pub const DEFAULT_BUCKET_SIZE: f64 = 50.0;

/// Reorders a contour set for traversal.
#[derive(Debug, Clone)]
pub struct ContourSequencer {
    bucket_size: f64,
}

impl Default for ContourSequencer {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_SIZE)
    }
}

impl ContourSequencer {
    pub fn new(bucket_size: f64) -> Self {
        Self { bucket_size }
    }

    /// Return the same contours, reordered.
    ///
    /// With `randomize` a uniformly random permutation is produced from the
    /// process-wide random source. Otherwise the order is a deterministic
    /// function of the centroids: ascending by `(floor(cy / bucket),
    /// floor(cx / bucket))`, ties keeping their input order (stable sort).
    /// Zero-area contours centroid to (0, 0) and land in the first bucket.
    pub fn sequence(&self, mut contours: Vec<Contour>, randomize: bool) -> Vec<Contour> {
        if randomize {
            contours.shuffle(&mut rand::thread_rng());
            return contours;
        }

        contours.sort_by_key(|c| self.bucket_of(c));
        contours
    }

    fn bucket_of(&self, contour: &Contour) -> (i64, i64) {
        let (cx, cy) = contour.centroid();
        (
            (cy / self.bucket_size).floor() as i64,
            (cx / self.bucket_size).floor() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::PixelPoint;

    /// Small closed square whose centroid sits at (cx, cy).
    fn square_at(cx: i32, cy: i32) -> Contour {
        let h = 2;
        Contour::new(vec![
            PixelPoint::new(cx - h, cy - h),
            PixelPoint::new(cx + h, cy - h),
            PixelPoint::new(cx + h, cy + h),
            PixelPoint::new(cx - h, cy + h),
        ])
    }

    #[test]
    fn test_row_major_bucket_order() {
        // Same x-bucket, different y-bucket: (10,10) must come first.
        let a = square_at(10, 60);
        let b = square_at(10, 10);
        let ordered = ContourSequencer::default().sequence(vec![a, b.clone()], false);
        assert_eq!(ordered[0], b);
    }

    #[test]
    fn test_left_to_right_within_a_row() {
        let left = square_at(10, 10);
        let right = square_at(120, 10);
        let ordered =
            ContourSequencer::default().sequence(vec![right, left.clone()], false);
        assert_eq!(ordered[0], left);
    }

    #[test]
    fn test_ties_preserve_input_order() {
        // Both centroids fall in bucket (0, 0).
        let first = square_at(10, 10);
        let second = square_at(30, 30);
        let ordered = ContourSequencer::default()
            .sequence(vec![first.clone(), second.clone()], false);
        assert_eq!(ordered, vec![first, second]);
    }

    #[test]
    fn test_sequencing_is_a_permutation() {
        let contours: Vec<Contour> = (0..20).map(|i| square_at(i * 17 % 200, i * 31 % 200)).collect();

        for randomize in [false, true] {
            let ordered = ContourSequencer::default().sequence(contours.clone(), randomize);
            assert_eq!(ordered.len(), contours.len());
            // Same multiset: every input contour appears exactly as often.
            for c in &contours {
                let before = contours.iter().filter(|x| *x == c).count();
                let after = ordered.iter().filter(|x| *x == c).count();
                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn test_zero_area_contours_sort_first() {
        let line = Contour::new(vec![PixelPoint::new(200, 200), PixelPoint::new(220, 200)]);
        let square = square_at(150, 150);
        let ordered = ContourSequencer::default().sequence(vec![square, line.clone()], false);
        // The degenerate centroid (0,0) buckets ahead of anything real.
        assert_eq!(ordered[0], line);
    }
}
