//! Step calibration.
//!
//! Plotter firmware in this project addresses the axes in motor steps rather
//! than millimeters. The default ratios below are placeholders meant to be
//! replaced by a fitted model once an operator has jogged the machine and
//! recorded (distance, step) correspondences.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Machine axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Default calibration ratio in steps per distance unit.
    pub fn default_steps_per_unit(self) -> f64 {
        match self {
            Axis::X | Axis::Y => 10.0,
            Axis::Z => 100.0,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            other => Err(Error::invalid_input(format!("unknown axis '{}'", other))),
        }
    }
}

/// Convert a distance to whole motor steps using the default ratio.
///
/// Truncates toward zero, so the round trip through
/// [`steps_to_distance`] is exact only for distances that are exact
/// multiples of one step.
pub fn distance_to_steps(distance: f64, axis: Axis) -> i64 {
    (distance * axis.default_steps_per_unit()) as i64
}

/// Inverse of [`distance_to_steps`] under the same default ratio.
pub fn steps_to_distance(steps: i64, axis: Axis) -> f64 {
    steps as f64 / axis.default_steps_per_unit()
}

/// A fitted affine calibration `steps = slope * distance + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    /// Predicted (fractional) step count for a distance.
    pub fn steps_for(&self, distance: f64) -> f64 {
        self.slope * distance + self.intercept
    }
}

/// Fit independent least-squares lines for the X and Y axes.
///
/// `distance_samples` and `step_samples` are parallel lists of (x, y)
/// measurement pairs: the i-th distance pair corresponds to the i-th step
/// pair. Returns the fitted (X, Y) models.
///
/// Fails with [`Error::InvalidInput`] if the lists are empty, of unequal
/// length, shorter than two samples, or degenerate (all distances equal).
pub fn fit_linear_model(
    distance_samples: &[(f64, f64)],
    step_samples: &[(f64, f64)],
) -> Result<(LinearModel, LinearModel)> {
    if distance_samples.len() != step_samples.len() {
        return Err(Error::invalid_input(format!(
            "sample lists differ in length: {} distances vs {} steps",
            distance_samples.len(),
            step_samples.len()
        )));
    }
    let x_model = least_squares(
        distance_samples.iter().map(|p| p.0),
        step_samples.iter().map(|p| p.0),
        distance_samples.len(),
    )?;
    let y_model = least_squares(
        distance_samples.iter().map(|p| p.1),
        step_samples.iter().map(|p| p.1),
        distance_samples.len(),
    )?;
    Ok((x_model, y_model))
}

/// Closed-form least-squares fit of `y = a*x + b`. The model family is
/// strictly affine, so no iterative solver is involved.
fn least_squares(
    xs: impl Iterator<Item = f64>,
    ys: impl Iterator<Item = f64>,
    n: usize,
) -> Result<LinearModel> {
    if n < 2 {
        return Err(Error::invalid_input(format!(
            "need at least 2 calibration samples, got {}",
            n
        )));
    }
    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (x, y) in xs.zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let denom = n_f * sum_xx - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return Err(Error::invalid_input(
            "calibration samples are degenerate: all distances identical",
        ));
    }
    let slope = (n_f * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f;
    Ok(LinearModel { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ratios() {
        assert_eq!(distance_to_steps(5.0, Axis::X), 50);
        assert_eq!(distance_to_steps(5.0, Axis::Y), 50);
        assert_eq!(distance_to_steps(5.0, Axis::Z), 500);
    }

    #[test]
    fn test_truncation_toward_zero() {
        assert_eq!(distance_to_steps(1.27, Axis::X), 12);
        assert_eq!(distance_to_steps(-1.27, Axis::X), -12);
    }

    #[test]
    fn test_round_trip_exact_on_step_multiples() {
        // Exact for distances that are multiples of 0.1 (one X step).
        for d in [0.0, 0.1, 2.5, 13.7, 100.0] {
            let steps = distance_to_steps(d, Axis::X);
            assert!((steps_to_distance(steps, Axis::X) - d).abs() < 1e-9);
        }
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("x".parse::<Axis>().unwrap(), Axis::X);
        assert_eq!(" Z ".parse::<Axis>().unwrap(), Axis::Z);
        assert!("W".parse::<Axis>().is_err());
    }

    #[test]
    fn test_fit_recovers_synthetic_line() {
        // steps = 3 * distance + 2 on both axes.
        let distances: Vec<(f64, f64)> =
            vec![(0.0, 1.0), (5.0, 2.0), (10.0, 4.0), (20.0, 8.0), (50.0, 16.0)];
        let steps: Vec<(f64, f64)> = distances
            .iter()
            .map(|&(x, y)| (3.0 * x + 2.0, 3.0 * y + 2.0))
            .collect();

        let (mx, my) = fit_linear_model(&distances, &steps).unwrap();
        assert!((mx.slope - 3.0).abs() < 1e-9);
        assert!((mx.intercept - 2.0).abs() < 1e-9);
        assert!((my.slope - 3.0).abs() < 1e-9);
        assert!((my.intercept - 2.0).abs() < 1e-9);
        assert!((mx.steps_for(7.0) - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_bad_samples() {
        assert!(fit_linear_model(&[], &[]).is_err());
        assert!(fit_linear_model(&[(1.0, 1.0)], &[(10.0, 10.0)]).is_err());
        assert!(fit_linear_model(&[(1.0, 1.0), (2.0, 2.0)], &[(10.0, 10.0)]).is_err());
        // All distances identical: slope is unconstrained.
        let degenerate = vec![(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)];
        let steps = vec![(50.0, 50.0), (51.0, 51.0), (52.0, 52.0)];
        assert!(fit_linear_model(&degenerate, &steps).is_err());
    }
}
