//! # PlotKit Core
//!
//! Core types shared across the PlotKit workspace:
//! - Contour geometry (polylines, shoelace area, centroids)
//! - Error taxonomy
//! - Step calibration (distance/step conversion and linear model fitting)

pub mod calibration;
pub mod error;
pub mod geometry;

pub use calibration::{
    distance_to_steps, fit_linear_model, steps_to_distance, Axis, LinearModel,
};
pub use error::{Error, Result};
pub use geometry::{polyline_length, Contour, PixelPoint};
