//! Interpolation of scattered point values onto arbitrary locations.
//!
//! This module provides the methods used to turn scattered samples into a
//! regular mesh for raster maps. Both methods index the samples in an
//! `rstar` R-tree.

pub mod common;
pub mod idw;
pub mod nearest;

use crate::error::{Result, RiskmapError};

pub use common::Sample;

/// Trait for scattered-data interpolation methods
pub trait Interpolator {
    /// Interpolate a value at (x, y); `None` where no value can be derived
    fn interpolate(&self, x: f64, y: f64) -> Option<f64>;

    /// Get the name of this interpolation method
    fn name(&self) -> &str;
}

/// Get an interpolator by name over the given samples
pub fn get_interpolator(name: &str, samples: &[Sample]) -> Result<Box<dyn Interpolator>> {
    match name.to_lowercase().as_str() {
        "nearest" => Ok(Box::new(nearest::NearestInterpolator::new(samples))),
        "idw" | "linear" => Ok(Box::new(idw::IdwInterpolator::new(samples))),
        _ => Err(RiskmapError::InvalidParameter {
            param: "interpolation".to_string(),
            message: format!("Unknown interpolation method: {}", name),
        }),
    }
}
