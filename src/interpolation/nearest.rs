//! Nearest neighbor interpolation.
//!
//! This method selects the value of the nearest sample. It's the simplest
//! interpolation method and keeps the original values unchanged.

use rstar::RTree;

use super::common::{build_tree, IndexedSample, Sample};
use super::Interpolator;

/// Nearest neighbor interpolator
pub struct NearestInterpolator {
    tree: RTree<IndexedSample>,
}

impl NearestInterpolator {
    pub fn new(samples: &[Sample]) -> Self {
        Self {
            tree: build_tree(samples),
        }
    }
}

impl Interpolator for NearestInterpolator {
    fn interpolate(&self, x: f64, y: f64) -> Option<f64> {
        self.tree.nearest_neighbor(&[x, y]).map(|sample| sample.data)
    }

    fn name(&self) -> &str {
        "nearest"
    }
}
