//! Common utilities for interpolation algorithms.

use rstar::primitives::GeomWithData;
use rstar::RTree;

/// A sample location carrying its value in the R-tree
pub type IndexedSample = GeomWithData<[f64; 2], f64>;

/// One scattered sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Whether location and value are all finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.value.is_finite()
    }
}

/// Index the finite samples; NaN values are left out
pub fn build_tree(samples: &[Sample]) -> RTree<IndexedSample> {
    RTree::bulk_load(
        samples
            .iter()
            .filter(|s| s.is_finite())
            .map(|s| GeomWithData::new([s.x, s.y], s.value))
            .collect(),
    )
}

/// Squared euclidean distance between two points
pub fn distance_2(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}
