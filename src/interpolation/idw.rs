//! Inverse distance weighting.
//!
//! Blends the `k` nearest samples with weights `1 / d^power`. Locations
//! outside the convex hull of the samples get no value, so the mesh stays
//! within the data footprint.

use geo::{ConvexHull, Intersects, MultiPoint, Point, Polygon};
use rstar::RTree;

use super::common::{build_tree, distance_2, IndexedSample, Sample};
use super::Interpolator;

/// Number of neighbors blended per location
pub const DEFAULT_NEIGHBORS: usize = 8;

/// Distance exponent
pub const DEFAULT_POWER: f64 = 2.0;

/// Inverse distance weighting interpolator
pub struct IdwInterpolator {
    tree: RTree<IndexedSample>,
    hull: Option<Polygon<f64>>,
    neighbors: usize,
    power: f64,
}

impl IdwInterpolator {
    pub fn new(samples: &[Sample]) -> Self {
        let tree = build_tree(samples);
        let points: Vec<Point<f64>> = tree
            .iter()
            .map(|s| Point::new(s.geom()[0], s.geom()[1]))
            .collect();
        let hull = (!points.is_empty()).then(|| MultiPoint::from(points).convex_hull());

        Self {
            tree,
            hull,
            neighbors: DEFAULT_NEIGHBORS,
            power: DEFAULT_POWER,
        }
    }

    /// Use `neighbors` samples per location
    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors.max(1);
        self
    }
}

impl Interpolator for IdwInterpolator {
    fn interpolate(&self, x: f64, y: f64) -> Option<f64> {
        let hull = self.hull.as_ref()?;
        if !hull.intersects(&Point::new(x, y)) {
            return None;
        }

        let query = [x, y];
        let mut weight_sum = 0.0;
        let mut value_sum = 0.0;
        for sample in self.tree.nearest_neighbor_iter(&query).take(self.neighbors) {
            let d2 = distance_2(sample.geom(), &query);
            if d2 == 0.0 {
                return Some(sample.data);
            }
            let weight = 1.0 / d2.powf(0.5 * self.power);
            weight_sum += weight;
            value_sum += weight * sample.data;
        }

        (weight_sum > 0.0).then(|| value_sum / weight_sum)
    }

    fn name(&self) -> &str {
        "idw"
    }
}
