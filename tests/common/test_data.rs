//! Test data generation utilities.
//!
//! This module provides the value and coordinate arrays used by the
//! plotting tests.

#![allow(dead_code)]

use geo::Point;
use ndarray::{array, Array2};
use riskmap::{Category, GeoDataFrame, Overlays};
use std::sync::Arc;

/// Four points straddling the dateline, as `[lat, lon]`
pub fn dateline_coords() -> Array2<f64> {
    array![[-17.0, 178.0], [-10.0, 180.0], [-27.0, 175.0], [-16.0, 186.0]]
}

/// A coastline crossing the dateline and one town, as lon/lat
pub fn dateline_overlays() -> Arc<Overlays> {
    Arc::new(Overlays {
        borders: vec![vec![(177.0, -20.0), (182.0, -20.0), (182.0, -12.0)]],
        places: vec![(Point::new(179.0, -18.0), "Labasa".to_string())],
    })
}

/// Four points spread over Africa and the Indian Ocean
pub fn spread_coords() -> Array2<f64> {
    array![[-10.0, 17.0], [-30.0, 20.0], [5.0, 75.0], [-16.0, 20.0]]
}

/// Four points near the Greenwich meridian
pub fn categorical_coords() -> Array2<f64> {
    array![[26.0, 0.0], [26.0, 1.0], [28.0, 0.0], [29.0, 1.0]]
}

/// Categorical rows built from mixed numbers and text
pub fn categories(rows: Vec<Vec<Category>>) -> Array2<Category> {
    let ncols = rows.first().map_or(0, Vec::len);
    let flat: Vec<Category> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((flat.len() / ncols.max(1), ncols), flat)
        .expect("rows must have equal length")
}

/// 4 x 4 categories numbered 0 to 15
pub fn sixteen_categories() -> Array2<Category> {
    Array2::from_shape_fn((4, 4), |(i, j)| Category::from((4 * i + j) as i64))
}

/// Return periods for two intensity thresholds at four points.
///
/// `second` is the value of the "10.0" column at the second point; a zero
/// there forces a linear color scale.
pub fn return_periods(second: f64) -> GeoDataFrame {
    GeoDataFrame::from_rows(
        &["10.0", "20.0"],
        &[
            vec![Some(2.0), Some(5.0)],
            vec![Some(second), Some(6.0)],
            vec![None, Some(2.0)],
            vec![Some(1.0), Some(1000.0)],
        ],
    )
    .expect("valid columns")
    .with_geometry(vec![
        Point::new(45.0, 26.0),
        Point::new(46.0, 26.0),
        Point::new(45.0, 27.0),
        Point::new(46.0, 27.0),
    ])
    .expect("one point per row")
}

/// Title function used for return-period maps
pub fn threshold_titles(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|col| format!("Threshold Intensity: {} m/s", col))
        .collect()
}
