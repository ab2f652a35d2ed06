//! Assertion utilities for testing.
//!
//! This module provides helper functions for making assertions on figures,
//! particularly for floating-point comparisons of colorbar bounds.

#![allow(dead_code)]

use riskmap::{Axes, Colorbar};

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// The first colorbar of the axes, panicking if there is none
pub fn colorbar(axes: &Axes) -> &Colorbar {
    axes.colorbar()
        .unwrap_or_else(|| panic!("Axes '{}' has no colorbar", axes.title()))
}

/// Assert the colorbar bounds of an axes.
///
/// # Panics
///
/// Panics if the axes has no colorbar or its bounds differ from `vmin`/`vmax`.
pub fn assert_colorbar_bounds(axes: &Axes, vmin: f64, vmax: f64) {
    let colorbar = colorbar(axes);
    assert_approx_eq(colorbar.vmin(), vmin, None);
    assert_approx_eq(colorbar.vmax(), vmax, None);
}

/// Assert the title, colorbar bounds and colormap name of a continuous map.
pub fn assert_continuous_map(axes: &Axes, title: &str, vmin: f64, vmax: f64, cmap: &str) {
    assert_eq!(axes.title(), title);
    assert_colorbar_bounds(axes, vmin, vmax);
    assert_eq!(axes.collections()[0].cmap().name(), cmap);
    assert_eq!(colorbar(axes).cmap_name(), cmap);
}
