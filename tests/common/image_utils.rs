//! Image verification utilities for testing.
//!
//! This module provides helper functions for checking rendered figures.

#![allow(dead_code)]

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat, Rgba};
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Detect image format from the file contents
pub fn detect_image_format(path: &Path) -> Option<ImageFormat> {
    let bytes = std::fs::read(path).ok()?;
    image::guess_format(&bytes).ok()
}

/// Count the pixels that differ from `background`
pub fn count_non_background(image: &DynamicImage, background: Rgba<u8>) -> usize {
    image.pixels().filter(|(_, _, p)| *p != background).count()
}

/// Whether the image has at least `min` distinct colors
pub fn has_distinct_colors(image: &DynamicImage, min: usize) -> bool {
    let mut colors: Vec<[u8; 4]> = image.pixels().map(|(_, _, p)| p.0).collect();
    colors.sort_unstable();
    colors.dedup();
    colors.len() >= min
}
