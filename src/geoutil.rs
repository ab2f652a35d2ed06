//! Geographic utility functions for map extents and coordinates.
//!
//! This module provides utilities for working with geographic coordinates:
//! longitude normalization, bounds that handle the dateline (180/-180
//! longitude) crossing, plot borders and regular grid detection.
//!
//! Coordinate arrays are `n x 2` with rows `[lat, lon]` in degrees.

use ndarray::ArrayView2;

use crate::error::{Result, RiskmapError};

/// Limits of a geographic (lon/lat) map
pub const GEO_LIMITS: Extent = Extent {
    min_lon: -180.0,
    max_lon: 180.0,
    min_lat: -90.0,
    max_lat: 90.0,
};

/// Rectangular map extent in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Extent {
    /// Center longitude of the extent
    pub fn mid_lon(&self) -> f64 {
        0.5 * (self.min_lon + self.max_lon)
    }

    /// Whether a lon/lat point falls inside the extent, modulo 360 in longitude
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.min_lat || lat > self.max_lat {
            return false;
        }
        [lon - 360.0, lon, lon + 360.0]
            .iter()
            .any(|l| *l >= self.min_lon && *l <= self.max_lon)
    }
}

/// Check the coordinate array layout and return the number of points
pub fn check_coords(coords: &ArrayView2<f64>) -> Result<usize> {
    if coords.ncols() != 2 {
        return Err(RiskmapError::invalid(
            "coords",
            format!(
                "Coordinates must have two columns (lat, lon), got {}",
                coords.ncols()
            ),
        ));
    }
    if coords.nrows() == 0 {
        return Err(RiskmapError::invalid("coords", "No coordinates given"));
    }
    Ok(coords.nrows())
}

/// Normalize a longitude value to the range [-180, 180)
pub fn normalize_longitude(lon: f64) -> f64 {
    let mut normalized = ((lon + 180.0) % 360.0 + 360.0) % 360.0 - 180.0;

    // Exactly 180.0 is represented as -180.0
    if normalized == 180.0 {
        normalized = -180.0;
    }

    normalized
}

/// Sorted distinct finite values
fn unique_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}

/// Smallest longitude interval that contains all given longitudes.
///
/// The interval may cross the dateline, in which case `max > 180`. When the
/// largest gap between points is not wider than `2 * buffer`, the whole
/// globe `(-180, 180)` is returned.
pub fn lon_bounds(lons: &[f64], buffer: f64) -> (f64, f64) {
    let mut uniq = unique_sorted(lons.iter().map(|&lon| normalize_longitude(lon)));
    if uniq.is_empty() {
        return (GEO_LIMITS.min_lon, GEO_LIMITS.max_lon);
    }
    uniq.push(uniq[0] + 360.0);

    let (gap_idx, gap) = uniq
        .windows(2)
        .map(|w| w[1] - w[0])
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, d)| {
            if d > best.1 {
                (i, d)
            } else {
                best
            }
        });

    if gap <= 2.0 * buffer {
        return (GEO_LIMITS.min_lon, GEO_LIMITS.max_lon);
    }

    let mut lon_min = uniq[gap_idx + 1];
    let mut lon_max = uniq[gap_idx];
    if lon_min >= 180.0 {
        lon_min -= 360.0;
    } else if lon_max < lon_min {
        lon_max += 360.0;
    }

    (lon_min - buffer, lon_max + buffer)
}

/// Bounds of lat/lon points as (min_lon, min_lat, max_lon, max_lat).
///
/// Longitudes follow [`lon_bounds`], latitudes are clipped to [-90, 90].
pub fn latlon_bounds(lat: &[f64], lon: &[f64], buffer: f64) -> (f64, f64, f64, f64) {
    let (min_lon, max_lon) = lon_bounds(lon, buffer);
    let lats = lat.iter().copied().filter(|v| v.is_finite());
    let min_lat = lats.clone().fold(f64::INFINITY, f64::min);
    let max_lat = lats.fold(f64::NEG_INFINITY, f64::max);
    (
        min_lon,
        (min_lat - buffer).max(GEO_LIMITS.min_lat),
        max_lon,
        (max_lat + buffer).min(GEO_LIMITS.max_lat),
    )
}

/// Extent of the points widened by `buffer` and clipped to `limits`
pub fn get_borders(coords: &ArrayView2<f64>, buffer: f64, limits: &Extent) -> Extent {
    let fold = |col: usize| {
        coords
            .column(col)
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    };
    let (min_lat, max_lat) = fold(0);
    let (min_lon, max_lon) = fold(1);

    Extent {
        min_lon: (min_lon - buffer).max(limits.min_lon),
        max_lon: (max_lon + buffer).min(limits.max_lon),
        min_lat: (min_lat - buffer).max(limits.min_lat),
        max_lat: (max_lat + buffer).min(limits.max_lat),
    }
}

/// Map extent for a lon/lat plot, handling the dateline crossing.
pub fn geographic_extent(coords: &ArrayView2<f64>, buffer: f64) -> Extent {
    let lat: Vec<f64> = coords.column(0).to_vec();
    let lon: Vec<f64> = coords.column(1).to_vec();
    let (min_lon, min_lat, max_lon, max_lat) = latlon_bounds(&lat, &lon, buffer);
    Extent {
        min_lon,
        max_lon,
        min_lat,
        max_lat,
    }
}

/// Whether the points form a regular lat/lon grid.
///
/// Returns `(is_regular, height, width)` where height is the number of
/// distinct latitudes and width the number of distinct longitudes.
pub fn grid_is_regular(coords: &ArrayView2<f64>) -> (bool, usize, usize) {
    let lats = unique_sorted(coords.column(0).iter().copied());
    let lons = unique_sorted(coords.column(1).iter().copied());
    let (height, width) = (lats.len(), lons.len());

    let regular = height > 1 && width > 1 && height * width == coords.nrows() && {
        let mut cells: Vec<(usize, usize)> = coords
            .rows()
            .into_iter()
            .filter_map(|row| {
                let i = lats.binary_search_by(|v| v.total_cmp(&row[0])).ok()?;
                let j = lons.binary_search_by(|v| v.total_cmp(&row[1])).ok()?;
                Some((i, j))
            })
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells.len() == coords.nrows()
    };

    (regular, height, width)
}
