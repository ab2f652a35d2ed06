//! Hexagonally binned maps.
//!
//! Points are assigned to the nearest center of two interleaved
//! rectangular lattices, which together tile the plane with hexagons. Each
//! occupied hexagon is colored with the mean of its values.

use ndarray::ArrayView2;

use super::{plot_scattered_data, Labels, PlotOptions, ScatterKind};
use crate::config::DEFAULT_CMAP;
use crate::error::Result;
use crate::figure::Figure;
use crate::logging::{log_error, log_timed_operation};

/// Hexagon vertices in units of (sx, sy / 3)
const HEXAGON: [(f64, f64); 6] = [
    (0.5, -0.5),
    (0.5, 0.5),
    (0.0, 1.0),
    (-0.5, 0.5),
    (-0.5, -0.5),
    (0.0, -1.0),
];

/// Plot values binned into hexagons, one panel per row of `values`.
///
/// `gridsize` is the number of hexagons in x and defaults to half the
/// number of points, capped at `max_bins`. The colorbar spans the data
/// range of the unbinned values.
pub fn geo_bin_from_array(
    values: ArrayView2<f64>,
    coords: ArrayView2<f64>,
    var_name: impl Into<Labels>,
    title: impl Into<Labels>,
    opts: PlotOptions,
) -> Result<Figure> {
    let (var_name, title) = (var_name.into(), title.into());
    log_timed_operation("geo_bin_from_array", || {
        plot_scattered_data(
            ScatterKind::HexBin,
            values,
            coords,
            var_name,
            title,
            DEFAULT_CMAP,
            opts,
        )
    })
    .inspect_err(|e| log_error(e, "geo_bin_from_array"))
}

/// Widen a degenerate interval
fn nonsingular(lo: f64, hi: f64) -> (f64, f64) {
    const EXPANDER: f64 = 0.1;
    if hi - lo > f64::EPSILON * lo.abs().max(hi.abs()).max(1.0) {
        (lo, hi)
    } else if lo == 0.0 && hi == 0.0 {
        (-EXPANDER, EXPANDER)
    } else {
        (lo - EXPANDER * lo.abs(), hi + EXPANDER * hi.abs())
    }
}

/// Bin points into hexagons of `gridsize` columns.
///
/// Points without a position or with a NaN value are skipped. Returns the
/// polygons of the occupied hexagons and the mean value of each.
pub(crate) fn hexbin(
    points: &[Option<(f64, f64)>],
    values: &[f64],
    gridsize: usize,
) -> (Vec<Vec<(f64, f64)>>, Vec<f64>) {
    let samples: Vec<((f64, f64), f64)> = points
        .iter()
        .zip(values)
        .filter_map(|(p, &v)| p.filter(|_| v.is_finite()).map(|p| (p, v)))
        .collect();
    if samples.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let fold = |f: fn(&(f64, f64)) -> f64| {
        samples
            .iter()
            .map(|(p, _)| f(p))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    };
    let (xmin, xmax) = fold(|p| p.0);
    let (ymin, ymax) = fold(|p| p.1);
    let (mut xmin, mut xmax) = nonsingular(xmin, xmax);
    let (ymin, ymax) = nonsingular(ymin, ymax);

    let nx = gridsize.max(1);
    let ny = ((nx as f64 / 3f64.sqrt()) as usize).max(1);
    let padding = 1e-9 * (xmax - xmin);
    xmin -= padding;
    xmax += padding;
    let sx = (xmax - xmin) / nx as f64;
    let sy = (ymax - ymin) / ny as f64;

    // Lattice 1 has (nx + 1) x (ny + 1) centers, lattice 2 nx x ny
    let (nx1, ny1) = (nx + 1, ny + 1);
    let offset2 = nx1 * ny1;
    let mut sums = vec![0.0; offset2 + nx * ny];
    let mut counts = vec![0usize; offset2 + nx * ny];

    for &((x, y), v) in &samples {
        let ix = (x - xmin) / sx;
        let iy = (y - ymin) / sy;
        let (ix1, iy1) = (ix.round(), iy.round());
        let (ix2, iy2) = (ix.floor(), iy.floor());
        let d1 = (ix - ix1).powi(2) + 3.0 * (iy - iy1).powi(2);
        let d2 = (ix - ix2 - 0.5).powi(2) + 3.0 * (iy - iy2 - 0.5).powi(2);

        let index = if d1 < d2 {
            let (i, j) = (ix1.clamp(0.0, nx as f64) as usize, iy1.clamp(0.0, ny as f64) as usize);
            i * ny1 + j
        } else {
            let (i, j) = (
                ix2.clamp(0.0, (nx - 1) as f64) as usize,
                iy2.clamp(0.0, (ny - 1) as f64) as usize,
            );
            offset2 + i * ny + j
        };
        sums[index] += v;
        counts[index] += 1;
    }

    let center = |index: usize| {
        if index < offset2 {
            let (i, j) = (index / ny1, index % ny1);
            (xmin + i as f64 * sx, ymin + j as f64 * sy)
        } else {
            let (i, j) = ((index - offset2) / ny, (index - offset2) % ny);
            (xmin + (i as f64 + 0.5) * sx, ymin + (j as f64 + 0.5) * sy)
        }
    };

    counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(index, &count)| {
            let (cx, cy) = center(index);
            let polygon = HEXAGON
                .iter()
                .map(|&(dx, dy)| (cx + dx * sx, cy + dy * sy / 3.0))
                .collect();
            (polygon, sums[index] / count as f64)
        })
        .unzip()
}
