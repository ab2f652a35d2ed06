//! Map plotting functions.
//!
//! Every function takes a 2-D value array (one panel per row) and an
//! `n x 2` coordinate array of `[lat, lon]` rows, and returns the drawn
//! [`Figure`]. The figure can be inspected, rendered or saved, and is
//! released when dropped.

pub mod bin;
pub mod categorical;
pub mod gdf;
pub mod image;
pub mod options;
pub mod scatter;

use ndarray::ArrayView2;
use tracing::{debug, warn};

pub use bin::geo_bin_from_array;
pub use categorical::geo_scatter_categorical;
pub use gdf::plot_from_gdf;
pub use image::geo_im_from_array;
pub use options::{CmapSpec, Labels, PlotOptions};
pub use scatter::geo_scatter_from_array;

use crate::error::{Result, RiskmapError};
use crate::figure::{make_map, Axes, Collection, CollectionKind, Figure, Norm, DEFAULT_MARKER_SIZE};
use crate::geoutil::{check_coords, geographic_extent, Extent};
use crate::overlay::{add_populated_places, add_shapes};
use crate::transformation::Projection;

/// How scattered points are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScatterKind {
    Points,
    HexBin,
}

/// Check that every panel has one value per coordinate; returns the
/// number of points
pub(crate) fn check_sizes<T>(values: &ArrayView2<T>, coords: &ArrayView2<f64>) -> Result<usize> {
    let n = check_coords(coords)?;
    if values.ncols() != n {
        return Err(RiskmapError::ShapeMismatch {
            expected: n,
            actual: values.ncols(),
        });
    }
    if values.nrows() == 0 {
        return Err(RiskmapError::invalid("values", "No values to plot"));
    }
    Ok(n)
}

/// NaN-aware minimum and maximum
pub(crate) fn nan_bounds<'a>(values: impl IntoIterator<Item = &'a f64>) -> Result<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return Err(RiskmapError::invalid("values", "All values are NaN"));
    }
    Ok((lo, hi))
}

/// The norm override, or a linear norm over the data bounds
pub(crate) fn resolve_norm(values: &ArrayView2<f64>, opts: &PlotOptions) -> Result<Norm> {
    if let Some(norm) = opts.norm {
        return Ok(norm);
    }
    let (lo, hi) = match (opts.vmin, opts.vmax) {
        (Some(lo), Some(hi)) => (lo, hi),
        (vmin, vmax) => {
            let (lo, hi) = nan_bounds(values.iter())?;
            (vmin.unwrap_or(lo), vmax.unwrap_or(hi))
        }
    };
    Norm::linear(lo, hi)
}

/// Plate Carrée is shown centered on the data; other projections are kept
pub(crate) fn display_projection(proj: Option<&Projection>, center_lon: f64) -> Projection {
    match proj {
        Some(proj) if !proj.is_plate_carree() => proj.clone(),
        _ => Projection::plate_carree_centered(center_lon),
    }
}

/// The figure passed in the options, or a new one with `num_im` panels
pub(crate) fn prepare_figure(
    num_im: usize,
    projection: &Projection,
    opts: &mut PlotOptions,
) -> Result<Figure> {
    match opts.axes.take() {
        Some(figure) if figure.axes().len() < num_im => Err(RiskmapError::invalid(
            "axes",
            format!(
                "Figure has {} axes but {} panels are plotted",
                figure.axes().len(),
                num_im
            ),
        )),
        Some(figure) => Ok(figure),
        None => Ok(make_map(num_im, opts.figsize, projection)?.with_dpi(opts.dpi)),
    }
}

/// Warn about requested overlays that cannot be drawn because no
/// shapefiles were loaded
pub(crate) fn warn_missing_overlays(opts: &PlotOptions) {
    let Some(overlays) = opts.overlays.as_deref() else {
        if opts.shapes || opts.pop_name {
            warn!(
                shapes = opts.shapes,
                pop_name = opts.pop_name,
                "No overlays loaded; boundaries and place names are not drawn"
            );
        }
        return;
    };
    if opts.shapes && overlays.borders.is_empty() {
        warn!("No boundary shapes loaded; boundaries are not drawn");
    }
    if opts.pop_name && overlays.places.is_empty() {
        warn!("No populated places loaded; place names are not drawn");
    }
}

/// Draw the requested overlays on one panel
pub(crate) fn add_overlays(axes: &mut Axes, opts: &PlotOptions, extent: &Extent) -> Result<()> {
    let Some(overlays) = opts.overlays.as_deref() else {
        return Ok(());
    };
    if opts.shapes && !overlays.borders.is_empty() {
        add_shapes(axes, overlays)?;
    }
    if opts.pop_name && !overlays.places.is_empty() {
        add_populated_places(axes, overlays, extent)?;
    }
    Ok(())
}

/// Scatter or hexbin panels sharing one color scale
pub(crate) fn plot_scattered_data(
    kind: ScatterKind,
    values: ArrayView2<f64>,
    coords: ArrayView2<f64>,
    var_name: Labels,
    title: Labels,
    default_cmap: &str,
    mut opts: PlotOptions,
) -> Result<Figure> {
    let n = check_sizes(&values, &coords)?;
    let num_im = values.nrows();
    let names = var_name.expand(num_im, "var_name")?;
    let titles = title.expand(num_im, "title")?;

    let extent = geographic_extent(&coords, opts.buffer);
    let projection = display_projection(opts.proj.as_ref(), extent.mid_lon());
    let norm = resolve_norm(&values, &opts)?;
    let cmap = opts.colormap(default_cmap)?;
    let gridsize = opts
        .gridsize
        .unwrap_or_else(|| (n / 2).min(opts.max_bins))
        .max(1);

    debug!(
        panels = num_im,
        points = n,
        projection = %projection,
        cmap = cmap.name(),
        "Plotting scattered data"
    );

    let mut figure = prepare_figure(num_im, &projection, &mut opts)?;
    warn_missing_overlays(&opts);
    for (i, axes) in figure.axes_mut().iter_mut().take(num_im).enumerate() {
        axes.set_extent(extent)?;
        let transformer = axes.projection().transformer()?;
        let points: Vec<Option<(f64, f64)>> = coords
            .rows()
            .into_iter()
            .map(|row| transformer.project(row[1], row[0]))
            .collect();
        let row = values.row(i);

        let (geometry, panel_values) = match kind {
            ScatterKind::Points => {
                let (offsets, panel_values): (Vec<_>, Vec<_>) = points
                    .iter()
                    .zip(row.iter())
                    .filter_map(|(p, &v)| p.map(|p| (p, v)))
                    .unzip();
                let geometry = CollectionKind::Scatter {
                    offsets,
                    marker_size: DEFAULT_MARKER_SIZE,
                };
                (geometry, panel_values)
            }
            ScatterKind::HexBin => {
                let row: Vec<f64> = row.to_vec();
                let (polygons, means) = bin::hexbin(&points, &row, gridsize);
                (CollectionKind::HexBin { polygons }, means)
            }
        };

        let collection =
            axes.add_collection(Collection::new(geometry, panel_values, cmap.clone(), norm)?);
        collection.add_colorbar(&names[i], opts.extend);

        add_overlays(axes, &opts, &extent)?;
        axes.set_title(&titles[i]);
    }

    Ok(figure)
}
