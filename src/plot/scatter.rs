//! Scatter maps with a continuous color scale.

use ndarray::ArrayView2;

use super::{plot_scattered_data, Labels, PlotOptions, ScatterKind};
use crate::config::DEFAULT_CMAP;
use crate::error::Result;
use crate::figure::Figure;
use crate::logging::{log_error, log_timed_operation};

/// Plot values as colored markers, one panel per row of `values`.
///
/// `coords` holds one `[lat, lon]` row per column of `values`. The colorbar
/// is labelled with `var_name` and spans the NaN-aware data range unless
/// `vmin`, `vmax` or `norm` are given.
pub fn geo_scatter_from_array(
    values: ArrayView2<f64>,
    coords: ArrayView2<f64>,
    var_name: impl Into<Labels>,
    title: impl Into<Labels>,
    opts: PlotOptions,
) -> Result<Figure> {
    let (var_name, title) = (var_name.into(), title.into());
    log_timed_operation("geo_scatter_from_array", || {
        plot_scattered_data(
            ScatterKind::Points,
            values,
            coords,
            var_name,
            title,
            DEFAULT_CMAP,
            opts,
        )
    })
    .inspect_err(|e| log_error(e, "geo_scatter_from_array"))
}
