//! Multi-panel raster maps from a [`GeoDataFrame`].

use tracing::debug;

use super::{geo_im_from_array, nan_bounds, PlotOptions};
use crate::error::{Result, RiskmapError};
use crate::figure::{Figure, Norm};
use crate::geoframe::GeoDataFrame;
use crate::logging::{log_error, log_timed_operation};

/// Builds panel titles from the column names
pub type TitleFn<'a> = &'a dyn Fn(&[String]) -> Vec<String>;

/// Plot every numeric column of `gdf` as a raster panel.
///
/// Panel titles come from `title_subplots` applied to the column names, or
/// the names themselves. Unless a norm is given, the color scale is
/// logarithmic when all values are positive and linear otherwise. All
/// panels share the colorbar label `colorbar_name`.
pub fn plot_from_gdf(
    gdf: &GeoDataFrame,
    colorbar_name: &str,
    title_subplots: Option<TitleFn<'_>>,
    opts: PlotOptions,
) -> Result<Figure> {
    log_timed_operation("plot_from_gdf", || {
        plot_columns(gdf, colorbar_name, title_subplots, opts)
    })
    .inspect_err(|e| log_error(e, "plot_from_gdf"))
}

fn plot_columns(
    gdf: &GeoDataFrame,
    colorbar_name: &str,
    title_subplots: Option<TitleFn<'_>>,
    mut opts: PlotOptions,
) -> Result<Figure> {
    let coords = gdf.coords()?;
    let columns = gdf.column_names();
    if columns.is_empty() {
        return Err(RiskmapError::invalid("gdf", "GeoDataFrame has no value columns"));
    }
    let values = gdf.values_by_column();

    let titles = match title_subplots {
        Some(title_fn) => title_fn(&columns),
        None => columns.clone(),
    };

    if opts.norm.is_none() {
        let (vmin, vmax) = nan_bounds(values.iter())?;
        let (vmin, vmax) = (opts.vmin.unwrap_or(vmin), opts.vmax.unwrap_or(vmax));
        let non_positive = values.iter().any(|v| v.is_finite() && *v <= 0.0);
        let norm = if non_positive || vmin <= 0.0 {
            Norm::linear(vmin, vmax)?
        } else {
            Norm::log(vmin, vmax)?
        };
        debug!(log = norm.is_log(), vmin = vmin, vmax = vmax, "Chose color norm");
        opts.norm = Some(norm);
    }

    geo_im_from_array(values.view(), coords.view(), colorbar_name, titles, opts)
}
