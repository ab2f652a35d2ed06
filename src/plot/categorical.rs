//! Scatter maps of categorical values.

use ndarray::ArrayView2;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::{check_sizes, plot_scattered_data, CmapSpec, Labels, PlotOptions, ScatterKind};
use crate::category::Category;
use crate::colormaps::{Colormap, ListedColormap};
use crate::config::DEFAULT_CAT_CMAP;
use crate::error::Result;
use crate::figure::{Figure, Norm};
use crate::logging::{log_error, log_timed_operation};

/// Plot categorical values as colored markers, one panel per row.
///
/// The distinct categories of the whole array, in sorted order, get one
/// color each and one colorbar tick each. Tick labels are taken from
/// `cat_name`, falling back to the category itself. A qualitative colormap
/// contributes its first colors, a continuous one is resampled.
pub fn geo_scatter_categorical(
    values: ArrayView2<Category>,
    coords: ArrayView2<f64>,
    var_name: impl Into<Labels>,
    title: impl Into<Labels>,
    opts: PlotOptions,
) -> Result<Figure> {
    let (var_name, title) = (var_name.into(), title.into());
    log_timed_operation("geo_scatter_categorical", || {
        plot_categories(values, coords, var_name, title, opts)
    })
    .inspect_err(|e| log_error(e, "geo_scatter_categorical"))
}

/// Colormap with one color per category
fn categorical_colormap(cmap: &dyn Colormap, n_categories: usize) -> ListedColormap {
    if cmap.n_colors() < n_categories {
        warn!(
            cmap = cmap.name(),
            n_colors = cmap.n_colors(),
            categories = n_categories,
            "Colormap has fewer colors than categories; colors will repeat"
        );
    }

    if cmap.is_qualitative() {
        ListedColormap::resampled(cmap, cmap.n_colors()).truncated(n_categories)
    } else {
        ListedColormap::resampled(cmap, n_categories)
    }
}

fn plot_categories(
    values: ArrayView2<Category>,
    coords: ArrayView2<f64>,
    var_name: Labels,
    title: Labels,
    mut opts: PlotOptions,
) -> Result<Figure> {
    check_sizes(&values, &coords)?;

    let categories: Vec<Category> = values
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let n = categories.len();
    let indices = values.map(|c| {
        categories
            .binary_search(c)
            .map_or(f64::NAN, |i| i as f64)
    });

    let base = opts.colormap(DEFAULT_CAT_CMAP)?;
    let cmap = categorical_colormap(base.as_ref(), n);
    debug!(categories = n, cmap = cmap.name(), "Plotting categorical data");

    let tick_labels: Vec<String> = categories
        .iter()
        .map(|c| opts.cat_name.get(c).cloned().unwrap_or_else(|| c.to_string()))
        .collect();
    let ticks: Vec<f64> = (0..n).map(|i| i as f64).collect();

    opts.cmap = Some(CmapSpec::Listed(cmap));
    opts.norm = Some(Norm::linear(-0.5, n as f64 - 0.5)?);

    let num_im = values.nrows();
    let mut figure = plot_scattered_data(
        ScatterKind::Points,
        indices.view(),
        coords,
        var_name,
        title,
        DEFAULT_CAT_CMAP,
        opts,
    )?;
    for axes in figure.axes_mut().iter_mut().take(num_im) {
        if let Some(colorbar) = axes.colorbar_mut() {
            colorbar.set_ticks(ticks.clone(), tick_labels.clone())?;
        }
    }
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::get_colormap;
    use ndarray::{array, Array2};

    fn coords() -> Array2<f64> {
        array![[26.0, 0.0], [26.0, 1.0], [28.0, 0.0], [29.0, 1.0]]
    }

    #[test]
    fn test_mixed_categories() {
        let values = Array2::from_shape_vec(
            (1, 4),
            vec![
                Category::from(1),
                Category::from(2.0),
                Category::from(1),
                Category::from("a"),
            ],
        )
        .unwrap();
        let figure = geo_scatter_categorical(
            values.view(),
            coords().view(),
            "value",
            "test plot",
            PlotOptions::default().with_pop_name(true),
        )
        .unwrap();

        let colorbar = figure.axes()[0].colorbar().unwrap();
        assert_eq!(colorbar.ticks().unwrap(), &[0.0, 1.0, 2.0]);
        assert_eq!(colorbar.tick_labels().unwrap(), &["1", "2.0", "a"]);
        assert_eq!((colorbar.vmin(), colorbar.vmax()), (-0.5, 2.5));
        assert_eq!(colorbar.cmap_name(), "Dark2");
        assert_eq!(figure.axes()[0].collections()[0].values(), &[0.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_qualitative_takes_first_colors() {
        let set1 = get_colormap("Set1").unwrap();
        let cmap = categorical_colormap(set1.as_ref(), 3);
        assert_eq!(cmap.n_colors(), 3);
        assert_eq!(cmap.colors()[0], set1.map_normalized(0.0));
        assert_eq!(cmap.colors()[2], set1.map_normalized(2.5 / 9.0));
    }

    #[test]
    fn test_continuous_is_resampled() {
        let viridis = get_colormap("viridis").unwrap();
        let cmap = categorical_colormap(viridis.as_ref(), 16);
        assert_eq!(cmap.n_colors(), 16);
        assert_eq!(cmap.name(), "viridis");
        assert_eq!(cmap.colors()[0], viridis.map_normalized(0.0));
        assert_eq!(cmap.colors()[15], viridis.map_normalized(1.0));
    }

    #[test]
    fn test_short_colormap_still_renders() {
        let dark2 = get_colormap("Dark2").unwrap();
        let cmap = categorical_colormap(dark2.as_ref(), 16);
        assert_eq!(cmap.n_colors(), 8);
    }
}
