//! Integration tests for the plotting functions.
//!
//! Each test draws a map from synthetic data and inspects the returned
//! figure: titles, colorbar bounds, colormap names and norms.

mod common;

use common::assertions::{assert_colorbar_bounds, assert_continuous_map, colorbar};
use common::image_utils::{count_non_background, detect_image_format, has_distinct_colors, load_image};
use common::test_data::{
    categorical_coords, categories, dateline_coords, dateline_overlays, return_periods,
    sixteen_categories, spread_coords, threshold_titles,
};
use image::{GenericImageView, ImageFormat, Rgba};
use ndarray::{array, Array2};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use tempfile::TempDir;

use riskmap::colormaps::qualitative;
use riskmap::figure::CollectionKind;
use riskmap::{
    geo_bin_from_array, geo_im_from_array, geo_scatter_categorical, geo_scatter_from_array,
    get_transformation, plot_from_gdf, Category, Extend, PlotOptions, Projection, RiskmapError,
};

#[test]
fn test_get_transform_4326() {
    let (projection, unit) = get_transformation("epsg:4326").unwrap();
    assert!(projection.is_plate_carree());
    assert_eq!(unit, "°");
}

#[test]
fn test_get_transform_3395() {
    let (projection, unit) = get_transformation("epsg:3395").unwrap();
    assert_eq!(projection, Projection::Mercator);
    assert_eq!(unit, "m");
}

#[test]
fn test_get_transform_3035() {
    let (projection, unit) = get_transformation("epsg:3035").unwrap();
    assert_eq!(projection.epsg_code(), Some(3035));
    assert_eq!(unit, "m");
}

#[test]
fn test_geo_scatter_categorical_mixed_values() {
    let values = categories(vec![vec![
        Category::from(1),
        Category::from(2.0),
        Category::from(1),
        Category::from("a"),
    ]]);
    let opts = PlotOptions::default().with_pop_name(true);

    let figure = geo_scatter_categorical(
        values.view(),
        categorical_coords().view(),
        "value",
        "test plot",
        opts,
    )
    .unwrap();

    assert_eq!(figure.axes().len(), 1);
    let colorbar = colorbar(&figure.axes()[0]);
    assert_eq!(colorbar.ticks().unwrap().len(), 3);
    assert_eq!(colorbar.label(), "value");
}

#[test]
fn test_geo_scatter_categorical_named_categories() {
    let values = categories(vec![
        vec![
            Category::from(1),
            Category::from(2.0),
            Category::from(1),
            Category::from("a"),
        ],
        vec![Category::from(0); 4],
    ]);
    let cat_name: HashMap<Category, String> = [
        (Category::from(0), "zero"),
        (Category::from(1), "int"),
        (Category::from(2.0), "float"),
        (Category::from("a"), "string"),
    ]
    .into_iter()
    .map(|(k, v)| (k, v.to_string()))
    .collect();
    let opts = PlotOptions {
        cat_name,
        pop_name: false,
        ..PlotOptions::default().with_cmap(qualitative::lookup("Set1").unwrap())
    };

    let figure = geo_scatter_categorical(
        values.view(),
        categorical_coords().view(),
        "value",
        "test plot",
        opts,
    )
    .unwrap();

    assert_eq!(figure.grid(), (1, 2));
    for axes in figure.axes() {
        let colorbar = colorbar(axes);
        assert_eq!(
            colorbar.tick_labels().unwrap().to_vec(),
            vec!["zero", "int", "float", "string"]
        );
        assert_eq!(colorbar.cmap_name(), "Set1");
        assert_eq!((colorbar.vmin(), colorbar.vmax()), (-0.5, 3.5));
    }
}

#[test]
fn test_geo_scatter_categorical_continuous_colormap() {
    let coords = array![[26.0, 0.0], [26.0, 4.0], [28.0, 0.0], [29.0, 1.0]];
    let opts = PlotOptions::default().with_cmap("viridis");

    let figure = geo_scatter_categorical(
        sixteen_categories().view(),
        coords.view(),
        "value",
        "test plot",
        opts,
    )
    .unwrap();

    assert_eq!(figure.grid(), (2, 2));
    let collection = &figure.axes()[0].collections()[0];
    assert_eq!(collection.cmap().n_colors(), 16);
    assert_eq!(collection.cmap().name(), "viridis");
}

#[test]
fn test_geo_scatter_categorical_tab20c() {
    let opts = PlotOptions::default().with_cmap("tab20c");

    let figure = geo_scatter_categorical(
        sixteen_categories().view(),
        categorical_coords().view(),
        "value",
        "test plot",
        opts,
    )
    .unwrap();

    let cmap = figure.axes()[3].collections()[0].cmap();
    assert_eq!(cmap.n_colors(), 16);
    let mut colors: Vec<[u8; 4]> = (0..16)
        .map(|i| cmap.map_normalized((i as f32 + 0.5) / 16.0))
        .collect();
    colors.sort_unstable();
    colors.dedup();
    assert_eq!(colors.len(), 16);
}

#[test]
fn test_geo_scatter_from_array() {
    let values = array![[1.0, 2.0, 1.0, 1.0]];
    let opts = PlotOptions::default()
        .with_pop_name(true)
        .with_extend(Extend::Neither)
        .with_shapes(true)
        .with_proj(Projection::plate_carree())
        .with_figsize((9.0, 13.0))
        .with_cmap("viridis")
        .with_overlays(dateline_overlays());

    let figure =
        geo_scatter_from_array(values.view(), dateline_coords().view(), "test", "test", opts)
            .unwrap();

    let axes = &figure.axes()[0];
    assert_continuous_map(axes, "test", 1.0, 2.0, "viridis");
    assert!(axes.has_shapes());
    // The coastline crosses 180° but stays one line on the re-centered map
    assert_eq!(axes.shape_lines().len(), 1);
    assert_eq!(axes.annotations()[0].text, "Labasa");
}

#[test]
fn test_overlays_not_drawn_without_shapefiles() {
    let values = array![[1.0, 2.0, 1.0, 1.0]];
    let opts = PlotOptions::default().with_pop_name(true).with_shapes(true);

    let figure =
        geo_scatter_from_array(values.view(), dateline_coords().view(), "test", "test", opts)
            .unwrap();

    let axes = &figure.axes()[0];
    assert!(!axes.has_shapes());
    assert!(axes.shape_lines().is_empty());
    assert!(axes.annotations().is_empty());
}

#[test]
fn test_geo_im_from_array_global_grid() {
    let mut rows = Vec::new();
    for lat in (-80..=80).step_by(20) {
        for lon in (-180..180).step_by(10) {
            rows.extend([lat as f64, lon as f64]);
        }
    }
    let coords = Array2::from_shape_vec((rows.len() / 2, 2), rows).unwrap();
    let values = Array2::from_shape_fn((1, coords.nrows()), |(_, j)| 1.0 + (j % 5) as f64);
    let opts = PlotOptions::default().with_smooth(false).with_cmap("viridis");

    let figure = geo_im_from_array(values.view(), coords.view(), "test", "test", opts).unwrap();

    let axes = &figure.axes()[0];
    assert_continuous_map(axes, "test", 1.0, 5.0, "viridis");
    let CollectionKind::Mesh { polygons } = axes.collections()[0].kind() else {
        panic!("expected a mesh");
    };
    for cell in polygons {
        let xs = cell.iter().map(|p| p.0);
        let width = xs.clone().fold(f64::NEG_INFINITY, f64::max) - xs.fold(f64::INFINITY, f64::min);
        assert!(width <= 10.0 + 1e-9, "cell spans {} degrees", width);
    }
}

#[test]
fn test_geo_bin_from_array() {
    let values = array![[1.0, 2.0, 5.0, 1.0]];
    let opts = PlotOptions::default()
        .with_pop_name(true)
        .with_extend(Extend::Neither)
        .with_shapes(true)
        .with_proj(Projection::plate_carree())
        .with_figsize((9.0, 13.0))
        .with_cmap("viridis");

    let figure =
        geo_bin_from_array(values.view(), spread_coords().view(), "test", "test", opts).unwrap();

    assert_continuous_map(&figure.axes()[0], "test", 1.0, 5.0, "viridis");
}

#[test]
fn test_geo_im_from_array() {
    let values = array![[1.0, 2.0, 5.0, f64::NAN]];
    let opts = PlotOptions::default()
        .with_proj(Projection::plate_carree())
        .with_smooth(true)
        .with_figsize((9.0, 13.0))
        .with_cmap("viridis");

    let figure =
        geo_im_from_array(values.view(), dateline_coords().view(), "test", "test", opts).unwrap();

    assert_continuous_map(&figure.axes()[0], "test", 1.0, 5.0, "viridis");
}

#[test]
fn test_geo_im_from_array_azimuthal_equidistant() {
    let values = array![[1.0, 2.0, 5.0, f64::NAN]];
    let opts = PlotOptions::default()
        .with_proj(Projection::azimuthal_equidistant())
        .with_smooth(true)
        .with_figsize((9.0, 13.0))
        .with_cmap("viridis");

    let figure =
        geo_im_from_array(values.view(), dateline_coords().view(), "test", "test", opts).unwrap();

    let axes = &figure.axes()[0];
    assert_continuous_map(axes, "test", 1.0, 5.0, "viridis");
    assert_eq!(axes.unit(), "m");
}

#[test]
fn test_plot_from_gdf_no_log() {
    let gdf = return_periods(0.0);

    let figure = plot_from_gdf(
        &gdf,
        "Return Periods (Years)",
        Some(&threshold_titles),
        PlotOptions::default(),
    )
    .unwrap();

    let [axis1, axis2] = figure.axes() else {
        panic!("expected two panels, got {}", figure.axes().len());
    };
    assert_eq!(axis1.title(), "Threshold Intensity: 10.0 m/s");
    assert_eq!(axis2.title(), "Threshold Intensity: 20.0 m/s");
    assert!(!colorbar(axis1).norm().is_log());
    assert_colorbar_bounds(axis2, 0.0, 1000.0);
}

#[test]
fn test_plot_from_gdf_log() {
    let gdf = return_periods(3.0);

    let figure = plot_from_gdf(
        &gdf,
        "Return Periods (Years)",
        Some(&threshold_titles),
        PlotOptions::default(),
    )
    .unwrap();

    let [axis1, axis2] = figure.axes() else {
        panic!("expected two panels, got {}", figure.axes().len());
    };
    assert_eq!(axis1.title(), "Threshold Intensity: 10.0 m/s");
    assert_eq!(axis2.title(), "Threshold Intensity: 20.0 m/s");
    assert!(colorbar(axis2).norm().is_log());
    assert_eq!(colorbar(axis1).label(), "Return Periods (Years)");
    assert_colorbar_bounds(axis1, 1.0, 1000.0);
}

#[test]
fn test_size_mismatch_is_error() {
    let values = array![[1.0, 2.0, 3.0]];
    let result = geo_scatter_from_array(
        values.view(),
        dateline_coords().view(),
        "test",
        "test",
        PlotOptions::default(),
    );
    assert!(matches!(
        result,
        Err(RiskmapError::ShapeMismatch {
            expected: 4,
            actual: 3
        })
    ));
}

#[test]
fn test_reuse_figure() {
    let values = array![[1.0, 2.0, 1.0, 1.0]];
    let first = geo_scatter_from_array(
        values.view(),
        dateline_coords().view(),
        "first",
        "first",
        PlotOptions::default(),
    )
    .unwrap();

    let second = geo_scatter_from_array(
        values.view(),
        dateline_coords().view(),
        "second",
        "second",
        PlotOptions::default().with_axes(first),
    )
    .unwrap();

    let axes = &second.axes()[0];
    assert_eq!(axes.title(), "second");
    assert_eq!(axes.collections().len(), 2);
}

#[test]
fn test_save_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map.png");
    let values = array![[1.0, 2.0, 5.0, 1.0]];

    let figure = geo_scatter_from_array(
        values.view(),
        spread_coords().view(),
        "test",
        "test",
        PlotOptions::default().with_cmap("viridis"),
    )
    .unwrap();
    figure.save(&path).unwrap();

    assert_eq!(detect_image_format(&path), Some(ImageFormat::Png));
    let image = load_image(&path).unwrap();
    assert_eq!(image.dimensions(), (900, 1300));
    assert!(count_non_background(&image, Rgba([255, 255, 255, 255])) > 0);
    assert!(has_distinct_colors(&image, 3));
}

#[test]
fn test_save_unknown_extension_is_error() {
    let dir = TempDir::new().unwrap();
    let values = array![[1.0, 2.0, 5.0, 1.0]];
    let figure = geo_bin_from_array(
        values.view(),
        spread_coords().view(),
        "test",
        "test",
        PlotOptions::default(),
    )
    .unwrap();

    assert!(figure.save(&dir.path().join("map.tiff")).is_err());
}
