//! Raster maps of scattered values.
//!
//! Values are interpolated onto a regular lon/lat mesh spanning the data
//! borders and drawn as quadrilateral cells. Data already on a regular grid
//! can be drawn on its own grid when smoothing is off.

use ndarray::{Array2, ArrayView1, ArrayView2};
use tracing::debug;

use super::{
    add_overlays, check_sizes, display_projection, prepare_figure, resolve_norm,
    warn_missing_overlays, Labels, PlotOptions,
};
use crate::config::DEFAULT_CMAP;
use crate::error::{Result, RiskmapError};
use crate::figure::{Collection, CollectionKind, Figure, Limits};
use crate::geoutil::{get_borders, grid_is_regular, Extent};
use crate::interpolation::{get_interpolator, Sample};
use crate::logging::{log_error, log_timed_operation};
use crate::transformation::Transformer;

/// Clipping limits of raster maps; longitudes may run past the dateline
const IMAGE_LIMITS: Extent = Extent {
    min_lon: -360.0,
    max_lon: 360.0,
    min_lat: -90.0,
    max_lat: 90.0,
};

/// Interpolation method of the smoothed mesh
const MESH_INTERPOLATION: &str = "idw";

/// Cell centers of a lon/lat mesh and the value of every cell
struct Mesh {
    lats: Vec<f64>,
    lons: Vec<f64>,
    grid: Array2<f64>,
}

impl Mesh {
    /// Interpolate the values onto `resolution x resolution` nodes over `extent`
    fn interpolated(
        coords: &ArrayView2<f64>,
        values: ArrayView1<f64>,
        extent: &Extent,
        resolution: usize,
    ) -> Result<Self> {
        let samples: Vec<Sample> = coords
            .rows()
            .into_iter()
            .zip(values.iter())
            .map(|(row, &v)| Sample::new(row[1], row[0], v))
            .collect();
        let interpolator = get_interpolator(MESH_INTERPOLATION, &samples)?;

        let lons = linspace(extent.min_lon, extent.max_lon, resolution);
        let lats = linspace(extent.min_lat, extent.max_lat, resolution);
        let grid = Array2::from_shape_fn((lats.len(), lons.len()), |(i, j)| {
            interpolator
                .interpolate(lons[j], lats[i])
                .unwrap_or(f64::NAN)
        });
        Ok(Self { lats, lons, grid })
    }

    /// Place the values on the grid formed by their own coordinates
    fn regular(coords: &ArrayView2<f64>, values: ArrayView1<f64>) -> Self {
        let lats = sorted_unique(coords.column(0));
        let lons = sorted_unique(coords.column(1));
        let mut grid = Array2::from_elem((lats.len(), lons.len()), f64::NAN);
        for (row, &v) in coords.rows().into_iter().zip(values.iter()) {
            let i = lats.binary_search_by(|x| x.total_cmp(&row[0]));
            let j = lons.binary_search_by(|x| x.total_cmp(&row[1]));
            if let (Ok(i), Ok(j)) = (i, j) {
                grid[[i, j]] = v;
            }
        }
        Self { lats, lons, grid }
    }

    /// Project the cells with a value; cells with a corner outside the
    /// projection are dropped. Cells cut by the map seam are unwrapped, and
    /// drawn on both sides of it when they stick out past the seam.
    fn cells(
        &self,
        transformer: &Transformer,
        limits: Option<Limits>,
    ) -> (Vec<Vec<(f64, f64)>>, Vec<f64>) {
        let lat_edges: Vec<f64> = cell_edges(&self.lats)
            .into_iter()
            .map(|lat| lat.clamp(-90.0, 90.0))
            .collect();
        let lon_edges = cell_edges(&self.lons);

        let mut polygons = Vec::new();
        let mut values = Vec::new();
        for ((i, j), &v) in self.grid.indexed_iter() {
            if !v.is_finite() {
                continue;
            }
            let corners = [
                (lon_edges[j], lat_edges[i]),
                (lon_edges[j + 1], lat_edges[i]),
                (lon_edges[j + 1], lat_edges[i + 1]),
                (lon_edges[j], lat_edges[i + 1]),
            ];
            let polygon: Option<Vec<(f64, f64)>> = corners
                .iter()
                .map(|&(lon, lat)| transformer.project(lon, lat))
                .collect();
            let Some(polygon) = polygon else {
                continue;
            };

            match transformer.x_period() {
                Some(period) => {
                    for piece in unwrap_cell(polygon, period) {
                        polygons.push(piece);
                        values.push(v);
                    }
                }
                None => {
                    let wraps = limits.is_some_and(|l| x_span(&polygon) > 0.5 * l.width());
                    if !wraps {
                        polygons.push(polygon);
                        values.push(v);
                    }
                }
            }
        }
        (polygons, values)
    }
}

fn x_span(polygon: &[(f64, f64)]) -> f64 {
    let (min, max) = polygon
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
    max - min
}

/// Move the corners of a cell onto the same side of the seam as its first
/// corner; a cell reaching past the seam gets a copy on the other side
fn unwrap_cell(mut polygon: Vec<(f64, f64)>, period: f64) -> Vec<Vec<(f64, f64)>> {
    let half = 0.5 * period;
    let x0 = polygon[0].0;
    for point in polygon.iter_mut().skip(1) {
        if point.0 - x0 > half {
            point.0 -= period;
        } else if x0 - point.0 > half {
            point.0 += period;
        }
    }

    let min = polygon.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max = polygon.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let shift = if max > half {
        -period
    } else if min < -half {
        period
    } else {
        return vec![polygon];
    };
    let copy = polygon.iter().map(|&(x, y)| (x + shift, y)).collect();
    vec![polygon, copy]
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.5 * (start + end)],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

fn sorted_unique(values: ArrayView1<f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}

/// Cell boundaries around sorted centers: midpoints inside, half a step
/// beyond the outer centers
fn cell_edges(centers: &[f64]) -> Vec<f64> {
    match centers {
        [] => Vec::new(),
        [c] => vec![c - 0.5, c + 0.5],
        _ => {
            let n = centers.len();
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(centers[0] - 0.5 * (centers[1] - centers[0]));
            edges.extend(centers.windows(2).map(|w| 0.5 * (w[0] + w[1])));
            edges.push(centers[n - 1] + 0.5 * (centers[n - 1] - centers[n - 2]));
            edges
        }
    }
}

/// Plot values as an interpolated raster, one panel per row of `values`.
///
/// The mesh spans the data borders without buffer. Cells outside the convex
/// hull of the points stay empty and NaN values are ignored. With
/// `smooth = false` and coordinates on a regular grid, the grid itself is
/// drawn. Without `proj`, the map is Plate Carrée centered on the data.
pub fn geo_im_from_array(
    values: ArrayView2<f64>,
    coords: ArrayView2<f64>,
    var_name: impl Into<Labels>,
    title: impl Into<Labels>,
    opts: PlotOptions,
) -> Result<Figure> {
    let (var_name, title) = (var_name.into(), title.into());
    log_timed_operation("geo_im_from_array", || {
        plot_image(values, coords, var_name, title, opts)
    })
    .inspect_err(|e| log_error(e, "geo_im_from_array"))
}

fn plot_image(
    values: ArrayView2<f64>,
    coords: ArrayView2<f64>,
    var_name: Labels,
    title: Labels,
    mut opts: PlotOptions,
) -> Result<Figure> {
    check_sizes(&values, &coords)?;
    let num_im = values.nrows();
    let names = var_name.expand(num_im, "var_name")?;
    let titles = title.expand(num_im, "title")?;
    if opts.resolution < 2 {
        return Err(RiskmapError::invalid(
            "resolution",
            format!("Mesh resolution must be at least 2, got {}", opts.resolution),
        ));
    }

    let extent = get_borders(&coords, 0.0, &IMAGE_LIMITS);
    let projection = display_projection(opts.proj.as_ref(), extent.mid_lon());
    let norm = resolve_norm(&values, &opts)?;
    let cmap = opts.colormap(DEFAULT_CMAP)?;
    let (is_regular, height, width) = grid_is_regular(&coords);
    let own_grid = is_regular && !opts.smooth;

    debug!(
        panels = num_im,
        regular = is_regular,
        height = height,
        width = width,
        own_grid = own_grid,
        projection = %projection,
        "Plotting raster data"
    );

    let mut figure = prepare_figure(num_im, &projection, &mut opts)?;
    warn_missing_overlays(&opts);
    for (i, axes) in figure.axes_mut().iter_mut().take(num_im).enumerate() {
        axes.set_extent(extent)?;
        let transformer = axes.projection().transformer()?;

        let mesh = if own_grid {
            Mesh::regular(&coords, values.row(i))
        } else {
            Mesh::interpolated(&coords, values.row(i), &extent, opts.resolution)?
        };
        let (polygons, cell_values) = mesh.cells(&transformer, axes.limits());

        let collection = axes.add_collection(Collection::new(
            CollectionKind::Mesh { polygons },
            cell_values,
            cmap.clone(),
            norm,
        )?);
        collection.add_colorbar(&names[i], opts.extend);

        add_overlays(axes, &opts, &extent)?;
        axes.set_title(&titles[i]);
    }

    Ok(figure)
}
