//! # riskmap
//!
//! Geospatial plotting of climate-risk values.
//!
//! This library draws values attached to latitude/longitude points onto
//! map figures: scatter maps, hexagonally binned maps, interpolated raster
//! maps, categorical maps and multi-panel return-period maps built from a
//! geo-table.
//!
//! ## Key Features
//!
//! - **Inspectable figures**: every plot returns a [`Figure`] whose axes carry
//!   title, projection, extent, collections and colorbars
//! - **Dateline aware extents**: data crossing the 180° meridian is shown in
//!   one piece on a re-centered Plate Carrée map
//! - **EPSG projections**: lon/lat data can be displayed in projected systems
//!   through `proj4rs`
//! - **Raster output**: figures render to PNG or JPEG
//!
//! ## Architecture
//!
//! - **Plot Layer**: free functions turning arrays into figures
//! - **Figure Model**: axes, collections, norms and colorbars
//! - **Support**: projections, extents, interpolation, colormaps and
//!   shapefile overlays

pub mod category;
pub mod colormaps;
pub mod config;
pub mod error;
pub mod figure;
pub mod geoframe;
pub mod geoutil;
pub mod interpolation;
pub mod logging;
pub mod overlay;
pub mod plot;
pub mod transformation;

pub use category::Category;
pub use config::Config;
pub use error::{Result, RiskmapError};
pub use figure::{make_map, Axes, Colorbar, Extend, Figure, Norm};
pub use geoframe::GeoDataFrame;
pub use logging::{
    generate_plot_id, init_tracing, log_error, log_operation_end, log_operation_start,
    log_timed_operation,
};
pub use overlay::Overlays;
pub use plot::{
    geo_bin_from_array, geo_im_from_array, geo_scatter_categorical, geo_scatter_from_array,
    plot_from_gdf, CmapSpec, PlotOptions,
};
pub use transformation::{get_transformation, Projection};
