//! riskmap - Geospatial plotting of climate-risk values
//!
//! This is the command-line entry point: it reads a JSON plot request,
//! draws the requested map and writes it as an image.

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use riskmap::config::{Args, PlotKind};
use riskmap::logging::{log_operation_end, log_operation_start};
use riskmap::{
    geo_bin_from_array, geo_im_from_array, geo_scatter_categorical, geo_scatter_from_array,
    get_transformation, init_tracing, Category, Config, Figure, Overlays, PlotOptions,
};

/// Values, coordinates and labels of one map
#[derive(Debug, Deserialize)]
struct PlotRequest {
    /// One row per panel; `null` marks a missing value
    values: Vec<Vec<Option<Category>>>,
    /// `[lat, lon]` per point
    coords: Vec<[f64; 2]>,
    var_name: String,
    title: String,
    /// Display names of categories, keyed by the category as text
    #[serde(default)]
    cat_name: HashMap<String, String>,
}

impl PlotRequest {
    fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plot request: {}", path.display()))?;
        let request: PlotRequest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid plot request: {}", path.display()))?;
        Ok(request)
    }

    fn shape(&self) -> Result<(usize, usize)> {
        let rows = self.values.len();
        let cols = self.values.first().map_or(0, Vec::len);
        if self.values.iter().any(|row| row.len() != cols) {
            bail!("All value rows must have the same length");
        }
        Ok((rows, cols))
    }

    fn coords(&self) -> Result<Array2<f64>> {
        let flat = self.coords.iter().flatten().copied().collect();
        Ok(Array2::from_shape_vec((self.coords.len(), 2), flat)?)
    }

    fn numeric_values(&self) -> Result<Array2<f64>> {
        let flat = self
            .values
            .iter()
            .flatten()
            .map(|value| match value {
                None => Ok(f64::NAN),
                Some(category) => category
                    .as_number()
                    .with_context(|| format!("Non-numeric value: {}", category)),
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(Array2::from_shape_vec(self.shape()?, flat)?)
    }

    fn category_values(&self) -> Result<Array2<Category>> {
        let flat = self
            .values
            .iter()
            .flatten()
            .map(|value| value.clone().context("Categorical maps cannot have missing values"))
            .collect::<Result<Vec<Category>>>()?;
        Ok(Array2::from_shape_vec(self.shape()?, flat)?)
    }

    fn category_names(&self) -> HashMap<Category, String> {
        self.cat_name
            .iter()
            .map(|(key, name)| {
                let category = match (key.parse::<i64>(), key.parse::<f64>()) {
                    (Ok(integer), _) => Category::Integer(integer),
                    (_, Ok(number)) => Category::Number(number),
                    _ => Category::Text(key.clone()),
                };
                (category, name.clone())
            })
            .collect()
    }
}

fn build_options(config: &Config, args: &Args) -> Result<PlotOptions> {
    let (projection, unit) = get_transformation(&args.crs)?;
    info!(crs = %args.crs, projection = %projection, unit = unit, "Using projection");

    let mut opts = PlotOptions::from_config(&config.plot)
        .with_proj(projection)
        .with_smooth(!args.no_smooth);

    let cmap = match args.kind {
        PlotKind::Categorical => args.cmap.clone().unwrap_or(config.plot.cat_cmap.clone()),
        _ => config.plot.cmap.clone(),
    };
    opts = opts.with_cmap(cmap);

    let overlays = Overlays::from_config(&config.overlays)?;
    if !overlays.is_empty() {
        opts = opts
            .with_pop_name(!overlays.places.is_empty())
            .with_overlays(Arc::new(overlays));
    }
    Ok(opts)
}

fn draw(args: &Args, request: &PlotRequest, opts: PlotOptions) -> Result<Figure> {
    let coords = request.coords()?;
    let (var_name, title) = (request.var_name.as_str(), request.title.as_str());

    let figure = match args.kind {
        PlotKind::Scatter => {
            let values = request.numeric_values()?;
            geo_scatter_from_array(values.view(), coords.view(), var_name, title, opts)?
        }
        PlotKind::Bin => {
            let values = request.numeric_values()?;
            geo_bin_from_array(values.view(), coords.view(), var_name, title, opts)?
        }
        PlotKind::Image => {
            let values = request.numeric_values()?;
            geo_im_from_array(values.view(), coords.view(), var_name, title, opts)?
        }
        PlotKind::Categorical => {
            let values = request.category_values()?;
            let mut opts = opts;
            opts.cat_name = request.category_names();
            geo_scatter_categorical(values.view(), coords.view(), var_name, title, opts)?
        }
    };
    Ok(figure)
}

fn main() -> Result<()> {
    let (config, args) = Config::load()?;
    init_tracing(&config.log_level);

    info!("Starting riskmap v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let request = PlotRequest::from_path(&args.input)?;
    let opts = build_options(&config, &args)?;

    let start = Instant::now();
    let kind = format!("{:?}", args.kind).to_lowercase();
    log_operation_start("draw_map", Some(&kind));

    let result = draw(&args, &request, opts).and_then(|figure| {
        figure
            .save(&args.output)
            .with_context(|| format!("Failed to write {}", args.output.display()))
    });
    log_operation_end("draw_map", start, result.is_ok());
    result?;

    info!(output = %args.output.display(), "Map written");
    Ok(())
}
