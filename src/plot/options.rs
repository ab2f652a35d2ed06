//! Keyword options shared by the plotting functions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::category::Category;
use crate::colormaps::{get_colormap, Colormap, ListedColormap};
use crate::config::{
    PlotConfig, DEFAULT_BUFFER, DEFAULT_FIGSIZE, DEFAULT_MAX_BINS, DEFAULT_RESOLUTION,
};
use crate::error::{Result, RiskmapError};
use crate::figure::{Extend, Figure, Norm, DEFAULT_DPI};
use crate::overlay::Overlays;
use crate::transformation::Projection;

/// Colormap requested by name or given directly
#[derive(Debug, Clone, PartialEq)]
pub enum CmapSpec {
    Name(String),
    Listed(ListedColormap),
}

impl CmapSpec {
    /// Resolve to a colormap instance
    pub fn resolve(&self) -> Result<Arc<dyn Colormap>> {
        match self {
            CmapSpec::Name(name) => get_colormap(name),
            CmapSpec::Listed(listed) => Ok(Arc::new(listed.clone())),
        }
    }
}

impl From<&str> for CmapSpec {
    fn from(name: &str) -> Self {
        CmapSpec::Name(name.to_string())
    }
}

impl From<String> for CmapSpec {
    fn from(name: String) -> Self {
        CmapSpec::Name(name)
    }
}

impl From<ListedColormap> for CmapSpec {
    fn from(listed: ListedColormap) -> Self {
        CmapSpec::Listed(listed)
    }
}

/// One label for every panel, or one per panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    /// Labels for `n` panels; a single label is repeated
    pub fn expand(&self, n: usize, param: &str) -> Result<Vec<String>> {
        match self.0.len() {
            1 => Ok(vec![self.0[0].clone(); n]),
            len if len == n => Ok(self.0.clone()),
            len => Err(RiskmapError::invalid(
                param,
                format!("Provide one {} or {}, got {}", param, n, len),
            )),
        }
    }
}

impl From<&str> for Labels {
    fn from(label: &str) -> Self {
        Labels(vec![label.to_string()])
    }
}

impl From<String> for Labels {
    fn from(label: String) -> Self {
        Labels(vec![label])
    }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self {
        Labels(labels)
    }
}

impl From<&[&str]> for Labels {
    fn from(labels: &[&str]) -> Self {
        Labels(labels.iter().map(|s| s.to_string()).collect())
    }
}

/// Options of the plotting functions
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Label populated places within the extent
    pub pop_name: bool,
    /// Display names of categories (categorical maps)
    pub cat_name: HashMap<Category, String>,
    /// Colormap; the continuous or categorical default when unset
    pub cmap: Option<CmapSpec>,
    /// Colorbar extensions
    pub extend: Extend,
    /// Draw administrative shapes
    pub shapes: bool,
    /// Existing figure to draw into
    pub axes: Option<Figure>,
    /// Display projection
    pub proj: Option<Projection>,
    /// Figure size in inches
    pub figsize: (f64, f64),
    /// Rendering resolution
    pub dpi: u32,
    /// Interpolate raster maps even when the data is a regular grid
    pub smooth: bool,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    /// Norm override; takes precedence over vmin/vmax
    pub norm: Option<Norm>,
    /// Number of hexagons in x (binned maps)
    pub gridsize: Option<usize>,
    /// Buffer in degrees around the data
    pub buffer: f64,
    /// Raster mesh resolution
    pub resolution: usize,
    /// Upper bound of the default grid size
    pub max_bins: usize,
    /// Shapes and places drawn over the map
    pub overlays: Option<Arc<Overlays>>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            pop_name: false,
            cat_name: HashMap::new(),
            cmap: None,
            extend: Extend::Neither,
            shapes: true,
            axes: None,
            proj: None,
            figsize: DEFAULT_FIGSIZE,
            dpi: DEFAULT_DPI,
            smooth: true,
            vmin: None,
            vmax: None,
            norm: None,
            gridsize: None,
            buffer: DEFAULT_BUFFER,
            resolution: DEFAULT_RESOLUTION,
            max_bins: DEFAULT_MAX_BINS,
            overlays: None,
        }
    }
}

impl PlotOptions {
    /// Options seeded from the plot configuration; the colormap is left to
    /// the caller since continuous and categorical maps differ
    pub fn from_config(config: &PlotConfig) -> Self {
        Self {
            figsize: config.figsize,
            dpi: config.dpi,
            buffer: config.buffer,
            resolution: config.resolution,
            max_bins: config.max_bins,
            ..Self::default()
        }
    }

    pub fn with_cmap(mut self, cmap: impl Into<CmapSpec>) -> Self {
        self.cmap = Some(cmap.into());
        self
    }

    pub fn with_proj(mut self, proj: Projection) -> Self {
        self.proj = Some(proj);
        self
    }

    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.extend = extend;
        self
    }

    pub fn with_figsize(mut self, figsize: (f64, f64)) -> Self {
        self.figsize = figsize;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_shapes(mut self, shapes: bool) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_pop_name(mut self, pop_name: bool) -> Self {
        self.pop_name = pop_name;
        self
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Name categories for the colorbar tick labels
    pub fn with_cat_name<K, V>(mut self, names: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Category>,
        V: Into<String>,
    {
        self.cat_name = names
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_limits(mut self, vmin: f64, vmax: f64) -> Self {
        self.vmin = Some(vmin);
        self.vmax = Some(vmax);
        self
    }

    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = Some(norm);
        self
    }

    pub fn with_gridsize(mut self, gridsize: usize) -> Self {
        self.gridsize = Some(gridsize);
        self
    }

    pub fn with_buffer(mut self, buffer: f64) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Draw into an existing figure
    pub fn with_axes(mut self, figure: Figure) -> Self {
        self.axes = Some(figure);
        self
    }

    pub fn with_overlays(mut self, overlays: Arc<Overlays>) -> Self {
        self.overlays = Some(overlays);
        self
    }

    /// Colormap to use, falling back to `default`
    pub(crate) fn colormap(&self, default: &str) -> Result<Arc<dyn Colormap>> {
        match &self.cmap {
            Some(spec) => spec.resolve(),
            None => get_colormap(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_expand() {
        let single = Labels::from("test");
        assert_eq!(single.expand(3, "title").unwrap(), vec!["test"; 3]);

        let many = Labels::from(&["a", "b"][..]);
        assert_eq!(many.expand(2, "title").unwrap(), vec!["a", "b"]);
        assert!(many.expand(3, "title").is_err());
    }

    #[test]
    fn test_default_options() {
        let opts = PlotOptions::default();
        assert!(opts.shapes);
        assert!(opts.smooth);
        assert!(!opts.pop_name);
        assert_eq!(opts.figsize, (9.0, 13.0));
        assert_eq!(opts.resolution, 250);
        assert_eq!(opts.max_bins, 2000);
    }

    #[test]
    fn test_colormap_fallback() {
        let opts = PlotOptions::default();
        assert_eq!(opts.colormap("YlOrRd").unwrap().name(), "YlOrRd");

        let opts = opts.with_cmap("viridis");
        assert_eq!(opts.colormap("YlOrRd").unwrap().name(), "viridis");

        let opts = PlotOptions::default().with_cmap("no_such_map");
        assert!(opts.colormap("YlOrRd").is_err());
    }

    #[test]
    fn test_cat_name_builder() {
        let opts = PlotOptions::default().with_cat_name([(0, "zero"), (1, "one")]);
        assert_eq!(opts.cat_name.get(&Category::from(0)).unwrap(), "zero");
        assert_eq!(opts.cat_name.get(&Category::from(1.0)).unwrap(), "one");
    }
}
