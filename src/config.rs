//! Configuration management for riskmap.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RiskmapError};

/// Default figure size in inches (width, height)
pub const DEFAULT_FIGSIZE: (f64, f64) = (9.0, 13.0);

/// Default continuous colormap
pub const DEFAULT_CMAP: &str = "YlOrRd";

/// Default qualitative colormap for categorical maps
pub const DEFAULT_CAT_CMAP: &str = "Dark2";

/// Degrees added around the data when computing map extents
pub const DEFAULT_BUFFER: f64 = 1.0;

/// Grid points per axis when interpolating scattered data to a mesh
pub const DEFAULT_RESOLUTION: usize = 250;

/// Upper bound of the hexbin grid size
pub const DEFAULT_MAX_BINS: usize = 2000;

/// Kind of map rendered by the command-line tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// Continuous scatter plot
    Scatter,
    /// Hexagonally binned plot
    Bin,
    /// Interpolated raster plot
    Image,
    /// Categorical scatter plot
    Categorical,
}

/// Command-line arguments for riskmap
#[derive(Parser, Debug)]
#[command(name = "riskmap")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON plot request (values, coords, var_name, title)
    pub input: PathBuf,

    /// Kind of map to draw
    #[arg(short, long, value_enum, default_value = "scatter")]
    pub kind: PlotKind,

    /// Output image path (.png or .jpg)
    #[arg(short, long, default_value = "map.png")]
    pub output: PathBuf,

    /// Colormap name
    #[arg(long, env = "RISKMAP_CMAP")]
    pub cmap: Option<String>,

    /// Display projection as an EPSG code (e.g. epsg:3035)
    #[arg(long, env = "RISKMAP_CRS", default_value = "epsg:4326")]
    pub crs: String,

    /// Rendering resolution in dots per inch
    #[arg(long, env = "RISKMAP_DPI")]
    pub dpi: Option<u32>,

    /// Disable smoothing of raster plots
    #[arg(long)]
    pub no_smooth: bool,

    /// Path to JSON configuration file
    #[arg(short, long, env = "RISKMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RISKMAP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Plot defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Figure size in inches (width, height)
    #[serde(default = "default_figsize")]
    pub figsize: (f64, f64),

    /// Pixels per inch used when rasterising
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Continuous colormap used when none is requested
    #[serde(default = "default_cmap")]
    pub cmap: String,

    /// Qualitative colormap used by categorical maps
    #[serde(default = "default_cat_cmap")]
    pub cat_cmap: String,

    /// Buffer in degrees around the data extent
    #[serde(default = "default_buffer")]
    pub buffer: f64,

    /// Mesh resolution for raster plots
    #[serde(default = "default_resolution")]
    pub resolution: usize,

    /// Maximum hexbin grid size
    #[serde(default = "default_max_bins")]
    pub max_bins: usize,
}

/// Overlay sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Shapefile with administrative boundaries
    #[serde(default)]
    pub shapes_path: Option<PathBuf>,

    /// Point shapefile with populated places and a NAME attribute
    #[serde(default)]
    pub places_path: Option<PathBuf>,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Plot defaults
    #[serde(default)]
    pub plot: PlotConfig,

    /// Overlay configuration
    #[serde(default)]
    pub overlays: OverlayConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Args)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args))
    }

    /// Build the configuration from already parsed arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        if let Some(cmap) = &args.cmap {
            config.plot.cmap = cmap.clone();
        }
        if let Some(dpi) = args.dpi {
            config.plot.dpi = dpi;
        }
        config.log_level = args.log_level.clone();

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.plot = other.plot;
        if other.overlays.shapes_path.is_some() {
            self.overlays.shapes_path = other.overlays.shapes_path;
        }
        if other.overlays.places_path.is_some() {
            self.overlays.places_path = other.overlays.places_path;
        }
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.plot.figsize;
        if !(width > 0.0 && height > 0.0) {
            return Err(RiskmapError::Config {
                message: format!("Figure size must be positive, got {}x{}", width, height),
            });
        }

        if self.plot.dpi == 0 {
            return Err(RiskmapError::Config {
                message: "dpi cannot be 0".to_string(),
            });
        }

        if self.plot.resolution < 2 {
            return Err(RiskmapError::Config {
                message: format!(
                    "Raster resolution must be at least 2, got {}",
                    self.plot.resolution
                ),
            });
        }

        if self.plot.max_bins == 0 {
            return Err(RiskmapError::Config {
                message: "max_bins cannot be 0".to_string(),
            });
        }

        if !self.plot.buffer.is_finite() || self.plot.buffer < 0.0 {
            return Err(RiskmapError::Config {
                message: format!("Invalid buffer: {}", self.plot.buffer),
            });
        }

        crate::colormaps::get_colormap(&self.plot.cmap).map_err(|_| RiskmapError::Config {
            message: format!("Unknown colormap: {}", self.plot.cmap),
        })?;
        crate::colormaps::get_colormap(&self.plot.cat_cmap).map_err(|_| {
            RiskmapError::Config {
                message: format!("Unknown categorical colormap: {}", self.plot.cat_cmap),
            }
        })?;

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(RiskmapError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plot: PlotConfig::default(),
            overlays: OverlayConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            figsize: default_figsize(),
            dpi: default_dpi(),
            cmap: default_cmap(),
            cat_cmap: default_cat_cmap(),
            buffer: default_buffer(),
            resolution: default_resolution(),
            max_bins: default_max_bins(),
        }
    }
}

// Default value functions for serde
fn default_figsize() -> (f64, f64) {
    DEFAULT_FIGSIZE
}

fn default_dpi() -> u32 {
    100
}

fn default_cmap() -> String {
    DEFAULT_CMAP.to_string()
}

fn default_cat_cmap() -> String {
    DEFAULT_CAT_CMAP.to_string()
}

fn default_buffer() -> f64 {
    DEFAULT_BUFFER
}

fn default_resolution() -> usize {
    DEFAULT_RESOLUTION
}

fn default_max_bins() -> usize {
    DEFAULT_MAX_BINS
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.plot.figsize, (9.0, 13.0));
        assert_eq!(config.plot.dpi, 100);
        assert_eq!(config.plot.cmap, "YlOrRd");
        assert_eq!(config.plot.cat_cmap, "Dark2");
        assert_eq!(config.plot.resolution, 250);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.plot.dpi = 72;
        config2.overlays.shapes_path = Some(PathBuf::from("borders.shp"));

        config1.merge(config2);

        assert_eq!(config1.plot.dpi, 72);
        assert_eq!(
            config1.overlays.shapes_path,
            Some(PathBuf::from("borders.shp"))
        );
    }

    #[test]
    fn test_config_from_json() {
        let config: Config =
            serde_json::from_str(r#"{"plot": {"cmap": "viridis", "figsize": [4.0, 3.0]}}"#)
                .unwrap();
        assert_eq!(config.plot.cmap, "viridis");
        assert_eq!(config.plot.figsize, (4.0, 3.0));
        assert_eq!(config.plot.max_bins, 2000);
        assert!(config.overlays.places_path.is_none());
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.plot.dpi = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.figsize = (0.0, 13.0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.cmap = "not_a_colormap".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.resolution = 1;
        assert!(config.validate().is_err());
    }
}
