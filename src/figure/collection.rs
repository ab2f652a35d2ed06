//! Drawable collections, color normalization and colorbars.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::colormaps::Colormap;
use crate::error::{Result, RiskmapError};

/// Default scatter marker area in points²
pub const DEFAULT_MARKER_SIZE: f64 = 36.0;

/// Mapping of data values onto the `[0, 1]` colormap range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Norm {
    Linear { vmin: f64, vmax: f64 },
    Log { vmin: f64, vmax: f64 },
}

impl Norm {
    /// Linear norm; rejects non-finite or reversed bounds
    pub fn linear(vmin: f64, vmax: f64) -> Result<Self> {
        check_bounds(vmin, vmax)?;
        Ok(Norm::Linear { vmin, vmax })
    }

    /// Logarithmic norm; bounds must be positive
    pub fn log(vmin: f64, vmax: f64) -> Result<Self> {
        check_bounds(vmin, vmax)?;
        if vmin <= 0.0 {
            return Err(RiskmapError::invalid(
                "norm",
                format!("Logarithmic norm needs positive bounds, got vmin={}", vmin),
            ));
        }
        Ok(Norm::Log { vmin, vmax })
    }

    /// Lower bound
    pub fn vmin(&self) -> f64 {
        match self {
            Norm::Linear { vmin, .. } | Norm::Log { vmin, .. } => *vmin,
        }
    }

    /// Upper bound
    pub fn vmax(&self) -> f64 {
        match self {
            Norm::Linear { vmax, .. } | Norm::Log { vmax, .. } => *vmax,
        }
    }

    /// Whether the norm is logarithmic
    pub fn is_log(&self) -> bool {
        matches!(self, Norm::Log { .. })
    }

    /// Normalize a value; `None` for values without a color (NaN, log of <= 0)
    pub fn normalize(&self, value: f64) -> Option<f32> {
        if !value.is_finite() {
            return None;
        }
        let t = match *self {
            Norm::Linear { vmin, vmax } => {
                if vmax > vmin {
                    (value - vmin) / (vmax - vmin)
                } else {
                    0.5
                }
            }
            Norm::Log { vmin, vmax } => {
                if value <= 0.0 {
                    return None;
                }
                if vmax > vmin {
                    (value.ln() - vmin.ln()) / (vmax.ln() - vmin.ln())
                } else {
                    0.5
                }
            }
        };
        Some(t.clamp(0.0, 1.0) as f32)
    }
}

fn check_bounds(vmin: f64, vmax: f64) -> Result<()> {
    if !vmin.is_finite() || !vmax.is_finite() {
        return Err(RiskmapError::invalid(
            "norm",
            format!("Color limits must be finite, got [{}, {}]", vmin, vmax),
        ));
    }
    if vmin > vmax {
        return Err(RiskmapError::invalid(
            "norm",
            format!("vmin ({}) must be <= vmax ({})", vmin, vmax),
        ));
    }
    Ok(())
}

/// Triangular extensions drawn at the ends of a colorbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    #[default]
    Neither,
    Both,
    Min,
    Max,
}

impl Extend {
    /// Whether the low end is extended
    pub fn extends_min(&self) -> bool {
        matches!(self, Extend::Both | Extend::Min)
    }

    /// Whether the high end is extended
    pub fn extends_max(&self) -> bool {
        matches!(self, Extend::Both | Extend::Max)
    }
}

impl FromStr for Extend {
    type Err = RiskmapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neither" => Ok(Extend::Neither),
            "both" => Ok(Extend::Both),
            "min" => Ok(Extend::Min),
            "max" => Ok(Extend::Max),
            _ => Err(RiskmapError::InvalidParameter {
                param: "extend".to_string(),
                message: format!(
                    "Invalid extend: {}. Must be one of: neither, both, min, max",
                    s
                ),
            }),
        }
    }
}

/// Legend mapping data values to colors
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    label: String,
    norm: Norm,
    extend: Extend,
    cmap_name: String,
    ticks: Option<Vec<f64>>,
    tick_labels: Option<Vec<String>>,
}

impl Colorbar {
    pub fn new(label: &str, norm: Norm, extend: Extend, cmap_name: &str) -> Self {
        Self {
            label: label.to_string(),
            norm,
            extend,
            cmap_name: cmap_name.to_string(),
            ticks: None,
            tick_labels: None,
        }
    }

    /// Lower bound of the colorbar
    pub fn vmin(&self) -> f64 {
        self.norm.vmin()
    }

    /// Upper bound of the colorbar
    pub fn vmax(&self) -> f64 {
        self.norm.vmax()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn norm(&self) -> &Norm {
        &self.norm
    }

    pub fn extend(&self) -> Extend {
        self.extend
    }

    pub fn cmap_name(&self) -> &str {
        &self.cmap_name
    }

    /// Set explicit ticks and their labels
    pub fn set_ticks(&mut self, ticks: Vec<f64>, labels: Vec<String>) -> Result<()> {
        if ticks.len() != labels.len() {
            return Err(RiskmapError::ShapeMismatch {
                expected: ticks.len(),
                actual: labels.len(),
            });
        }
        self.ticks = Some(ticks);
        self.tick_labels = Some(labels);
        Ok(())
    }

    pub fn ticks(&self) -> Option<&[f64]> {
        self.ticks.as_deref()
    }

    pub fn tick_labels(&self) -> Option<&[String]> {
        self.tick_labels.as_deref()
    }
}

/// Geometry drawn by a collection, in projected coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionKind {
    /// Markers at point offsets; size is the marker area in points²
    Scatter {
        offsets: Vec<(f64, f64)>,
        marker_size: f64,
    },
    /// Hexagonal bins
    HexBin { polygons: Vec<Vec<(f64, f64)>> },
    /// Quadrilateral mesh cells
    Mesh { polygons: Vec<Vec<(f64, f64)>> },
}

impl CollectionKind {
    /// Number of drawable elements
    pub fn len(&self) -> usize {
        match self {
            CollectionKind::Scatter { offsets, .. } => offsets.len(),
            CollectionKind::HexBin { polygons } | CollectionKind::Mesh { polygons } => {
                polygons.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name used in logs
    pub fn label(&self) -> &'static str {
        match self {
            CollectionKind::Scatter { .. } => "scatter",
            CollectionKind::HexBin { .. } => "hexbin",
            CollectionKind::Mesh { .. } => "mesh",
        }
    }
}

/// Colored geometry plus its color scale
#[derive(Clone)]
pub struct Collection {
    kind: CollectionKind,
    values: Vec<f64>,
    cmap: Arc<dyn Colormap>,
    norm: Norm,
    colorbar: Option<Colorbar>,
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("kind", &self.kind.label())
            .field("len", &self.kind.len())
            .field("cmap", &self.cmap.name())
            .field("norm", &self.norm)
            .field("colorbar", &self.colorbar)
            .finish()
    }
}

impl Collection {
    /// Create a collection; one value per drawable element
    pub fn new(
        kind: CollectionKind,
        values: Vec<f64>,
        cmap: Arc<dyn Colormap>,
        norm: Norm,
    ) -> Result<Self> {
        if kind.len() != values.len() {
            return Err(RiskmapError::ShapeMismatch {
                expected: kind.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            kind,
            values,
            cmap,
            norm,
            colorbar: None,
        })
    }

    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn cmap(&self) -> &dyn Colormap {
        self.cmap.as_ref()
    }

    pub fn norm(&self) -> &Norm {
        &self.norm
    }

    /// Attach a colorbar using this collection's norm and colormap
    pub fn add_colorbar(&mut self, label: &str, extend: Extend) -> &mut Colorbar {
        let colorbar = Colorbar::new(label, self.norm, extend, self.cmap.name());
        self.colorbar.insert(colorbar)
    }

    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    pub fn colorbar_mut(&mut self) -> Option<&mut Colorbar> {
        self.colorbar.as_mut()
    }

    /// RGBA color of element `i`; transparent when it has no value
    pub fn color_of(&self, i: usize) -> [u8; 4] {
        match self.values.get(i).and_then(|&v| self.norm.normalize(v)) {
            Some(t) => self.cmap.map_normalized(t),
            None => [0, 0, 0, 0],
        }
    }
}
