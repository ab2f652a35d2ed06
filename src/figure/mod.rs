//! Figure model returned by the plotting functions.
//!
//! A [`Figure`] owns a grid of [`Axes`]; each axes owns its collections,
//! colorbars and overlays. Everything is released when the figure is
//! dropped.

pub mod axes;
pub mod collection;
pub mod render;

use std::path::Path;

pub use axes::{Annotation, Axes, Limits};
pub use collection::{Collection, CollectionKind, Colorbar, Extend, Norm, DEFAULT_MARKER_SIZE};

use crate::error::{Result, RiskmapError};
use crate::transformation::Projection;

/// Default rendering resolution
pub const DEFAULT_DPI: u32 = 100;

/// A figure holding one or more map panels laid out on a grid
#[derive(Debug, Clone)]
pub struct Figure {
    figsize: (f64, f64),
    dpi: u32,
    nrows: usize,
    ncols: usize,
    axes: Vec<Axes>,
}

impl Figure {
    /// Figure of `figsize` inches with the given axes laid out `nrows x ncols`
    pub fn new(figsize: (f64, f64), nrows: usize, ncols: usize, axes: Vec<Axes>) -> Result<Self> {
        if !(figsize.0 > 0.0 && figsize.1 > 0.0) {
            return Err(RiskmapError::invalid(
                "figsize",
                format!("Figure size must be positive, got {:?}", figsize),
            ));
        }
        if axes.len() > nrows * ncols {
            return Err(RiskmapError::invalid(
                "axes",
                format!(
                    "{} axes do not fit a {}x{} grid",
                    axes.len(),
                    nrows,
                    ncols
                ),
            ));
        }
        Ok(Self {
            figsize,
            dpi: DEFAULT_DPI,
            nrows,
            ncols,
            axes,
        })
    }

    /// Set the rendering resolution
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi.max(1);
        self
    }

    pub fn figsize(&self) -> (f64, f64) {
        self.figsize
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Grid shape as (rows, columns)
    pub fn grid(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut [Axes] {
        &mut self.axes
    }

    /// Pixel size of the rendered figure
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.figsize.0 * self.dpi as f64).round().max(1.0) as u32,
            (self.figsize.1 * self.dpi as f64).round().max(1.0) as u32,
        )
    }

    /// Rasterise the figure
    pub fn render(&self) -> Result<image::RgbaImage> {
        render::render_figure(self)
    }

    /// Render and write the figure; the format follows the file extension
    pub fn save(&self, path: &Path) -> Result<()> {
        render::save_figure(self, path)
    }
}

/// Rows and columns used for `num_sub` panels
pub fn get_row_col_size(num_sub: usize) -> (usize, usize) {
    if num_sub <= 3 {
        (1, num_sub.max(1))
    } else if num_sub % 3 == 0 {
        (num_sub / 3, 3)
    } else {
        (num_sub / 2 + num_sub % 2, 2)
    }
}

/// Create a figure with `num_sub` empty map axes in `projection`
pub fn make_map(num_sub: usize, figsize: (f64, f64), projection: &Projection) -> Result<Figure> {
    if num_sub == 0 {
        return Err(RiskmapError::invalid("num_sub", "At least one panel is needed"));
    }
    let (nrows, ncols) = get_row_col_size(num_sub);
    let axes = (0..num_sub).map(|_| Axes::new(projection.clone())).collect();
    Figure::new(figsize, nrows, ncols, axes)
}

/// Greedy word wrap at `width` columns
pub fn wrap_text(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| {
            let mut lines: Vec<String> = Vec::new();
            let mut current = String::new();
            for word in line.split_whitespace() {
                let needed = if current.is_empty() {
                    word.chars().count()
                } else {
                    current.chars().count() + 1 + word.chars().count()
                };
                if needed > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
            if !current.is_empty() {
                lines.push(current);
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
