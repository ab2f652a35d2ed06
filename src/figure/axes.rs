//! A single map panel.

use crate::error::{Result, RiskmapError};
use crate::geoutil::Extent;
use crate::transformation::Projection;

use super::collection::{Collection, Colorbar};
use super::wrap_text;

/// Column width at which titles are wrapped
pub const TITLE_WIDTH: usize = 70;

/// Samples per extent edge when projecting an extent
const EXTENT_SAMPLES: usize = 33;

/// Bounds in projected coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Limits {
    fn empty() -> Self {
        Self {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, (x, y): (f64, f64)) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    /// Whether at least one point was included
    pub fn is_valid(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Widen zero-sized dimensions so the limits can be drawn
    pub fn padded(&self) -> Self {
        let pad = |lo: f64, hi: f64| {
            if hi > lo {
                (lo, hi)
            } else {
                let d = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
                (lo - d, hi + d)
            }
        };
        let (xmin, xmax) = pad(self.xmin, self.xmax);
        let (ymin, ymax) = pad(self.ymin, self.ymax);
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }
}

/// A text label placed at projected coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// One map panel: projection, extent, drawn collections and overlays
#[derive(Debug, Clone)]
pub struct Axes {
    title: String,
    projection: Projection,
    extent: Option<Extent>,
    limits: Option<Limits>,
    collections: Vec<Collection>,
    shapes_enabled: bool,
    shape_lines: Vec<Vec<(f64, f64)>>,
    annotations: Vec<Annotation>,
}

impl Axes {
    pub fn new(projection: Projection) -> Self {
        Self {
            title: String::new(),
            projection,
            extent: None,
            limits: None,
            collections: Vec::new(),
            shapes_enabled: false,
            shape_lines: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Title, wrapped with newlines
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title, wrapping long titles
    pub fn set_title(&mut self, title: &str) {
        self.title = wrap_text(title, TITLE_WIDTH);
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Display unit of the axes coordinates
    pub fn unit(&self) -> &'static str {
        self.projection.unit()
    }

    /// Geographic extent, if set
    pub fn extent(&self) -> Option<&Extent> {
        self.extent.as_ref()
    }

    /// Set the geographic extent and derive the projected limits from it
    pub fn set_extent(&mut self, extent: Extent) -> Result<()> {
        let transformer = self.projection.transformer()?;
        let mut limits = Limits::empty();

        for i in 0..EXTENT_SAMPLES {
            let fy = i as f64 / (EXTENT_SAMPLES - 1) as f64;
            let lat = extent.min_lat + fy * (extent.max_lat - extent.min_lat);
            for j in 0..EXTENT_SAMPLES {
                let fx = j as f64 / (EXTENT_SAMPLES - 1) as f64;
                let lon = extent.min_lon + fx * (extent.max_lon - extent.min_lon);
                if let Some(xy) = transformer.project(lon, lat) {
                    limits.include(xy);
                }
            }
        }

        if !limits.is_valid() {
            return Err(RiskmapError::Projection {
                message: format!(
                    "Extent [{}, {}, {}, {}] has no image in {}",
                    extent.min_lon, extent.max_lon, extent.min_lat, extent.max_lat, self.projection
                ),
            });
        }

        self.extent = Some(extent);
        self.limits = Some(limits);
        Ok(())
    }

    /// Projected limits: from the extent if set, else from the drawn geometry
    pub fn limits(&self) -> Option<Limits> {
        if let Some(limits) = self.limits {
            return Some(limits);
        }

        let mut limits = Limits::empty();
        for collection in &self.collections {
            match collection.kind() {
                super::CollectionKind::Scatter { offsets, .. } => {
                    offsets.iter().for_each(|&p| limits.include(p))
                }
                super::CollectionKind::HexBin { polygons }
                | super::CollectionKind::Mesh { polygons } => polygons
                    .iter()
                    .flatten()
                    .for_each(|&p| limits.include(p)),
            }
        }
        limits.is_valid().then_some(limits)
    }

    /// Add a collection and return it for further configuration
    pub fn add_collection(&mut self, collection: Collection) -> &mut Collection {
        self.collections.push(collection);
        let last = self.collections.len() - 1;
        &mut self.collections[last]
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// First colorbar attached to any collection of this axes
    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.collections.iter().find_map(|c| c.colorbar())
    }

    /// Colorbar of the most recently added collection that has one
    pub fn colorbar_mut(&mut self) -> Option<&mut Colorbar> {
        self.collections
            .iter_mut()
            .rev()
            .find_map(|c| c.colorbar_mut())
    }

    /// Mark the axes as showing administrative boundaries
    pub fn enable_shapes(&mut self) {
        self.shapes_enabled = true;
    }

    /// Whether administrative boundaries were drawn on the axes
    pub fn has_shapes(&self) -> bool {
        self.shapes_enabled
    }

    /// Add a projected polyline to the shape overlay
    pub fn add_shape_line(&mut self, line: Vec<(f64, f64)>) {
        if line.len() > 1 {
            self.shape_lines.push(line);
        }
    }

    pub fn shape_lines(&self) -> &[Vec<(f64, f64)>] {
        &self.shape_lines
    }

    pub fn add_annotation(&mut self, x: f64, y: f64, text: &str) {
        self.annotations.push(Annotation {
            x,
            y,
            text: text.to_string(),
        });
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_extent_plate_carree() {
        let mut axes = Axes::new(Projection::plate_carree_centered(180.5));
        axes.set_extent(Extent {
            min_lon: 175.0,
            max_lon: 186.0,
            min_lat: -27.0,
            max_lat: -10.0,
        })
        .unwrap();

        let limits = axes.limits().unwrap();
        assert_eq!(limits.xmin, -5.5);
        assert_eq!(limits.xmax, 5.5);
        assert_eq!(limits.ymin, -27.0);
        assert_eq!(limits.ymax, -10.0);
        assert_eq!(axes.unit(), "°");
    }

    #[test]
    fn test_set_extent_mercator() {
        let mut axes = Axes::new(Projection::Mercator);
        axes.set_extent(Extent {
            min_lon: -10.0,
            max_lon: 10.0,
            min_lat: -5.0,
            max_lat: 5.0,
        })
        .unwrap();
        let limits = axes.limits().unwrap();
        assert!(limits.xmax > 1.0e6);
        assert!((limits.xmin + limits.xmax).abs() < 1.0);
        assert_eq!(axes.unit(), "m");
    }

    #[test]
    fn test_title_wrapping() {
        let mut axes = Axes::new(Projection::plate_carree());
        axes.set_title("test");
        assert_eq!(axes.title(), "test");

        let long = "word ".repeat(30);
        axes.set_title(long.trim());
        assert!(axes.title().contains('\n'));
        assert!(axes.title().lines().all(|line| line.len() <= TITLE_WIDTH));
    }

    #[test]
    fn test_padded_limits() {
        let limits = Limits {
            xmin: 2.0,
            xmax: 2.0,
            ymin: 0.0,
            ymax: 0.0,
        }
        .padded();
        assert!(limits.width() > 0.0);
        assert!(limits.height() > 0.0);
    }

    #[test]
    fn test_shape_lines_need_two_points() {
        let mut axes = Axes::new(Projection::plate_carree());
        axes.add_shape_line(vec![(0.0, 0.0)]);
        axes.add_shape_line(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(axes.shape_lines().len(), 1);
    }
}
