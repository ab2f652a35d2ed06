//! Map overlays read from shapefiles.
//!
//! Administrative boundaries come from a polygon or polyline shapefile and
//! populated places from a point shapefile carrying a `NAME` attribute.
//! Both are kept in geographic coordinates and projected when added to an
//! [`Axes`].

use geo::Point;
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Reader, Shape};
use std::path::Path;
use tracing::{debug, info};

use crate::config::OverlayConfig;
use crate::error::Result;
use crate::figure::Axes;
use crate::geoutil::Extent;

/// Attribute holding the label of a populated place
pub const NAME_FIELD: &str = "NAME";

/// Boundary lines and labelled places in lon/lat
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    pub borders: Vec<Vec<(f64, f64)>>,
    pub places: Vec<(Point<f64>, String)>,
}

impl Overlays {
    /// Load the overlays named in the configuration
    pub fn from_config(config: &OverlayConfig) -> Result<Self> {
        let mut overlays = Self::default();
        if let Some(path) = &config.shapes_path {
            overlays.borders = load_shapes(path)?;
        }
        if let Some(path) = &config.places_path {
            overlays.places = load_places(path)?;
        }
        Ok(overlays)
    }

    pub fn is_empty(&self) -> bool {
        self.borders.is_empty() && self.places.is_empty()
    }
}

/// Read every ring or part of a polygon/polyline shapefile as a lon/lat line
pub fn load_shapes(path: &Path) -> Result<Vec<Vec<(f64, f64)>>> {
    let mut reader = Reader::from_path(path)?;
    let mut lines = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, _) = result?;
        match shape {
            Shape::Polygon(polygon) => {
                for ring in polygon.rings() {
                    lines.push(ring.points().iter().map(|p| (p.x, p.y)).collect());
                }
            }
            Shape::Polyline(polyline) => {
                for part in polyline.parts() {
                    lines.push(part.iter().map(|p| (p.x, p.y)).collect());
                }
            }
            _ => {}
        }
    }

    info!(path = %path.display(), lines = lines.len(), "Loaded boundary shapes");
    Ok(lines)
}

/// Read named points from a point shapefile
pub fn load_places(path: &Path) -> Result<Vec<(Point<f64>, String)>> {
    let mut reader = Reader::from_path(path)?;
    let mut places = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        let point = match shape {
            Shape::Point(p) => Point::new(p.x, p.y),
            _ => continue,
        };
        if let Some(name) = place_name(&record) {
            places.push((point, name));
        }
    }

    info!(path = %path.display(), places = places.len(), "Loaded populated places");
    Ok(places)
}

fn place_name(record: &Record) -> Option<String> {
    match record.get(NAME_FIELD) {
        Some(FieldValue::Character(Some(s))) => {
            let name = s.trim();
            (!name.is_empty()).then(|| name.to_string())
        }
        _ => None,
    }
}

/// Project boundary lines onto the axes; lines are split where a vertex
/// has no image or the line wraps around the map
pub fn add_shapes(axes: &mut Axes, overlays: &Overlays) -> Result<()> {
    axes.enable_shapes();
    let transformer = axes.projection().transformer()?;
    let wrap = axes.limits().map(|l| 0.5 * l.width());

    let mut added = 0;
    for line in &overlays.borders {
        let mut current: Vec<(f64, f64)> = Vec::with_capacity(line.len());
        for &(lon, lat) in line {
            match transformer.project(lon, lat) {
                Some(xy) => {
                    let jumps = match (current.last(), wrap) {
                        (Some(prev), Some(half)) => (xy.0 - prev.0).abs() > half,
                        _ => false,
                    };
                    if jumps {
                        axes.add_shape_line(std::mem::take(&mut current));
                        added += 1;
                    }
                    current.push(xy);
                }
                None if !current.is_empty() => {
                    axes.add_shape_line(std::mem::take(&mut current));
                    added += 1;
                }
                None => {}
            }
        }
        if !current.is_empty() {
            axes.add_shape_line(current);
            added += 1;
        }
    }

    debug!(lines = added, "Added boundary shapes");
    Ok(())
}

/// Label the populated places that fall within `extent`
pub fn add_populated_places(axes: &mut Axes, overlays: &Overlays, extent: &Extent) -> Result<()> {
    let transformer = axes.projection().transformer()?;
    let mut added = 0;
    for (point, name) in &overlays.places {
        if !extent.contains(point.x(), point.y()) {
            continue;
        }
        if let Some((x, y)) = transformer.project(point.x(), point.y()) {
            axes.add_annotation(x, y, name);
            added += 1;
        }
    }

    debug!(places = added, "Added populated places");
    Ok(())
}
