//! Tabular geodata: named numeric columns plus a point geometry column.
//!
//! Used for return-period maps, where each column holds the return period
//! of one intensity threshold at every location.

use geo::Point;
use ndarray::Array2;

use crate::error::{Result, RiskmapError};

/// Name of the geometry column
pub const GEOMETRY: &str = "geometry";

/// One named numeric column; missing cells are `None`
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Attribute columns paired with point geometries in lon/lat degrees
/// (x = lon, y = lat)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoDataFrame {
    columns: Vec<Column>,
    geometry: Option<Vec<Point<f64>>>,
}

impl GeoDataFrame {
    /// Empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from column names and row-major data
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: &[Vec<Option<f64>>]) -> Result<Self> {
        let mut frame = Self::new();
        for (j, name) in columns.iter().enumerate() {
            let values = rows
                .iter()
                .map(|row| {
                    row.get(j).copied().ok_or(RiskmapError::ShapeMismatch {
                        expected: columns.len(),
                        actual: row.len(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            frame.add_column(name.as_ref(), values)?;
        }
        Ok(frame)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns
            .first()
            .map(|c| c.values.len())
            .or_else(|| self.geometry.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    /// Whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let has_rows = !self.columns.is_empty() || self.geometry.is_some();
        if has_rows && self.len() != len {
            return Err(RiskmapError::ShapeMismatch {
                expected: self.len(),
                actual: len,
            });
        }
        Ok(())
    }

    /// Append a numeric column
    pub fn add_column(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        if name == GEOMETRY {
            return Err(RiskmapError::invalid(
                "column",
                "'geometry' is reserved for the point geometries",
            ));
        }
        if self.columns.iter().any(|c| c.name == name) {
            return Err(RiskmapError::invalid(
                "column",
                format!("Duplicate column name: {}", name),
            ));
        }
        self.check_len(values.len())?;
        self.columns.push(Column {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    /// Set the geometry column
    pub fn set_geometry(&mut self, points: Vec<Point<f64>>) -> Result<()> {
        if !self.columns.is_empty() {
            self.check_len(points.len())?;
        }
        self.geometry = Some(points);
        Ok(())
    }

    /// Builder variant of [`GeoDataFrame::set_geometry`]
    pub fn with_geometry(mut self, points: Vec<Point<f64>>) -> Result<Self> {
        self.set_geometry(points)?;
        Ok(self)
    }

    /// Names of the non-geometry columns
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// The non-geometry columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The geometry column, if set
    pub fn geometry(&self) -> Option<&[Point<f64>]> {
        self.geometry.as_deref()
    }

    /// Column values as a `columns x rows` matrix, missing cells as NaN
    pub fn values_by_column(&self) -> Array2<f64> {
        let rows = self.len();
        Array2::from_shape_fn((self.columns.len(), rows), |(i, j)| {
            self.columns[i].values[j].unwrap_or(f64::NAN)
        })
    }

    /// Geometry as an `n x 2` `[lat, lon]` coordinate array
    pub fn coords(&self) -> Result<Array2<f64>> {
        let points = self.geometry.as_ref().ok_or_else(|| {
            RiskmapError::invalid("gdf", "GeoDataFrame has no geometry column")
        })?;
        Ok(Array2::from_shape_fn((points.len(), 2), |(i, j)| {
            if j == 0 {
                points[i].y()
            } else {
                points[i].x()
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn return_periods() -> GeoDataFrame {
        GeoDataFrame::from_rows(
            &["10.0", "20.0"],
            &[
                vec![Some(2.0), Some(5.0)],
                vec![Some(0.0), Some(6.0)],
                vec![None, Some(2.0)],
                vec![Some(1.0), Some(1000.0)],
            ],
        )
        .unwrap()
        .with_geometry(vec![
            Point::new(45.0, 26.0),
            Point::new(46.0, 26.0),
            Point::new(45.0, 27.0),
            Point::new(46.0, 27.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_columns_and_values() {
        let gdf = return_periods();
        assert_eq!(gdf.len(), 4);
        assert_eq!(gdf.column_names(), vec!["10.0", "20.0"]);

        let values = gdf.values_by_column();
        assert_eq!(values.shape(), &[2, 4]);
        assert_eq!(values[[0, 1]], 0.0);
        assert!(values[[0, 2]].is_nan());
        assert_eq!(values[[1, 3]], 1000.0);
    }

    #[test]
    fn test_coords_are_lat_lon() {
        let coords = return_periods().coords().unwrap();
        assert_eq!(coords.row(0).to_vec(), vec![26.0, 45.0]);
        assert_eq!(coords.row(3).to_vec(), vec![27.0, 46.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let mut gdf = GeoDataFrame::new();
        gdf.add_column("a", vec![Some(1.0), Some(2.0)]).unwrap();
        assert!(gdf.add_column("b", vec![Some(1.0)]).is_err());
        assert!(gdf.set_geometry(vec![Point::new(0.0, 0.0)]).is_err());
        assert!(gdf.add_column("a", vec![None, None]).is_err());
        assert!(gdf.add_column(GEOMETRY, vec![None, None]).is_err());
    }

    #[test]
    fn test_missing_geometry() {
        let gdf = GeoDataFrame::from_rows(&["a"], &[vec![Some(1.0)]]).unwrap();
        assert!(gdf.coords().is_err());
        assert!(gdf.geometry().is_none());
    }
}
