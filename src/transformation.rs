//! Map projections and coordinate reference system lookup.
//!
//! Projection math is delegated to `proj4rs`; this module only maps EPSG
//! codes to projection definitions and carries the display unit.

use once_cell::sync::Lazy;
use proj4rs::{proj::Proj as Proj4, transform::transform};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{Result, RiskmapError};
use crate::geoutil::normalize_longitude;

/// Unit label of geographic (degree based) systems
pub const UNIT_DEGREE: &str = "°";

/// Unit label of projected (meter based) systems
pub const UNIT_METER: &str = "m";

const GEOGRAPHIC_WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Map projection used to display lon/lat data
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Equirectangular lon/lat, optionally re-centered
    PlateCarree { central_longitude: f64 },
    /// World Mercator (EPSG:3395)
    Mercator,
    /// Azimuthal equidistant around a center point
    AzimuthalEquidistant {
        central_longitude: f64,
        central_latitude: f64,
    },
    /// Any other system identified by its EPSG code
    Epsg { code: u32, proj4: String },
}

impl Projection {
    /// Plate Carrée centered on Greenwich
    pub fn plate_carree() -> Self {
        Projection::PlateCarree {
            central_longitude: 0.0,
        }
    }

    /// Plate Carrée centered on `central_longitude`
    pub fn plate_carree_centered(central_longitude: f64) -> Self {
        Projection::PlateCarree { central_longitude }
    }

    /// Azimuthal equidistant centered on (0, 0)
    pub fn azimuthal_equidistant() -> Self {
        Projection::AzimuthalEquidistant {
            central_longitude: 0.0,
            central_latitude: 0.0,
        }
    }

    /// Whether this is an (optionally re-centered) Plate Carrée
    pub fn is_plate_carree(&self) -> bool {
        matches!(self, Projection::PlateCarree { .. })
    }

    /// EPSG code of this projection, when it has one
    pub fn epsg_code(&self) -> Option<u32> {
        match self {
            Projection::PlateCarree { central_longitude } if *central_longitude == 0.0 => {
                Some(4326)
            }
            Projection::PlateCarree { .. } => None,
            Projection::Mercator => Some(3395),
            Projection::AzimuthalEquidistant { .. } => None,
            Projection::Epsg { code, .. } => Some(*code),
        }
    }

    /// Display unit of the projected coordinates
    pub fn unit(&self) -> &'static str {
        match self {
            Projection::PlateCarree { .. } => UNIT_DEGREE,
            Projection::Mercator | Projection::AzimuthalEquidistant { .. } => UNIT_METER,
            Projection::Epsg { proj4, .. } => unit_of_proj4(proj4),
        }
    }

    /// PROJ.4 definition of this projection
    pub fn proj4_string(&self) -> String {
        match self {
            Projection::PlateCarree { central_longitude } => {
                format!("+proj=eqc +lon_0={} +datum=WGS84 +units=m +no_defs", central_longitude)
            }
            Projection::Mercator => epsg_proj4(3395).unwrap_or_default(),
            Projection::AzimuthalEquidistant {
                central_longitude,
                central_latitude,
            } => format!(
                "+proj=aeqd +lat_0={} +lon_0={} +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
                central_latitude, central_longitude
            ),
            Projection::Epsg { proj4, .. } => proj4.clone(),
        }
    }

    /// Build a transformer from lon/lat degrees into this projection
    pub fn transformer(&self) -> Result<Transformer> {
        let target = match self {
            Projection::PlateCarree { .. } => None,
            _ if self.unit() == UNIT_DEGREE => None,
            _ => Some(build_proj(&self.proj4_string())?),
        };
        Ok(Transformer {
            source: build_proj(GEOGRAPHIC_WGS84)?,
            target,
            projection: self.clone(),
        })
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::plate_carree()
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::PlateCarree { central_longitude } => {
                write!(f, "PlateCarree(central_longitude={})", central_longitude)
            }
            Projection::Mercator => write!(f, "Mercator"),
            Projection::AzimuthalEquidistant {
                central_longitude,
                central_latitude,
            } => write!(
                f,
                "AzimuthalEquidistant(central_longitude={}, central_latitude={})",
                central_longitude, central_latitude
            ),
            Projection::Epsg { code, .. } => write!(f, "EPSG:{}", code),
        }
    }
}

impl FromStr for Projection {
    type Err = RiskmapError;

    /// Accepts `platecarree`, `platecarree:<lon>`, `mercator`, `aeqd`,
    /// `aeqd:<lon>,<lat>` or anything [`get_transformation`] understands.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let invalid = || RiskmapError::InvalidParameter {
            param: "proj".to_string(),
            message: format!("Invalid projection: {}", s),
        };

        match lower.split_once(':') {
            None if lower == "platecarree" => Ok(Projection::plate_carree()),
            None if lower == "mercator" => Ok(Projection::Mercator),
            None if lower == "aeqd" => Ok(Projection::azimuthal_equidistant()),
            Some(("platecarree", lon)) => lon
                .parse::<f64>()
                .map(Projection::plate_carree_centered)
                .map_err(|_| invalid()),
            Some(("aeqd", center)) => {
                let (lon, lat) = center.split_once(',').ok_or_else(invalid)?;
                Ok(Projection::AzimuthalEquidistant {
                    central_longitude: lon.trim().parse().map_err(|_| invalid())?,
                    central_latitude: lat.trim().parse().map_err(|_| invalid())?,
                })
            }
            _ => get_transformation(s).map(|(projection, _)| projection),
        }
    }
}

/// Projects lon/lat degrees into a [`Projection`]'s plane coordinates
pub struct Transformer {
    source: Proj4,
    target: Option<Proj4>,
    projection: Projection,
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("projection", &self.projection)
            .finish()
    }
}

impl Transformer {
    /// Projection this transformer maps into
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Width after which projected x repeats, for projections that wrap
    /// longitudes into a fixed interval
    pub fn x_period(&self) -> Option<f64> {
        match self.projection {
            Projection::PlateCarree { .. } => Some(360.0),
            _ => None,
        }
    }

    /// Project a lon/lat point; `None` when it has no image in the projection
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }

        let target = match (&self.projection, &self.target) {
            (Projection::PlateCarree { central_longitude }, _) => {
                return Some((normalize_longitude(lon - central_longitude), lat));
            }
            (_, None) => return Some((lon, lat)),
            (_, Some(target)) => target,
        };

        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        transform(&self.source, target, &mut point).ok()?;
        if point.0.is_finite() && point.1.is_finite() {
            Some((point.0, point.1))
        } else {
            None
        }
    }
}

fn build_proj(definition: &str) -> Result<Proj4> {
    Proj4::from_proj_string(definition).map_err(|e| RiskmapError::Projection {
        message: format!("failed to build PROJ.4 '{}': {:?}", definition, e),
    })
}

fn unit_of_proj4(proj4: &str) -> &'static str {
    if proj4.contains("+proj=longlat") || proj4.contains("+proj=latlong") {
        UNIT_DEGREE
    } else {
        UNIT_METER
    }
}

/// PROJ.4 definitions of the supported non-UTM EPSG codes
static EPSG_DEFINITIONS: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (4326, GEOGRAPHIC_WGS84),
        (4269, "+proj=longlat +datum=NAD83 +no_defs"),
        (4258, "+proj=longlat +ellps=GRS80 +no_defs"),
        (3395, "+proj=merc +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs"),
        (3857, "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs"),
        (3035, "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m +no_defs"),
        (2154, "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 +x_0=700000 +y_0=6600000 +ellps=GRS80 +units=m +no_defs"),
        (2056, "+proj=somerc +lat_0=46.9524055555556 +lon_0=7.43958333333333 +k_0=1 +x_0=2600000 +y_0=1200000 +ellps=bessel +units=m +no_defs"),
    ])
});

/// PROJ.4 definition of a known EPSG code
pub fn epsg_proj4(code: u32) -> Option<String> {
    match code {
        32601..=32660 => Some(format!(
            "+proj=utm +zone={} +datum=WGS84 +units=m +no_defs",
            code - 32600
        )),
        32701..=32760 => Some(format!(
            "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
            code - 32700
        )),
        _ => EPSG_DEFINITIONS.get(&code).map(|s| s.to_string()),
    }
}

/// Parse `epsg:NNNN`, `EPSG:NNNN` or a bare code
fn parse_epsg(crs: &str) -> Option<u32> {
    let trimmed = crs.trim();
    let code = match trimmed.split_once(':') {
        Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
        Some(_) => return None,
        None => trimmed,
    };
    code.trim().parse().ok()
}

/// Projection and display unit for a coordinate reference system.
///
/// EPSG:4326 maps to Plate Carrée with unit "°", EPSG:3395 to Mercator with
/// unit "m". Other known codes map to a projection that reports the code.
/// Unknown codes fall back to Plate Carrée with a warning.
pub fn get_transformation(crs: &str) -> Result<(Projection, &'static str)> {
    let code = parse_epsg(crs).ok_or_else(|| RiskmapError::UnsupportedCrs {
        crs: crs.to_string(),
    })?;

    let projection = match code {
        4326 => Projection::plate_carree(),
        3395 => Projection::Mercator,
        _ => match epsg_proj4(code) {
            Some(proj4) => Projection::Epsg { code, proj4 },
            None => {
                warn!(
                    crs = crs,
                    "Error parsing coordinate system. Using PlateCarree"
                );
                Projection::plate_carree()
            }
        },
    };

    let unit = projection.unit();
    debug!(crs = crs, projection = %projection, unit = unit, "Resolved transformation");
    Ok((projection, unit))
}
