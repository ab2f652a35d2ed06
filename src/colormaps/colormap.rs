//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps, the
//! [`ListedColormap`] used for discrete (categorical) color scales and the
//! name lookup used by the plotting functions.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, RiskmapError};

/// Number of entries of a continuous colormap lookup table
pub const LUT_SIZE: usize = 256;

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f32, min: f32, max: f32) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;

    /// Number of distinct colors this colormap can produce
    fn n_colors(&self) -> usize {
        LUT_SIZE
    }

    /// Whether the colormap is a short list of unrelated colors
    fn is_qualitative(&self) -> bool {
        false
    }
}

impl fmt::Debug for dyn Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Colormap")
            .field("name", &self.name())
            .field("n_colors", &self.n_colors())
            .finish()
    }
}

/// A colormap made of a fixed list of colors.
///
/// A normalized value in `[0, 1]` selects one of the `N` colors by uniform
/// partition, so `-0.5..N-0.5` with a linear norm hits color `i` at value `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedColormap {
    name: String,
    colors: Vec<[u8; 4]>,
    qualitative: bool,
}

impl ListedColormap {
    /// Create a listed colormap from RGBA colors
    pub fn new(name: impl Into<String>, colors: Vec<[u8; 4]>) -> Result<Self> {
        if colors.is_empty() {
            return Err(RiskmapError::invalid(
                "cmap",
                "A listed colormap needs at least one color",
            ));
        }
        Ok(Self {
            name: name.into(),
            colors,
            qualitative: true,
        })
    }

    pub(crate) fn from_hex(name: &str, hex: &[u32]) -> Self {
        Self {
            name: name.to_string(),
            colors: hex.iter().map(|&c| hex_to_rgba(c)).collect(),
            qualitative: true,
        }
    }

    /// Sample `n` evenly spaced colors from any colormap.
    pub fn resampled(cmap: &dyn Colormap, n: usize) -> Self {
        let n = n.max(1);
        let colors = (0..n)
            .map(|i| {
                let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
                cmap.map_normalized(t)
            })
            .collect();
        Self {
            name: cmap.name().to_string(),
            colors,
            qualitative: false,
        }
    }

    /// Keep the first `n` colors (all of them if fewer are available).
    pub fn truncated(&self, n: usize) -> Self {
        let keep = n.clamp(1, self.colors.len());
        Self {
            name: self.name.clone(),
            colors: self.colors[..keep].to_vec(),
            qualitative: self.qualitative,
        }
    }

    /// The colors of this colormap
    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }
}

impl Colormap for ListedColormap {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        let n = self.colors.len();
        let index = (value.clamp(0.0, 1.0) * n as f32).floor() as usize;
        self.colors[index.min(n - 1)]
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn n_colors(&self) -> usize {
        self.colors.len()
    }

    fn is_qualitative(&self) -> bool {
        self.qualitative
    }
}

/// Get a colormap by name
pub fn get_colormap(name: &str) -> Result<Arc<dyn Colormap>> {
    use super::{diverging::*, qualitative, sequential::GradientColormap};

    let cmap: Arc<dyn Colormap> = match name.to_lowercase().as_str() {
        "viridis" => Arc::new(GradientColormap::new("viridis", colorgrad::viridis())),
        "plasma" => Arc::new(GradientColormap::new("plasma", colorgrad::plasma())),
        "inferno" => Arc::new(GradientColormap::new("inferno", colorgrad::inferno())),
        "magma" => Arc::new(GradientColormap::new("magma", colorgrad::magma())),
        "cividis" => Arc::new(GradientColormap::new("cividis", colorgrad::cividis())),
        "turbo" => Arc::new(GradientColormap::new("turbo", colorgrad::turbo())),
        "ylorrd" => Arc::new(GradientColormap::new("YlOrRd", colorgrad::yl_or_rd())),
        "blues" => Arc::new(GradientColormap::new("Blues", colorgrad::blues())),
        "reds" => Arc::new(GradientColormap::new("Reds", colorgrad::reds())),
        "rdbu" => Arc::new(GradientColormap::new("RdBu", colorgrad::rd_bu())),
        "coolwarm" => Arc::new(Coolwarm),
        "seismic" => Arc::new(Seismic),
        other => match qualitative::lookup(other) {
            Some(listed) => Arc::new(listed),
            None => {
                return Err(RiskmapError::InvalidParameter {
                    param: "cmap".to_string(),
                    message: format!("Unknown colormap: {}", name),
                })
            }
        },
    };
    Ok(cmap)
}

/// Linear interpolation between two colors
pub fn lerp_color(c1: [u8; 3], c2: [u8; 3], t: f32) -> [u8; 3] {
    [
        (c1[0] as f32 * (1.0 - t) + c2[0] as f32 * t) as u8,
        (c1[1] as f32 * (1.0 - t) + c2[1] as f32 * t) as u8,
        (c1[2] as f32 * (1.0 - t) + c2[2] as f32 * t) as u8,
    ]
}

/// Convert a 0xRRGGBB value to an opaque RGBA color
pub fn hex_to_rgba(hex: u32) -> [u8; 4] {
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
        255,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_color() {
        let black = [0, 0, 0];
        let white = [255, 255, 255];

        let mid = lerp_color(black, white, 0.5);
        assert_eq!(mid, [127, 127, 127]);
    }

    #[test]
    fn test_hex_to_rgba() {
        assert_eq!(hex_to_rgba(0x1b9e77), [0x1b, 0x9e, 0x77, 255]);
    }

    #[test]
    fn test_get_colormap_keeps_canonical_name() {
        assert_eq!(get_colormap("viridis").unwrap().name(), "viridis");
        assert_eq!(get_colormap("ylorrd").unwrap().name(), "YlOrRd");
        assert_eq!(get_colormap("TAB20C").unwrap().name(), "tab20c");
        assert!(get_colormap("no_such_map").is_err());
    }

    #[test]
    fn test_listed_colormap_partition() {
        let listed = ListedColormap::new(
            "three",
            vec![[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]],
        )
        .unwrap();

        // -0.5..2.5 linear norm: value i lands in bin i
        for i in 0..3 {
            let t = (i as f32 + 0.5) / 3.0;
            assert_eq!(listed.map_normalized(t), listed.colors()[i]);
        }
        assert_eq!(listed.map_normalized(1.0), listed.colors()[2]);
        assert!(ListedColormap::new("empty", Vec::new()).is_err());
    }

    #[test]
    fn test_resampled_and_truncated() {
        let viridis = get_colormap("viridis").unwrap();
        let resampled = ListedColormap::resampled(viridis.as_ref(), 16);
        assert_eq!(resampled.n_colors(), 16);
        assert_eq!(resampled.name(), "viridis");
        assert!(!resampled.is_qualitative());

        let set1 = get_colormap("Set1").unwrap();
        assert!(set1.is_qualitative());
        let listed = ListedColormap::resampled(set1.as_ref(), 9);
        assert_eq!(listed.truncated(4).n_colors(), 4);
        assert_eq!(listed.truncated(40).n_colors(), 9);
    }
}
