//! Sequential colormaps (single-hue or perceptual progression).
//!
//! These colormaps are suitable for data that progresses from low to high.
//! The gradients come from `colorgrad` presets and are sampled once into a
//! lookup table.

use super::colormap::{Colormap, LUT_SIZE};

/// A continuous colormap backed by a sampled `colorgrad` gradient
pub struct GradientColormap {
    name: &'static str,
    lut: Vec<[u8; 4]>,
}

impl GradientColormap {
    /// Sample `gradient` into a lookup table registered under `name`
    pub fn new(name: &'static str, gradient: colorgrad::Gradient) -> Self {
        let lut = (0..LUT_SIZE)
            .map(|i| {
                let t = i as f64 / (LUT_SIZE - 1) as f64;
                gradient.at(t).to_rgba8()
            })
            .collect();
        Self { name, lut }
    }
}

impl Colormap for GradientColormap {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        if value.is_nan() {
            return [0, 0, 0, 0];
        }
        let index = (value.clamp(0.0, 1.0) * (LUT_SIZE - 1) as f32).round() as usize;
        self.lut[index]
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colormap_names() {
        assert_eq!(
            GradientColormap::new("viridis", colorgrad::viridis()).name(),
            "viridis"
        );
        assert_eq!(
            GradientColormap::new("YlOrRd", colorgrad::yl_or_rd()).name(),
            "YlOrRd"
        );
    }

    #[test]
    fn test_viridis_endpoints() {
        let viridis = GradientColormap::new("viridis", colorgrad::viridis());

        // Dark purple at the low end, yellow at the high end
        let low = viridis.map_normalized(0.0);
        let high = viridis.map_normalized(1.0);
        assert!(low[2] > low[1]);
        assert!(high[0] > 200 && high[1] > 200);
        assert_eq!(high[3], 255);

        // Out of range values clamp
        assert_eq!(viridis.map_normalized(-1.0), low);
        assert_eq!(viridis.map_normalized(2.0), high);
    }

    #[test]
    fn test_nan_is_transparent() {
        let viridis = GradientColormap::new("viridis", colorgrad::viridis());
        assert_eq!(viridis.map_normalized(f32::NAN), [0, 0, 0, 0]);
    }
}
