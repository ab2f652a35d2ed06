//! Diverging colormaps (two-hue progression with center).
//!
//! These colormaps are suitable for data that diverges from a central value,
//! such as anomalies of hazard intensity against a baseline.

use super::colormap::{lerp_color, Colormap};

/// Blue to white to red, tuned for temperature-like data
const COOLWARM: [[u8; 3]; 33] = [
    [59, 76, 192], // Dark blue
    [68, 90, 204],
    [77, 104, 215],
    [87, 117, 225],
    [98, 130, 234],
    [108, 142, 241],
    [119, 154, 247],
    [130, 165, 251],
    [141, 176, 254],
    [152, 185, 255],
    [163, 194, 255],
    [174, 201, 253],
    [184, 208, 249],
    [194, 213, 244],
    [204, 217, 238],
    [213, 219, 230],
    [221, 221, 221], // Center
    [229, 216, 209],
    [236, 211, 197],
    [241, 204, 185],
    [245, 196, 173],
    [247, 187, 160],
    [247, 177, 148],
    [247, 166, 135],
    [244, 154, 123],
    [241, 141, 111],
    [236, 127, 99],
    [229, 112, 88],
    [222, 96, 77],
    [213, 80, 66],
    [203, 62, 56],
    [192, 40, 47],
    [180, 4, 38], // Dark red
];

/// Blue to white to red with saturated ends
const SEISMIC: [[u8; 3]; 15] = [
    [0, 0, 76], // Dark blue
    [0, 0, 140],
    [0, 0, 204],
    [0, 32, 255],
    [64, 96, 255],
    [128, 160, 255],
    [192, 208, 255],
    [255, 255, 255], // White in the middle
    [255, 192, 192],
    [255, 128, 128],
    [255, 64, 64],
    [255, 0, 0],
    [210, 0, 0],
    [165, 0, 0],
    [128, 0, 0], // Dark red
];

/// Piecewise linear lookup in a color table
fn interpolate_table(colors: &[[u8; 3]], value: f32) -> [u8; 4] {
    let last = colors.len() - 1;
    let position = value.clamp(0.0, 1.0) * last as f32;
    let index = position.floor() as usize;

    if index >= last {
        let c = colors[last];
        return [c[0], c[1], c[2], 255];
    }

    let t = position - index as f32;
    let rgb = lerp_color(colors[index], colors[index + 1], t);
    [rgb[0], rgb[1], rgb[2], 255]
}

/// Coolwarm colormap - blue to red through light gray
pub struct Coolwarm;

impl Colormap for Coolwarm {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        interpolate_table(&COOLWARM, value)
    }

    fn name(&self) -> &str {
        "coolwarm"
    }
}

/// Seismic colormap - blue-white-red for anomalies
pub struct Seismic;

impl Colormap for Seismic {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        interpolate_table(&SEISMIC, value)
    }

    fn name(&self) -> &str {
        "seismic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colormap_names() {
        assert_eq!(Coolwarm.name(), "coolwarm");
        assert_eq!(Seismic.name(), "seismic");
    }

    #[test]
    fn test_coolwarm_bounds() {
        let colormap = Coolwarm;

        let blue = colormap.map_normalized(0.0);
        let red = colormap.map_normalized(1.0);

        assert!(blue[2] > blue[0]);
        assert!(red[0] > red[2]);

        // Middle should be close to white/light gray
        let middle = colormap.map_normalized(0.5);
        assert!(middle[0] > 200);
        assert!(middle[1] > 200);
        assert!(middle[2] > 200);
    }

    #[test]
    fn test_seismic_middle() {
        let middle = Seismic.map_normalized(0.5);
        assert_eq!(middle, [255, 255, 255, 255]);
    }
}
