//! Colormap implementations for map rendering.
//!
//! This module provides matplotlib-compatible colormaps, addressed by their
//! matplotlib names.

pub mod colormap;
pub mod diverging;
pub mod qualitative;
pub mod sequential;

pub use colormap::{get_colormap, hex_to_rgba, Colormap, ListedColormap};

pub use diverging::{Coolwarm, Seismic};
pub use sequential::GradientColormap;
