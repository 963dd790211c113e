//! Sequential colormaps (single-hue progression).
//!
//! These colormaps are suitable for data that progresses from low to high.
//! They are sampled from the `colorgrad` presets.

use super::colormap::GradientColormap;

/// Viridis colormap - perceptually uniform, colorblind-friendly
pub fn viridis() -> GradientColormap {
    GradientColormap::from_gradient("viridis", &colorgrad::viridis(), false)
}

/// Plasma colormap
pub fn plasma() -> GradientColormap {
    GradientColormap::from_gradient("plasma", &colorgrad::plasma(), false)
}

/// Inferno colormap
pub fn inferno() -> GradientColormap {
    GradientColormap::from_gradient("inferno", &colorgrad::inferno(), false)
}

/// Magma colormap
pub fn magma() -> GradientColormap {
    GradientColormap::from_gradient("magma", &colorgrad::magma(), false)
}

/// Cividis colormap - colorblind-friendly alternative to viridis
pub fn cividis() -> GradientColormap {
    GradientColormap::from_gradient("cividis", &colorgrad::cividis(), false)
}

/// Turbo colormap - high-contrast rainbow replacement
pub fn turbo() -> GradientColormap {
    GradientColormap::from_gradient("turbo", &colorgrad::turbo(), false)
}
