//! Cyclic colormaps.
//!
//! The first and last colors of these maps coincide, which suits periodic
//! quantities such as phase, wind direction or time of day. The bin
//! normalizer keeps the outermost bins away from the shared endpoint.

use super::colormap::{interpolate_table, Colormap, GradientColormap};

/// Light gray through blue, dark purple and red back to light gray
const TWILIGHT: [[u8; 3]; 13] = [
    [226, 217, 226],
    [178, 192, 210],
    [122, 155, 197],
    [95, 109, 185],
    [93, 60, 160],
    [74, 28, 103],
    [47, 20, 54],
    [96, 25, 72],
    [147, 46, 81],
    [184, 93, 92],
    [205, 145, 128],
    [219, 189, 182],
    [226, 217, 226],
];

/// Twilight colormap
pub struct Twilight;

impl Colormap for Twilight {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        interpolate_table(&TWILIGHT, value)
    }

    fn name(&self) -> &str {
        "twilight"
    }

    fn is_cyclic(&self) -> bool {
        true
    }
}

/// Sinebow colormap - constant-brightness hue wheel
pub fn sinebow() -> GradientColormap {
    GradientColormap::from_gradient("sinebow", &colorgrad::sinebow(), true)
}

/// Rainbow colormap - cubehelix hue wheel
pub fn rainbow() -> GradientColormap {
    GradientColormap::from_gradient("rainbow", &colorgrad::rainbow(), true)
}
