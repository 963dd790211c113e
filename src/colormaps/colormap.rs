//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps, the two
//! backing representations (tabulated and gradient-sampled) and the
//! name registry.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{PlotError, Result};

/// Number of samples taken from a gradient when building its table
pub const GRADIENT_SAMPLES: usize = 256;

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Get the name of this colormap
    fn name(&self) -> &str;

    /// Whether the first and last colors are meant to be adjacent
    fn is_cyclic(&self) -> bool {
        false
    }

    /// Color for entry `index` of an `n`-entry lookup table
    fn color_for_index(&self, index: usize, n: usize) -> [u8; 4] {
        let t = if n > 1 {
            index.min(n - 1) as f32 / (n - 1) as f32
        } else {
            0.5
        };
        self.map_normalized(t)
    }

    /// Discrete lookup table with `n` entries spanning the whole colormap
    fn lookup_table(&self, n: usize) -> Vec<[u8; 4]> {
        (0..n).map(|i| self.color_for_index(i, n)).collect()
    }
}

/// Linear interpolation between two colors
pub fn lerp_color(c1: [u8; 3], c2: [u8; 3], t: f32) -> [u8; 3] {
    [
        (c1[0] as f32 * (1.0 - t) + c2[0] as f32 * t) as u8,
        (c1[1] as f32 * (1.0 - t) + c2[1] as f32 * t) as u8,
        (c1[2] as f32 * (1.0 - t) + c2[2] as f32 * t) as u8,
    ]
}

/// Interpolate a color table at a normalized position
pub fn interpolate_table(colors: &[[u8; 3]], value: f32) -> [u8; 4] {
    let last = colors[colors.len() - 1];
    if colors.len() == 1 || value.is_nan() {
        return [last[0], last[1], last[2], 255];
    }

    // Calculate the position in our color array
    let position = value.clamp(0.0, 1.0) * (colors.len() - 1) as f32;
    let index = position.floor() as usize;

    if index >= colors.len() - 1 {
        return [last[0], last[1], last[2], 255];
    }

    let t = position - index as f32;
    let rgb = lerp_color(colors[index], colors[index + 1], t);
    [rgb[0], rgb[1], rgb[2], 255]
}

/// Colormap interpolating a fixed color table
#[derive(Debug, Clone)]
pub struct ListedColormap {
    name: String,
    colors: Vec<[u8; 3]>,
    cyclic: bool,
}

impl ListedColormap {
    pub fn new(name: &str, colors: Vec<[u8; 3]>, cyclic: bool) -> Result<Self> {
        if colors.is_empty() {
            return Err(PlotError::invalid_parameter(
                "colors",
                format!("colormap {} needs at least one color", name),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            colors,
            cyclic,
        })
    }
}

impl Colormap for ListedColormap {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        interpolate_table(&self.colors, value)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

/// Colormap sampled from a `colorgrad` gradient
#[derive(Debug, Clone)]
pub struct GradientColormap {
    name: String,
    table: Vec<[u8; 3]>,
    cyclic: bool,
}

impl GradientColormap {
    pub fn from_gradient(name: &str, gradient: &colorgrad::Gradient, cyclic: bool) -> Self {
        let (dmin, dmax) = gradient.domain();
        let table = (0..GRADIENT_SAMPLES)
            .map(|i| {
                let t = i as f64 / (GRADIENT_SAMPLES - 1) as f64;
                let [r, g, b, _] = gradient.at(dmin + t * (dmax - dmin)).to_rgba8();
                [r, g, b]
            })
            .collect();
        Self {
            name: name.to_string(),
            table,
            cyclic,
        }
    }
}

impl Colormap for GradientColormap {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        interpolate_table(&self.table, value)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

static REGISTRY: Lazy<BTreeMap<&'static str, Arc<dyn Colormap>>> = Lazy::new(|| {
    use super::{cyclic::*, diverging::*, sequential::*};

    let mut maps: BTreeMap<&'static str, Arc<dyn Colormap>> = BTreeMap::new();
    maps.insert("viridis", Arc::new(viridis()));
    maps.insert("plasma", Arc::new(plasma()));
    maps.insert("inferno", Arc::new(inferno()));
    maps.insert("magma", Arc::new(magma()));
    maps.insert("cividis", Arc::new(cividis()));
    maps.insert("turbo", Arc::new(turbo()));
    maps.insert("coolwarm", Arc::new(Coolwarm));
    maps.insert("rdbu", Arc::new(RdBu));
    maps.insert("seismic", Arc::new(Seismic));
    maps.insert("spectral", Arc::new(spectral()));
    maps.insert("sinebow", Arc::new(sinebow()));
    maps.insert("rainbow", Arc::new(rainbow()));
    maps.insert("twilight", Arc::new(Twilight));
    maps
});

/// Get a colormap by name (case-insensitive)
pub fn get_colormap(name: &str) -> Result<Arc<dyn Colormap>> {
    REGISTRY
        .get(name.to_lowercase().as_str())
        .cloned()
        .ok_or_else(|| PlotError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Unknown colormap: {}", name),
        })
}

/// Names of all registered colormaps, sorted
pub fn colormap_names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}
