//! Colormap implementations for discrete color lookup.
//!
//! This module provides matplotlib-inspired colormaps, each of which can
//! produce a lookup table of any size for the bin normalizer to index into.

pub mod colormap;
pub mod cyclic;
pub mod diverging;
pub mod sequential;

pub use colormap::{
    colormap_names, get_colormap, Colormap, GradientColormap, ListedColormap,
};

// Re-export commonly used colormaps
pub use cyclic::{rainbow, sinebow, Twilight};
pub use diverging::{spectral, Coolwarm, RdBu, Seismic};
pub use sequential::{cividis, inferno, magma, plasma, turbo, viridis};
