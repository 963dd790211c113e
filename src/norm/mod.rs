//! Normalizers mapping data values into colormap space.
//!
//! [`BinNorm`] assigns discrete color bins from a level sequence; the
//! continuous normalizers in [`scale`] control how those bins are spaced.

pub mod bin;
pub mod scale;

pub use bin::{Bin, BinNorm, BinNormOptions, Extend, Segment, DEFAULT_NCOLORS};
pub use scale::{
    build_norm, default_norm_name, LinearNorm, LogNorm, MidpointNorm, Normalize, SegmentedNorm,
};
