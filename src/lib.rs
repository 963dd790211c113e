//! # levelplot
//!
//! Discrete colormap normalization for 2D scientific plots.
//!
//! The core of this library is [`BinNorm`], which maps data values onto a
//! finite set of level bins and then onto evenly spaced colormap positions,
//! so every bin gets a visually distinct color no matter how unevenly the
//! levels are spaced.
//!
//! ## Key Features
//!
//! - **Discrete bins**: half-open level bins with optional out-of-range extension
//! - **Even color spacing**: bins always span the full colormap
//! - **Cyclic colormaps**: first and last bins never share a color
//! - **Plot pipeline**: coordinate inference, metadata labels and default styles
//! - **Statistics overlays**: error bars, box summaries and violin densities
//!
//! ## Architecture
//!
//! - **Normalization**: [`norm`] and [`levels`] turn data into bins and colors
//! - **Colors**: [`colormaps`] provides named lookup tables
//! - **Drawing**: [`pipeline`] prepares draw calls and renders them to images

pub mod colormaps;
pub mod config;
pub mod data;
pub mod error;
pub mod levels;
pub mod logging;
pub mod norm;
pub mod pipeline;
pub mod stats;

pub use colormaps::{get_colormap, Colormap};
pub use config::Config;
pub use data::{AttributeValue, DataValue, LabeledArray, LabeledCoordinate};
pub use error::{PlotError, Result};
pub use levels::LevelSpec;
pub use logging::{
    generate_draw_id, init_tracing, log_error, log_operation_end, log_operation_start,
    log_timed_operation,
};
pub use norm::{Bin, BinNorm, BinNormOptions, Extend, Normalize, Segment};
pub use pipeline::{render_colorbar, DrawCall, Pipeline, PlotKind, RasterRenderer};
