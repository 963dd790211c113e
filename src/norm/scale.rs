//! Continuous normalizers.
//!
//! A normalizer maps data values into `[0, 1]` space. The bin normalizer uses
//! one to decide how far apart the colors of neighbouring bins are; level
//! generation uses one to place levels in a warped space.

use crate::error::{PlotError, Result};
use crate::levels::{check_monotonic, Direction};

/// Smallest value passed to a logarithm; non-positive data is clipped to it
const LOG_FLOOR: f64 = 5e-249;

/// Trait for data-to-unit-interval normalizers
pub trait Normalize: Send + Sync + std::fmt::Debug {
    /// Map a data value to normalized space (0 at `vmin`, 1 at `vmax`)
    fn normalize(&self, value: f64) -> f64;

    /// Map a normalized value back to data space
    fn inverse(&self, value: f64) -> f64;

    /// Lower data limit
    fn vmin(&self) -> f64;

    /// Upper data limit
    fn vmax(&self) -> f64;

    /// Get the name of this normalizer
    fn name(&self) -> &str;
}

fn check_limits(vmin: f64, vmax: f64) -> Result<()> {
    if !vmin.is_finite() || !vmax.is_finite() || vmin >= vmax {
        return Err(PlotError::invalid_parameter(
            "vmin/vmax",
            format!("need finite vmin < vmax, got ({}, {})", vmin, vmax),
        ));
    }
    Ok(())
}

/// Linear normalizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearNorm {
    vmin: f64,
    vmax: f64,
}

impl LinearNorm {
    pub fn new(vmin: f64, vmax: f64) -> Result<Self> {
        check_limits(vmin, vmax)?;
        Ok(Self { vmin, vmax })
    }
}

impl Normalize for LinearNorm {
    fn normalize(&self, value: f64) -> f64 {
        (value - self.vmin) / (self.vmax - self.vmin)
    }

    fn inverse(&self, value: f64) -> f64 {
        self.vmin + value * (self.vmax - self.vmin)
    }

    fn vmin(&self) -> f64 {
        self.vmin
    }

    fn vmax(&self) -> f64 {
        self.vmax
    }

    fn name(&self) -> &str {
        "linear"
    }
}

/// Base-10 logarithmic normalizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNorm {
    vmin: f64,
    vmax: f64,
}

impl LogNorm {
    pub fn new(vmin: f64, vmax: f64) -> Result<Self> {
        check_limits(vmin, vmax)?;
        if vmin <= 0.0 {
            return Err(PlotError::invalid_parameter(
                "vmin",
                format!("logarithmic normalizer needs positive limits, got {}", vmin),
            ));
        }
        Ok(Self { vmin, vmax })
    }
}

impl Normalize for LogNorm {
    fn normalize(&self, value: f64) -> f64 {
        let lo = self.vmin.log10();
        let hi = self.vmax.log10();
        (value.max(LOG_FLOOR).log10() - lo) / (hi - lo)
    }

    fn inverse(&self, value: f64) -> f64 {
        let lo = self.vmin.log10();
        let hi = self.vmax.log10();
        10f64.powf(lo + value * (hi - lo))
    }

    fn vmin(&self) -> f64 {
        self.vmin
    }

    fn vmax(&self) -> f64 {
        self.vmax
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Piecewise-linear normalizer sending the i-th of N levels to `i / (N-1)`.
///
/// Unevenly spaced levels therefore get evenly spaced colors. Values outside
/// the levels are clipped to 0 or 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedNorm {
    levels: Vec<f64>,
}

impl SegmentedNorm {
    pub fn new(levels: &[f64]) -> Result<Self> {
        if check_monotonic(levels, "levels")? != Direction::Ascending {
            return Err(PlotError::invalid_levels(format!(
                "segmented normalizer needs ascending levels, got {:?}",
                levels
            )));
        }
        Ok(Self {
            levels: levels.to_vec(),
        })
    }

    fn step(&self) -> f64 {
        1.0 / (self.levels.len() - 1) as f64
    }
}

impl Normalize for SegmentedNorm {
    fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        let n = self.levels.len();
        if value <= self.levels[0] {
            return 0.0;
        }
        if value >= self.levels[n - 1] {
            return 1.0;
        }
        let i = self.levels.partition_point(|&l| l <= value) - 1;
        let (lo, hi) = (self.levels[i], self.levels[i + 1]);
        (i as f64 + (value - lo) / (hi - lo)) * self.step()
    }

    fn inverse(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        let n = self.levels.len();
        let position = (value.clamp(0.0, 1.0) * (n - 1) as f64).min((n - 1) as f64);
        let i = (position.floor() as usize).min(n - 2);
        let t = position - i as f64;
        self.levels[i] + t * (self.levels[i + 1] - self.levels[i])
    }

    fn vmin(&self) -> f64 {
        self.levels[0]
    }

    fn vmax(&self) -> f64 {
        self.levels[self.levels.len() - 1]
    }

    fn name(&self) -> &str {
        "segmented"
    }
}

/// Normalizer that maps `midpoint` to 0.5, scaling each side independently
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidpointNorm {
    vmin: f64,
    midpoint: f64,
    vmax: f64,
}

impl MidpointNorm {
    pub fn new(vmin: f64, midpoint: f64, vmax: f64) -> Result<Self> {
        check_limits(vmin, vmax)?;
        if !(vmin < midpoint && midpoint < vmax) {
            return Err(PlotError::invalid_parameter(
                "midpoint",
                format!(
                    "midpoint {} must lie strictly between vmin {} and vmax {}",
                    midpoint, vmin, vmax
                ),
            ));
        }
        Ok(Self {
            vmin,
            midpoint,
            vmax,
        })
    }
}

impl Normalize for MidpointNorm {
    fn normalize(&self, value: f64) -> f64 {
        if value < self.midpoint {
            0.5 * (value - self.vmin) / (self.midpoint - self.vmin)
        } else {
            0.5 + 0.5 * (value - self.midpoint) / (self.vmax - self.midpoint)
        }
    }

    fn inverse(&self, value: f64) -> f64 {
        if value < 0.5 {
            self.vmin + 2.0 * value * (self.midpoint - self.vmin)
        } else {
            self.midpoint + 2.0 * (value - 0.5) * (self.vmax - self.midpoint)
        }
    }

    fn vmin(&self) -> f64 {
        self.vmin
    }

    fn vmax(&self) -> f64 {
        self.vmax
    }

    fn name(&self) -> &str {
        "midpoint"
    }
}

/// Pick the default normalizer for a level sequence.
///
/// Evenly spaced levels use a linear normalizer; anything else uses the
/// segmented one, so every bin still gets an equal share of the colormap.
pub fn default_norm_name(levels: &[f64]) -> &'static str {
    if levels.len() < 3 {
        return "linear";
    }
    let diffs: Vec<f64> = levels.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
    let eps = mean.abs() / 1e3;
    if diffs.windows(2).any(|w| (w[1] - w[0]).abs() >= eps) {
        "segmented"
    } else {
        "linear"
    }
}

/// Build a normalizer by name, with limits taken from `levels`.
pub fn build_norm(name: &str, levels: &[f64]) -> Result<Box<dyn Normalize>> {
    let direction = check_monotonic(levels, "levels")?;
    let mut ascending = levels.to_vec();
    if direction == Direction::Descending {
        ascending.reverse();
    }
    let vmin = ascending[0];
    let vmax = ascending[ascending.len() - 1];

    match name.to_lowercase().as_str() {
        "linear" => Ok(Box::new(LinearNorm::new(vmin, vmax)?)),
        "log" => Ok(Box::new(LogNorm::new(vmin, vmax)?)),
        "segmented" | "segments" => Ok(Box::new(SegmentedNorm::new(&ascending)?)),
        "midpoint" => Ok(Box::new(MidpointNorm::new(vmin, 0.0, vmax)?)),
        _ => Err(PlotError::InvalidParameter {
            param: "norm".to_string(),
            message: format!(
                "Unknown normalizer: {}. Must be one of: linear, log, segmented, midpoint",
                name
            ),
        }),
    }
}
