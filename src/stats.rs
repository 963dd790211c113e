//! Column statistics for 1D overlays: error bars, box summaries and violin
//! densities.
//!
//! Inputs are 2D arrays with one sample per row and one distribution per
//! column. NaN samples are ignored.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::Serialize;

use crate::error::{PlotError, Result};

/// Whisker reach in multiples of the interquartile range
const WHISKER_IQR: f64 = 1.5;

/// How error bar bounds are computed
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorRange {
    /// Lower and upper percentiles, in `[0, 100]`
    Percentile(f64, f64),
    /// Multiples of the column standard deviation added to the centers
    StdDev(f64, f64),
    /// Absolute bounds with shape `(2, ncols)`
    Explicit(Array2<f64>),
}

impl ErrorRange {
    /// Thin bar range: full data range or three standard deviations
    pub fn default_bars(std: bool) -> Self {
        if std {
            ErrorRange::StdDev(-3.0, 3.0)
        } else {
            ErrorRange::Percentile(0.0, 100.0)
        }
    }

    /// Thick box range: interquartile range or one standard deviation
    pub fn default_boxes(std: bool) -> Self {
        if std {
            ErrorRange::StdDev(-1.0, 1.0)
        } else {
            ErrorRange::Percentile(25.0, 75.0)
        }
    }
}

/// Summary statistics for a box plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    /// Samples outside the whiskers
    pub fliers: Vec<f64>,
}

/// Kernel density estimate sampled on an even grid
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    pub grid: Array1<f64>,
    pub density: Array1<f64>,
    pub bandwidth: f64,
}

/// Sorted finite samples of a column
fn sorted_samples(column: ArrayView1<f64>) -> Result<Vec<f64>> {
    let mut values: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return Err(PlotError::invalid_parameter(
            "data",
            "column has no valid samples",
        ));
    }
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with `ddof` delta degrees of freedom
fn std_dev(values: &[f64], ddof: usize) -> f64 {
    if values.len() <= ddof {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - ddof) as f64).sqrt()
}

fn check_columns(data: &ArrayView2<f64>) -> Result<()> {
    if data.ncols() == 0 || data.nrows() == 0 {
        return Err(PlotError::invalid_parameter(
            "data",
            format!("expected a non-empty 2D array, got shape {:?}", data.shape()),
        ));
    }
    Ok(())
}

/// Percentile `q` (0 to 100) of sorted values, with linear interpolation
/// between closest ranks.
pub fn percentile(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(PlotError::invalid_parameter("data", "no samples"));
    }
    if !(0.0..=100.0).contains(&q) {
        return Err(PlotError::invalid_parameter(
            "percentile",
            format!("must be within [0, 100], got {}", q),
        ));
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Mean of every column
pub fn column_means(data: ArrayView2<f64>) -> Result<Array1<f64>> {
    check_columns(&data)?;
    data.axis_iter(Axis(1))
        .map(|col| sorted_samples(col).map(|v| mean(&v)))
        .collect::<Result<Vec<_>>>()
        .map(Array1::from)
}

/// Median of every column
pub fn column_medians(data: ArrayView2<f64>) -> Result<Array1<f64>> {
    check_columns(&data)?;
    data.axis_iter(Axis(1))
        .map(|col| sorted_samples(col).and_then(|v| percentile(&v, 50.0)))
        .collect::<Result<Vec<_>>>()
        .map(Array1::from)
}

/// Error bar sizes around `centers`.
///
/// Returns a `(2, ncols)` array: row 0 holds the distance from each center
/// down to its lower bound, row 1 the distance up to its upper bound.
pub fn errorbar_ranges(
    data: ArrayView2<f64>,
    centers: ArrayView1<f64>,
    range: &ErrorRange,
) -> Result<Array2<f64>> {
    check_columns(&data)?;
    let ncols = data.ncols();
    if centers.len() != ncols {
        return Err(PlotError::shape(format!(
            "expected {} centers, got {}",
            ncols,
            centers.len()
        )));
    }

    let mut bounds = match range {
        ErrorRange::Explicit(bounds) => {
            if bounds.dim() != (2, ncols) {
                return Err(PlotError::shape(format!(
                    "error bounds must have shape (2, {}), got {:?}",
                    ncols,
                    bounds.shape()
                )));
            }
            bounds.clone()
        }
        ErrorRange::StdDev(lo, hi) => {
            let mut bounds = Array2::zeros((2, ncols));
            for (j, col) in data.axis_iter(Axis(1)).enumerate() {
                let std = std_dev(&sorted_samples(col)?, 0);
                bounds[[0, j]] = centers[j] + std * lo;
                bounds[[1, j]] = centers[j] + std * hi;
            }
            bounds
        }
        ErrorRange::Percentile(lo, hi) => {
            let mut bounds = Array2::zeros((2, ncols));
            for (j, col) in data.axis_iter(Axis(1)).enumerate() {
                let sorted = sorted_samples(col)?;
                bounds[[0, j]] = percentile(&sorted, *lo)?;
                bounds[[1, j]] = percentile(&sorted, *hi)?;
            }
            bounds
        }
    };

    bounds -= &centers.insert_axis(Axis(0));
    bounds.row_mut(0).mapv_inplace(|v| -v);
    Ok(bounds)
}

/// Quartiles, whiskers and outliers of one column
pub fn box_summary(column: ArrayView1<f64>) -> Result<BoxSummary> {
    let sorted = sorted_samples(column)?;
    let q1 = percentile(&sorted, 25.0)?;
    let median = percentile(&sorted, 50.0)?;
    let q3 = percentile(&sorted, 75.0)?;
    let iqr = q3 - q1;
    let (lo_limit, hi_limit) = (q1 - WHISKER_IQR * iqr, q3 + WHISKER_IQR * iqr);

    // Whiskers end at the most extreme samples still inside the limits
    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= lo_limit)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= hi_limit)
        .unwrap_or(q3);
    let fliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < whisker_low || v > whisker_high)
        .collect();

    Ok(BoxSummary {
        q1,
        median,
        q3,
        mean: mean(&sorted),
        whisker_low,
        whisker_high,
        fliers,
    })
}

/// Gaussian kernel density of one column on `points` evenly spaced values
/// spanning the samples. The bandwidth follows Scott's rule.
pub fn violin_density(column: ArrayView1<f64>, points: usize) -> Result<Density> {
    if points < 2 {
        return Err(PlotError::invalid_parameter(
            "points",
            format!("need at least 2 grid points, got {}", points),
        ));
    }
    let sorted = sorted_samples(column)?;
    let n = sorted.len() as f64;
    let bandwidth = std_dev(&sorted, 1) * n.powf(-0.2);
    if bandwidth.is_nan() || bandwidth <= 0.0 {
        return Err(PlotError::invalid_parameter(
            "data",
            "density estimate needs at least two distinct samples",
        ));
    }

    let (lo, hi) = (sorted[0], sorted[sorted.len() - 1]);
    let grid = Array1::linspace(lo, hi, points);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let density = grid.mapv(|x| {
        sorted
            .iter()
            .map(|&s| (-0.5 * ((x - s) / bandwidth).powi(2)).exp())
            .sum::<f64>()
            * norm
    });

    Ok(Density {
        grid,
        density,
        bandwidth,
    })
}
