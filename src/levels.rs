//! Level generation and validation.
//!
//! Levels are the boundaries between discrete color bins. This module checks
//! user-supplied level sequences, converts between bin centers and bin edges,
//! and picks "nice" levels automatically when only a count is requested.

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, Result};
use crate::norm::{build_norm, Extend, Normalize};

/// Candidate step multipliers for automatic levels (times a power of ten)
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Direction of a strictly monotonic sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// How the caller asked for levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelSpec {
    /// Roughly this many levels at nice intervals
    Count(usize),
    /// Exactly these level edges
    Explicit(Vec<f64>),
    /// Level centers; edges are inferred around them
    Values(Vec<f64>),
}

/// Options for automatic level selection
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AutoLevelOptions {
    /// Hard lower limit; replaces the data minimum
    pub vmin: Option<f64>,
    /// Hard upper limit; replaces the data maximum
    pub vmax: Option<f64>,
    /// Make levels symmetric about zero
    pub symmetric: bool,
    /// Extend mode of the plot, which permits out-of-range data
    pub extend: Extend,
    /// Place levels at powers of ten and subdivide them in log space
    pub log: bool,
}

/// Check that a sequence is strictly monotonic, finite and has at least 2 entries.
///
/// `what` names the sequence in error messages (e.g. "levels", "values").
pub fn check_monotonic(values: &[f64], what: &str) -> Result<Direction> {
    if values.len() < 2 {
        return Err(PlotError::invalid_levels(format!(
            "{} must have at least 2 entries, got {}",
            what,
            values.len()
        )));
    }

    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(PlotError::invalid_levels(format!(
            "{} must be finite, got {} in {:?}",
            what, bad, values
        )));
    }

    let ascending = values.windows(2).all(|w| w[1] > w[0]);
    let descending = values.windows(2).all(|w| w[1] < w[0]);

    match (ascending, descending) {
        (true, _) => Ok(Direction::Ascending),
        (_, true) => Ok(Direction::Descending),
        _ => Err(PlotError::invalid_levels(format!(
            "{} must be strictly monotonic without duplicates, got {:?}",
            what, values
        ))),
    }
}

/// Convert N bin centers into N+1 bin edges.
///
/// Interior edges are midpoints between neighbours; the outer edges are
/// extrapolated by half the adjacent step.
pub fn edges(centers: &[f64]) -> Result<Vec<f64>> {
    if centers.len() < 2 {
        return Err(PlotError::invalid_parameter(
            "centers",
            format!("need at least 2 centers to infer edges, got {}", centers.len()),
        ));
    }

    let n = centers.len();
    let mut out = Vec::with_capacity(n + 1);
    out.push(0.0);
    out.extend(centers.windows(2).map(|w| 0.5 * (w[0] + w[1])));
    out.push(0.0);
    out[0] = 2.0 * centers[0] - out[1];
    out[n] = 2.0 * centers[n - 1] - out[n - 1];
    Ok(out)
}

/// Convert N+1 bin edges into N bin centers.
pub fn centers(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Infer level edges from level centers.
///
/// Edges are chosen so that each value is the average of the two levels
/// surrounding it, which keeps colorbar ticks in the middle of each bin.
/// If that walk produces a non-monotonic sequence the midpoint rule of
/// [`edges`] is used instead. With a normalizer, edges are computed in
/// normalized space and mapped back.
pub fn levels_from_values(values: &[f64], norm: Option<&dyn Normalize>) -> Result<Vec<f64>> {
    let direction = check_monotonic(values, "values")?;

    if let Some(norm) = norm {
        let normalized: Vec<f64> = values.iter().map(|&v| norm.normalize(v)).collect();
        let levels: Vec<f64> = edges(&normalized)?
            .into_iter()
            .map(|v| norm.inverse(v))
            .collect();
        check_monotonic(&levels, "levels")?;
        return Ok(levels);
    }

    let mut levels = Vec::with_capacity(values.len() + 1);
    levels.push(values[0] - (values[1] - values[0]) / 2.0);
    for &value in values {
        let last = levels[levels.len() - 1];
        levels.push(2.0 * value - last);
    }

    match check_monotonic(&levels, "levels") {
        Ok(found) if found == direction => Ok(levels),
        _ => edges(values),
    }
}

/// Minimum and maximum of the finite values, or `(0, 1)` when there are none
/// or they are all equal.
pub fn data_limits<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() || min == max {
        (0.0, 1.0)
    } else {
        (min, max)
    }
}

/// Ticks at a "nice" step covering `[vmin, vmax]` with at most `nbins` intervals.
fn nice_ticks(vmin: f64, vmax: f64, nbins: usize) -> Vec<f64> {
    let nbins = nbins.max(1) as f64;
    let raw_step = (vmax - vmin) / nbins;
    let scale = 10f64.powf(raw_step.log10().floor());

    let mut chosen = None;
    for multiplier in NICE_STEPS {
        let step = multiplier * scale;
        if step < raw_step * (1.0 - 1e-9) {
            continue;
        }
        let lo = (vmin / step + 1e-9).floor();
        let hi = (vmax / step - 1e-9).ceil();
        if hi - lo <= nbins + 1e-9 {
            chosen = Some((lo as i64, hi as i64, step));
            break;
        }
    }
    // The 10x step always satisfies the bound; fall back to it otherwise.
    let (lo, hi, step) = chosen.unwrap_or_else(|| {
        let step = 10.0 * scale;
        ((vmin / step).floor() as i64, (vmax / step).ceil() as i64, step)
    });

    (lo..=hi).map(|k| round_tick(k as f64 * step, step)).collect()
}

/// Powers of ten covering `[vmin, vmax]`, skipping decades so that there
/// are at most `count` intervals. Both limits must be positive.
fn log_ticks(vmin: f64, vmax: f64, count: usize) -> Vec<f64> {
    let lo = (vmin.log10() + 1e-9).floor() as i32;
    let mut hi = (vmax.log10() - 1e-9).ceil() as i32;
    if hi <= lo {
        hi = lo + 1;
    }
    let decades = (hi - lo) as usize;
    let stride = ((decades + count - 1) / count).max(1);
    let steps = (decades + stride - 1) / stride;
    (0..=steps)
        .map(|k| 10f64.powi(lo + (k * stride) as i32))
        .collect()
}

/// Snap floating noise (e.g. 0.30000000000000004) to the step's precision.
fn round_tick(value: f64, step: f64) -> f64 {
    let digits = (-step.log10().floor() + 3.0).clamp(0.0, 15.0) as i32;
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Pick roughly `count` levels at nice intervals spanning the data range.
///
/// Hard limits from `options` replace the data limits. Levels the locator
/// placed beyond the limits are trimmed unless a hard limit or the extend mode
/// allows out-of-range data there. When the locator returns far fewer levels
/// than requested, every interval is evenly subdivided.
pub fn auto_levels(
    data_min: f64,
    data_max: f64,
    count: usize,
    options: &AutoLevelOptions,
) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(PlotError::invalid_parameter(
            "levels",
            "level count must be positive",
        ));
    }

    let hard_min = options.vmin.is_some();
    let hard_max = options.vmax.is_some();
    let mut vmin = options.vmin.unwrap_or(data_min);
    let mut vmax = options.vmax.unwrap_or(data_max);

    if !vmin.is_finite() || !vmax.is_finite() {
        return Err(PlotError::invalid_parameter(
            "vmin/vmax",
            format!("limits must be finite, got ({}, {})", vmin, vmax),
        ));
    }
    if vmin > vmax {
        std::mem::swap(&mut vmin, &mut vmax);
    }
    if options.log && vmin <= 0.0 {
        return Err(PlotError::invalid_parameter(
            "vmin",
            format!("logarithmic levels need positive limits, got {}", vmin),
        ));
    }
    if vmin == vmax {
        if options.log {
            vmin /= 2.0;
            vmax *= 2.0;
        } else {
            let pad = if vmin == 0.0 { 1.0 } else { vmin.abs() * 0.05 };
            vmin -= pad;
            vmax += pad;
        }
    }
    // Log levels cannot straddle zero
    let symmetric = options.symmetric && !options.log;
    if symmetric {
        let bound = vmin.abs().max(vmax.abs());
        vmin = -bound;
        vmax = bound;
    }

    let mut levels = if options.log {
        log_ticks(vmin, vmax, count)
    } else {
        nice_ticks(vmin, vmax, count)
    };

    if !symmetric {
        let mut i0 = 0;
        let mut i1 = levels.len();
        if let Some(last_under) = levels.iter().rposition(|&l| l < vmin) {
            i0 = last_under;
            if hard_min || options.extend.extends_min() {
                i0 += 1;
            }
        }
        if let Some(first_over) = levels.iter().position(|&l| l > vmax) {
            i1 = first_over + 1;
            if hard_max || options.extend.extends_max() {
                i1 -= 1;
            }
        }
        if i1 >= i0 + 3 {
            levels = levels[i0..i1].to_vec();
        }
    }

    // Subdivide in the space the levels are spaced evenly in
    let (forward, inverse): (fn(f64) -> f64, fn(f64) -> f64) = if options.log {
        (f64::log10, |x| 10f64.powf(x))
    } else {
        (|x| x, |x| x)
    };
    let factor = count / levels.len();
    if factor >= 2 {
        let mut dense = Vec::with_capacity(factor * levels.len());
        for w in levels.windows(2) {
            let (lo, hi) = (forward(w[0]), forward(w[1]));
            let step = (hi - lo) / factor as f64;
            dense.extend((0..factor).map(|k| inverse(lo + step * k as f64)));
        }
        dense.push(levels[levels.len() - 1]);
        levels = dense;
    }

    Ok(levels)
}

/// Resolve a level request against the data limits.
///
/// `norm` names the normalizer the levels will be used with. A `"log"`
/// normalizer switches automatic levels to powers of ten. Level centers are
/// turned into edges in that normalizer's space, except for the segmented
/// normalizer, which keeps the data-space walk.
pub fn resolve_levels(
    spec: &LevelSpec,
    data_min: f64,
    data_max: f64,
    options: &AutoLevelOptions,
    norm: Option<&str>,
) -> Result<Vec<f64>> {
    let norm = norm.map(str::to_ascii_lowercase);
    let norm = norm.as_deref();
    match spec {
        LevelSpec::Count(count) => {
            let options = AutoLevelOptions {
                log: options.log || norm == Some("log"),
                ..*options
            };
            auto_levels(data_min, data_max, *count, &options)
        }
        LevelSpec::Explicit(levels) => {
            check_monotonic(levels, "levels")?;
            Ok(levels.clone())
        }
        LevelSpec::Values(values) => match norm {
            None | Some("segmented") | Some("segments") => levels_from_values(values, None),
            Some(name) => {
                let norm = build_norm(name, values)?;
                levels_from_values(values, Some(norm.as_ref()))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::norm::LogNorm;

    #[test]
    fn test_check_monotonic() {
        assert_eq!(
            check_monotonic(&[0.0, 1.0, 2.0], "levels").unwrap(),
            Direction::Ascending
        );
        assert_eq!(
            check_monotonic(&[2.0, 1.0, 0.0], "levels").unwrap(),
            Direction::Descending
        );

        // Too short, non-monotonic, duplicated, non-finite
        assert!(check_monotonic(&[1.0], "levels").is_err());
        assert!(check_monotonic(&[3.0, 2.0, 5.0], "levels").is_err());
        assert!(check_monotonic(&[0.0, 1.0, 1.0], "levels").is_err());
        assert!(check_monotonic(&[0.0, f64::NAN, 2.0], "levels").is_err());

        match check_monotonic(&[3.0, 2.0, 5.0], "levels") {
            Err(PlotError::InvalidLevels { message }) => assert!(message.contains("monotonic")),
            other => panic!("Expected InvalidLevels, got {:?}", other),
        }
    }

    #[test]
    fn test_edges_and_centers() {
        let e = edges(&[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(e, vec![-0.5, 0.5, 1.5, 2.5]);
        assert_eq!(centers(&e), vec![0.0, 1.0, 2.0]);

        assert!(edges(&[1.0]).is_err());
        assert!(centers(&[1.0]).is_empty());
    }

    #[test]
    fn test_levels_from_values() {
        // Each value sits in the middle of its bin
        let levels = levels_from_values(&[1.0, 2.0, 4.0], None).unwrap();
        assert_eq!(levels, vec![0.5, 1.5, 2.5, 5.5]);
        for (i, v) in [1.0, 2.0, 4.0].iter().enumerate() {
            assert!(((levels[i] + levels[i + 1]) / 2.0 - v).abs() < 1e-12);
        }

        // The walk breaks for these values, so midpoints are used
        let levels = levels_from_values(&[0.0, 10.0, 11.0], None).unwrap();
        assert_eq!(levels, vec![-5.0, 5.0, 10.5, 11.5]);

        assert!(levels_from_values(&[1.0, 1.0], None).is_err());
    }

    #[test]
    fn test_levels_from_values_log() {
        let norm = LogNorm::new(1.0, 100.0).unwrap();
        let levels = levels_from_values(&[1.0, 10.0, 100.0], Some(&norm)).unwrap();
        let expected = [10f64.powf(-0.5), 10f64.powf(0.5), 10f64.powf(1.5), 10f64.powf(2.5)];
        for (a, e) in levels.iter().zip(expected.iter()) {
            assert!((a - e).abs() / e < 1e-9, "{} vs {}", a, e);
        }
    }

    #[test]
    fn test_data_limits() {
        assert_eq!(data_limits(vec![1.0, f64::NAN, -2.0, 5.0]), (-2.0, 5.0));
        assert_eq!(data_limits(Vec::<f64>::new()), (0.0, 1.0));
        assert_eq!(data_limits(vec![3.0, 3.0]), (0.0, 1.0));
        assert_eq!(data_limits(vec![f64::NAN]), (0.0, 1.0));
    }

    #[test]
    fn test_auto_levels_nice() {
        let levels = auto_levels(0.0, 1.0, 10, &AutoLevelOptions::default()).unwrap();
        assert_eq!(levels.len(), 11);
        assert_eq!(levels[0], 0.0);
        assert_eq!(levels[10], 1.0);
        assert_eq!(levels[3], 0.3);

        let levels = auto_levels(-3.7, 18.2, 5, &AutoLevelOptions::default()).unwrap();
        assert_eq!(levels, vec![-5.0, 0.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_auto_levels_trimming() {
        // The locator covers [0, 10] for data in [0.5, 9.5]; with extend=both
        // the outer levels are trimmed so out-of-range bins get used
        let options = AutoLevelOptions {
            extend: Extend::Both,
            ..Default::default()
        };
        let levels = auto_levels(0.5, 9.5, 5, &options).unwrap();
        assert_eq!(levels, vec![2.0, 4.0, 6.0, 8.0]);

        let levels = auto_levels(0.5, 9.5, 5, &AutoLevelOptions::default()).unwrap();
        assert_eq!(levels, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_auto_levels_symmetric() {
        let options = AutoLevelOptions {
            symmetric: true,
            ..Default::default()
        };
        let levels = auto_levels(-2.0, 7.5, 8, &options).unwrap();
        assert_eq!(levels[0], -levels[levels.len() - 1]);
        assert!(levels.contains(&0.0));
    }

    #[test]
    fn test_auto_levels_dense_request() {
        let levels = auto_levels(0.0, 2.0, 9, &AutoLevelOptions::default()).unwrap();
        assert_eq!(levels.len(), 9);
        assert_eq!(levels[1], 0.25);
        assert!(check_monotonic(&levels, "levels").is_ok());
    }

    #[test]
    fn test_auto_levels_degenerate() {
        let levels = auto_levels(5.0, 5.0, 4, &AutoLevelOptions::default()).unwrap();
        assert!(levels[0] <= 5.0 && levels[levels.len() - 1] >= 5.0);
        assert!(auto_levels(0.0, 1.0, 0, &AutoLevelOptions::default()).is_err());
        assert!(auto_levels(f64::NAN, 1.0, 4, &AutoLevelOptions::default()).is_err());
    }

    #[test]
    fn test_resolve_levels() {
        let opts = AutoLevelOptions::default();
        let explicit = LevelSpec::Explicit(vec![0.0, 1.0, 3.0]);
        assert_eq!(
            resolve_levels(&explicit, 0.0, 1.0, &opts, None).unwrap(),
            vec![0.0, 1.0, 3.0]
        );

        let bad = LevelSpec::Explicit(vec![3.0, 2.0, 5.0]);
        assert!(matches!(
            resolve_levels(&bad, 0.0, 1.0, &opts, None),
            Err(PlotError::InvalidLevels { .. })
        ));

        let values = LevelSpec::Values(vec![0.0, 1.0, 2.0]);
        assert_eq!(
            resolve_levels(&values, 0.0, 1.0, &opts, None).unwrap(),
            vec![-0.5, 0.5, 1.5, 2.5]
        );
    }

    #[test]
    fn test_log_auto_levels() {
        let options = AutoLevelOptions {
            log: true,
            ..Default::default()
        };
        let levels = auto_levels(1.0, 1000.0, 4, &options).unwrap();
        assert_eq!(levels, vec![1.0, 10.0, 100.0, 1000.0]);

        // Too few decades for the request: subdivided evenly in log space
        let levels = auto_levels(1.0, 1000.0, 11, &options).unwrap();
        assert_eq!(levels.len(), 7);
        assert_eq!(levels[0], 1.0);
        assert!((levels[1] - 10f64.sqrt()).abs() < 1e-9);
        assert!((levels[6] - 1000.0).abs() < 1e-9);

        // Many decades: every other power of ten
        let levels = auto_levels(1e-3, 1e5, 4, &options).unwrap();
        assert_eq!(levels.len(), 5);
        assert!((levels[1] / 0.1 - 1.0).abs() < 1e-12);

        assert!(matches!(
            auto_levels(0.0, 10.0, 5, &options),
            Err(PlotError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_resolve_levels_with_log_norm() {
        let opts = AutoLevelOptions::default();
        let levels =
            resolve_levels(&LevelSpec::Count(4), 1.0, 1000.0, &opts, Some("log")).unwrap();
        assert_eq!(levels, vec![1.0, 10.0, 100.0, 1000.0]);

        // Centers one decade apart get edges half a decade around them
        let values = LevelSpec::Values(vec![1.0, 10.0, 100.0]);
        let levels = resolve_levels(&values, 0.0, 1.0, &opts, Some("log")).unwrap();
        let expected = [-0.5, 0.5, 1.5, 2.5];
        assert_eq!(levels.len(), 4);
        for (level, exponent) in levels.iter().zip(expected) {
            assert!((level.log10() - exponent).abs() < 1e-9);
        }

        // Segmented keeps the data-space walk
        let values = LevelSpec::Values(vec![0.0, 1.0, 2.0]);
        assert_eq!(
            resolve_levels(&values, 0.0, 1.0, &opts, Some("segmented")).unwrap(),
            vec![-0.5, 0.5, 1.5, 2.5]
        );
    }
}
