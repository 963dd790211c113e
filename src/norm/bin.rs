//! Discrete bin normalizer.
//!
//! [`BinNorm`] maps continuous values onto discrete color bins delimited by a
//! monotonic level sequence. Every bin gets a position in `[0, 1]` and a color
//! index into a colormap lookup table of `ncolors` entries, so the levels
//! always span the full colormap whatever the number of levels, the extend
//! mode or the table size.
//!
//! Positions are laid out in "slots": one per interior bin plus one reserved
//! slot on each extended side. Reserved slots sit at exactly 0 and 1 and the
//! interior bins are spread between them according to the child normalizer
//! (evenly by default).

use ndarray::{Array, ArrayView, Dimension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::scale::{Normalize, SegmentedNorm};
use crate::data::DataValue;
use crate::error::{PlotError, Result};
use crate::levels::{check_monotonic, Direction};

/// Default lookup table size
pub const DEFAULT_NCOLORS: usize = 256;

/// Policy for values outside the outermost levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    /// Out-of-range values are clipped into the edge bins
    #[default]
    Neither,
    /// Values below the smallest level get their own color
    Min,
    /// Values above the largest level get their own color
    Max,
    /// Both sides get their own color
    Both,
}

impl Extend {
    pub fn extends_min(self) -> bool {
        matches!(self, Extend::Min | Extend::Both)
    }

    pub fn extends_max(self) -> bool {
        matches!(self, Extend::Max | Extend::Both)
    }

    /// Number of reserved out-of-range slots (0, 1 or 2)
    pub fn reserved(self) -> usize {
        self.extends_min() as usize + self.extends_max() as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Extend::Neither => "neither",
            Extend::Min => "min",
            Extend::Max => "max",
            Extend::Both => "both",
        }
    }
}

impl fmt::Display for Extend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Extend {
    type Err = PlotError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neither" => Ok(Extend::Neither),
            "min" => Ok(Extend::Min),
            "max" => Ok(Extend::Max),
            "both" => Ok(Extend::Both),
            _ => Err(PlotError::InvalidExtend {
                value: s.to_string(),
            }),
        }
    }
}

/// The bin a value falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bin {
    /// Below the smallest level, with a reserved color
    Below,
    /// Interval index in the caller's level order, `0..=N-2`
    Interior(usize),
    /// Above the largest level, with a reserved color
    Above,
}

/// One discrete colorbar segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub bin: Bin,
    /// Lower value bound (`-inf` for the below-range segment)
    pub lower: f64,
    /// Upper value bound (`+inf` for the above-range segment)
    pub upper: f64,
    /// Position in `[0, 1]` colormap space
    pub position: f64,
    /// Index into a lookup table of `ncolors` entries
    pub color_index: usize,
}

/// Construction options for [`BinNorm`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinNormOptions {
    pub extend: Extend,
    pub ncolors: usize,
    /// The target colormap wraps around (first and last colors coincide)
    pub cyclic: bool,
}

impl Default for BinNormOptions {
    fn default() -> Self {
        Self {
            extend: Extend::Neither,
            ncolors: DEFAULT_NCOLORS,
            cyclic: false,
        }
    }
}

/// Maps values to discrete bins and colormap indices.
///
/// Immutable after construction; queries are pure.
#[derive(Debug, Clone, PartialEq)]
pub struct BinNorm {
    /// Levels in caller order
    levels: Vec<f64>,
    /// Levels sorted ascending, used for searching
    ascending: Vec<f64>,
    descending: bool,
    extend: Extend,
    ncolors: usize,
    cyclic: bool,
    /// Slot positions in ascending value order: `[below, interior.., above]`
    positions: Vec<f64>,
}

impl BinNorm {
    /// Create a normalizer with evenly spaced bin colors.
    pub fn new(levels: &[f64], extend: Extend, ncolors: usize) -> Result<Self> {
        Self::with_options(
            levels,
            BinNormOptions {
                extend,
                ncolors,
                cyclic: false,
            },
        )
    }

    /// Create a normalizer from an extend mode given as a string.
    pub fn parse(levels: &[f64], extend: &str, ncolors: usize) -> Result<Self> {
        Self::new(levels, extend.parse()?, ncolors)
    }

    pub fn with_options(levels: &[f64], options: BinNormOptions) -> Result<Self> {
        Self::with_norm(levels, options, None)
    }

    /// Create a normalizer whose bin spacing follows `norm`.
    ///
    /// The child normalizer warps the level centers before they are spread
    /// over the colormap; `None` spaces bins evenly.
    pub fn with_norm(
        levels: &[f64],
        options: BinNormOptions,
        norm: Option<&dyn Normalize>,
    ) -> Result<Self> {
        let direction = check_monotonic(levels, "levels")?;
        if options.ncolors == 0 {
            return Err(PlotError::invalid_parameter(
                "ncolors",
                "colormap must have at least one color",
            ));
        }

        let descending = direction == Direction::Descending;
        let mut ascending = levels.to_vec();
        if descending {
            ascending.reverse();
        }

        let mut extend = options.extend;
        if options.cyclic && extend != Extend::Neither {
            warn!(
                extend = %extend,
                "Cyclic colormap requires extend=neither, overriding"
            );
            extend = Extend::Neither;
        }

        let even;
        let norm = match norm {
            Some(norm) => norm,
            None => {
                even = SegmentedNorm::new(&ascending)?;
                &even as &dyn Normalize
            }
        };

        let mut positions = slot_positions(&ascending, norm, extend, options.cyclic)?;
        if descending {
            for p in positions.iter_mut() {
                *p = 1.0 - *p;
            }
        }

        Ok(Self {
            levels: levels.to_vec(),
            ascending,
            descending,
            extend,
            ncolors: options.ncolors,
            cyclic: options.cyclic,
            positions,
        })
    }

    /// Levels in caller order
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Number of interior bins (N-1)
    pub fn nbins(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of distinct bins values can land in, extend bins included
    pub fn used_bins(&self) -> usize {
        self.nbins() + self.extend.reserved()
    }

    /// Effective extend mode (cyclic normalizers always use `Neither`)
    pub fn extend(&self) -> Extend {
        self.extend
    }

    pub fn ncolors(&self) -> usize {
        self.ncolors
    }

    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub fn vmin(&self) -> f64 {
        self.ascending[0]
    }

    pub fn vmax(&self) -> f64 {
        self.ascending[self.ascending.len() - 1]
    }

    /// Slot in ascending order after the extend policy, or `None` for NaN.
    ///
    /// Slot 0 is below range, slot `nbins + 1` above range.
    fn slot(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let nbins = self.nbins();
        let slot = if value < self.vmin() {
            if self.extend.extends_min() {
                0
            } else {
                1
            }
        } else if value > self.vmax() {
            if self.extend.extends_max() {
                nbins + 1
            } else {
                nbins
            }
        } else {
            // Bins are [l_i, l_i+1); the top level belongs to the last bin
            let i = self.ascending.partition_point(|&l| l <= value);
            i.min(nbins)
        };
        Some(slot)
    }

    fn slot_to_bin(&self, slot: usize) -> Bin {
        let nbins = self.nbins();
        match slot {
            0 => Bin::Below,
            s if s == nbins + 1 => Bin::Above,
            s if self.descending => Bin::Interior(nbins - s),
            s => Bin::Interior(s - 1),
        }
    }

    fn bin_to_slot(&self, bin: Bin) -> usize {
        let nbins = self.nbins();
        match bin {
            Bin::Below => 0,
            Bin::Above => nbins + 1,
            Bin::Interior(i) if self.descending => nbins - i,
            Bin::Interior(i) => i + 1,
        }
    }

    fn position_to_index(&self, position: f64) -> usize {
        let index = (position * self.ncolors as f64).floor();
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(self.ncolors - 1)
        }
    }

    /// Which bin a value falls into, or `None` for NaN.
    pub fn bin(&self, value: f64) -> Option<Bin> {
        self.slot(value).map(|s| self.slot_to_bin(s))
    }

    /// Position of a value's bin in `[0, 1]` colormap space.
    pub fn position(&self, value: f64) -> Option<f64> {
        self.slot(value).map(|s| self.positions[s])
    }

    /// Index into a lookup table of `ncolors` entries, or `None` for NaN.
    pub fn color_index(&self, value: f64) -> Option<usize> {
        self.position(value).map(|p| self.position_to_index(p))
    }

    /// Position assigned to a bin
    pub fn bin_position(&self, bin: Bin) -> Result<f64> {
        self.check_bin(bin)?;
        Ok(self.positions[self.bin_to_slot(bin)])
    }

    /// Color index assigned to a bin
    pub fn bin_color_index(&self, bin: Bin) -> Result<usize> {
        Ok(self.position_to_index(self.bin_position(bin)?))
    }

    fn check_bin(&self, bin: Bin) -> Result<()> {
        let valid = match bin {
            Bin::Below => self.extend.extends_min(),
            Bin::Above => self.extend.extends_max(),
            Bin::Interior(i) => i < self.nbins(),
        };
        if valid {
            Ok(())
        } else {
            Err(PlotError::invalid_parameter(
                "bin",
                format!(
                    "{:?} is not used with {} levels and extend={}",
                    bin,
                    self.levels.len(),
                    self.extend
                ),
            ))
        }
    }

    pub fn bins(&self, values: &[f64]) -> Vec<Option<Bin>> {
        values.iter().map(|&v| self.bin(v)).collect()
    }

    pub fn positions(&self, values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|&v| self.position(v)).collect()
    }

    pub fn color_indices(&self, values: &[f64]) -> Vec<Option<usize>> {
        values.iter().map(|&v| self.color_index(v)).collect()
    }

    /// Color indices for an array of any dimensionality.
    pub fn color_indices_array<D: Dimension>(
        &self,
        values: ArrayView<'_, f64, D>,
    ) -> Array<Option<usize>, D> {
        values.map(|&v| self.color_index(v))
    }

    /// Color indices for raw table cells.
    ///
    /// Missing cells are masked; text cells are a type error.
    pub fn query_values(&self, values: &[DataValue]) -> Result<Vec<Option<usize>>> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| match value.as_number() {
                Ok(Some(v)) => Ok(self.color_index(v)),
                Ok(None) => Ok(None),
                Err(PlotError::Type { message }) => Err(PlotError::Type {
                    message: format!("element {}: {}", i, message),
                }),
                Err(e) => Err(e),
            })
            .collect()
    }

    /// Discrete colorbar segments in ascending value order.
    ///
    /// Reserved extend segments are included with infinite outer bounds.
    pub fn segments(&self) -> Vec<Segment> {
        let nbins = self.nbins();
        let mut out = Vec::with_capacity(self.used_bins());

        let mut push = |slot: usize, lower: f64, upper: f64| {
            let position = self.positions[slot];
            out.push(Segment {
                bin: self.slot_to_bin(slot),
                lower,
                upper,
                position,
                color_index: self.position_to_index(position),
            });
        };

        if self.extend.extends_min() {
            push(0, f64::NEG_INFINITY, self.vmin());
        }
        for i in 0..nbins {
            push(i + 1, self.ascending[i], self.ascending[i + 1]);
        }
        if self.extend.extends_max() {
            push(nbins + 1, self.vmax(), f64::INFINITY);
        }
        out
    }
}

/// Positions for every slot (ascending order), before any descending flip.
fn slot_positions(
    ascending: &[f64],
    norm: &dyn Normalize,
    extend: Extend,
    cyclic: bool,
) -> Result<Vec<f64>> {
    let nbins = ascending.len() - 1;

    let normalized: Vec<f64> = ascending.iter().map(|&l| norm.normalize(l)).collect();
    if normalized.iter().any(|v| !v.is_finite()) {
        return Err(PlotError::invalid_levels(format!(
            "levels {:?} cannot be normalized with the {} normalizer",
            ascending,
            norm.name()
        )));
    }
    let centers: Vec<f64> = normalized.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();

    // Relative interior coordinates in [0, 1]
    let (lo, hi) = (centers[0], centers[nbins - 1]);
    let relative: Vec<f64> = if nbins == 1 || hi <= lo {
        (0..nbins)
            .map(|i| if nbins == 1 { 0.0 } else { i as f64 / (nbins - 1) as f64 })
            .collect()
    } else {
        centers.iter().map(|&c| (c - lo) / (hi - lo)).collect()
    };

    // Padding in units of one slot on each side of the interior bins
    let (pad_lo, pad_hi) = if cyclic {
        (0.5, 0.5)
    } else {
        (
            extend.extends_min() as u8 as f64,
            extend.extends_max() as u8 as f64,
        )
    };
    let span = (nbins - 1) as f64 + pad_lo + pad_hi;

    let mut positions = Vec::with_capacity(nbins + 2);
    positions.push(0.0);
    if span == 0.0 {
        positions.push(0.5);
    } else {
        let slot = 1.0 / span;
        positions.extend(
            relative
                .iter()
                .map(|&r| pad_lo * slot + r * (nbins - 1) as f64 * slot),
        );
    }
    positions.push(1.0);
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::norm::LogNorm;

    #[test]
    fn test_extend_parse() {
        assert_eq!("neither".parse::<Extend>().unwrap(), Extend::Neither);
        assert_eq!(" Both ".parse::<Extend>().unwrap(), Extend::Both);
        assert_eq!(Extend::Max.to_string(), "max");
        assert!(matches!(
            "sideways".parse::<Extend>(),
            Err(PlotError::InvalidExtend { .. })
        ));
    }

    #[test]
    fn test_basic_round_trip() {
        let norm = BinNorm::new(&[0.0, 1.0, 2.0, 3.0], Extend::Neither, 3).unwrap();
        assert_eq!(norm.color_index(0.5), Some(0));
        assert_eq!(norm.color_index(1.5), Some(1));
        assert_eq!(norm.color_index(2.5), Some(2));
        assert_eq!(norm.bin(1.5), Some(Bin::Interior(1)));
    }

    #[test]
    fn test_bins_are_half_open() {
        let norm = BinNorm::new(&[0.0, 1.0, 2.0], Extend::Both, 256).unwrap();
        assert_eq!(norm.bin(0.0), Some(Bin::Interior(0)));
        assert_eq!(norm.bin(1.0), Some(Bin::Interior(1)));
        assert_eq!(norm.bin(2.0), Some(Bin::Interior(1)));
        assert_eq!(norm.bin(-0.1), Some(Bin::Below));
        assert_eq!(norm.bin(2.1), Some(Bin::Above));
        assert_eq!(norm.bin(f64::NAN), None);
        assert_eq!(norm.color_index(f64::NAN), None);
    }

    #[test]
    fn test_extend_modes() {
        let levels = [0.0, 1.0, 2.0, 3.0];

        let neither = BinNorm::new(&levels, Extend::Neither, 256).unwrap();
        assert_eq!(neither.bin(-5.0), Some(Bin::Interior(0)));
        assert_eq!(neither.bin(50.0), Some(Bin::Interior(2)));
        assert_eq!(neither.color_index(-5.0), Some(0));
        assert_eq!(neither.color_index(50.0), Some(255));

        let min = BinNorm::new(&levels, Extend::Min, 256).unwrap();
        assert_eq!(min.bin(-5.0), Some(Bin::Below));
        assert_eq!(min.bin(50.0), Some(Bin::Interior(2)));
        assert_eq!(min.color_index(-5.0), Some(0));
        assert!(min.color_index(0.5).unwrap() > 0);
        assert_eq!(min.color_index(50.0), Some(255));

        let max = BinNorm::new(&levels, Extend::Max, 256).unwrap();
        assert_eq!(max.bin(-5.0), Some(Bin::Interior(0)));
        assert_eq!(max.bin(50.0), Some(Bin::Above));
        assert_eq!(max.color_index(-5.0), Some(0));
        assert!(max.color_index(2.5).unwrap() < 255);
        assert_eq!(max.color_index(50.0), Some(255));

        let both = BinNorm::new(&levels, Extend::Both, 256).unwrap();
        assert_eq!(both.used_bins(), 5);
        assert_eq!(both.color_index(-5.0), Some(0));
        assert_eq!(both.color_index(0.5), Some(64));
        assert_eq!(both.color_index(1.5), Some(128));
        assert_eq!(both.color_index(2.5), Some(192));
        assert_eq!(both.color_index(50.0), Some(255));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            BinNorm::new(&[3.0, 2.0, 5.0], Extend::Neither, 10),
            Err(PlotError::InvalidLevels { .. })
        ));
        assert!(matches!(
            BinNorm::new(&[1.0], Extend::Neither, 10),
            Err(PlotError::InvalidLevels { .. })
        ));
        assert!(matches!(
            BinNorm::parse(&[0.0, 1.0], "sideways", 10),
            Err(PlotError::InvalidExtend { .. })
        ));
        assert!(matches!(
            BinNorm::new(&[0.0, 1.0], Extend::Neither, 0),
            Err(PlotError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_single_bin() {
        let norm = BinNorm::new(&[0.0, 1.0], Extend::Neither, 10).unwrap();
        assert_eq!(norm.color_index(0.5), Some(5));
        assert_eq!(norm.color_index(-1.0), Some(5));

        let norm = BinNorm::new(&[0.0, 1.0], Extend::Both, 10).unwrap();
        assert_eq!(norm.color_index(-1.0), Some(0));
        assert_eq!(norm.color_index(0.5), Some(5));
        assert_eq!(norm.color_index(2.0), Some(9));
    }

    #[test]
    fn test_descending_levels() {
        let norm = BinNorm::new(&[3.0, 2.0, 1.0, 0.0], Extend::Both, 256).unwrap();
        assert!(norm.is_descending());
        // Intervals are counted in caller order
        assert_eq!(norm.bin(2.5), Some(Bin::Interior(0)));
        assert_eq!(norm.bin(0.5), Some(Bin::Interior(2)));
        assert_eq!(norm.bin(-1.0), Some(Bin::Below));
        // The first supplied interval sits at the low end of the colormap
        assert!(norm.color_index(2.5) < norm.color_index(0.5));
        assert_eq!(norm.color_index(-1.0), Some(255));
        assert_eq!(norm.color_index(9.0), Some(0));
    }

    #[test]
    fn test_cyclic_adjustment() {
        let levels: Vec<f64> = (0..=10).map(|v| v as f64).collect();
        let options = BinNormOptions {
            extend: Extend::Both,
            ncolors: 256,
            cyclic: true,
        };
        let norm = BinNorm::with_options(&levels, options).unwrap();

        // Extend is forced off for wrap-around colormaps
        assert_eq!(norm.extend(), Extend::Neither);

        let first = norm.color_index(levels[0]).unwrap();
        let last = norm.color_index(levels[10]).unwrap();
        assert_ne!(first, last);
        // Neither end touches the shared endpoint color
        assert!(first > 0);
        assert!(last < 255);
    }

    #[test]
    fn test_child_norm_spacing() {
        let levels = [1.0, 10.0, 100.0, 1000.0];
        let log = LogNorm::new(1.0, 1000.0).unwrap();
        let norm = BinNorm::with_norm(&levels, BinNormOptions::default(), Some(&log)).unwrap();
        assert_eq!(norm.color_index(5.0), Some(0));
        assert_eq!(norm.color_index(50.0), Some(128));
        assert_eq!(norm.color_index(500.0), Some(255));
    }

    #[test]
    fn test_segments() {
        let norm = BinNorm::new(&[0.0, 1.0, 2.0], Extend::Max, 3).unwrap();
        let segments = norm.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].bin, Bin::Interior(0));
        assert_eq!(segments[0].lower, 0.0);
        assert_eq!(segments[2].bin, Bin::Above);
        assert_eq!(segments[2].upper, f64::INFINITY);
        let indices: Vec<usize> = segments.iter().map(|s| s.color_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(norm.bin_color_index(Bin::Above).unwrap(), 2);
        assert!(norm.bin_color_index(Bin::Below).is_err());
    }

    #[test]
    fn test_query_values() {
        let norm = BinNorm::new(&[0.0, 1.0, 2.0, 3.0], Extend::Neither, 3).unwrap();
        let values = vec![DataValue::Number(0.5), DataValue::Missing, DataValue::Number(2.5)];
        assert_eq!(norm.query_values(&values).unwrap(), vec![Some(0), None, Some(2)]);

        let values = vec![DataValue::Number(0.5), DataValue::Text("warm".to_string())];
        match norm.query_values(&values) {
            Err(PlotError::Type { message }) => assert!(message.starts_with("element 1")),
            other => panic!("Expected type error, got {:?}", other),
        }
    }

    #[test]
    fn test_color_indices_array() {
        let norm = BinNorm::new(&[0.0, 1.0, 2.0, 3.0], Extend::Neither, 3).unwrap();
        let data = ndarray::arr2(&[[0.5, 1.5], [2.5, f64::NAN]]);
        let indices = norm.color_indices_array(data.view());
        assert_eq!(indices[[0, 0]], Some(0));
        assert_eq!(indices[[0, 1]], Some(1));
        assert_eq!(indices[[1, 0]], Some(2));
        assert_eq!(indices[[1, 1]], None);
    }
}
