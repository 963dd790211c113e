//! Labeled data containers.
//!
//! Arrays carry a name, free-form attributes and per-dimension coordinates,
//! much like a self-describing scientific dataset. Labels for axes and titles
//! are extracted from this metadata.

use ndarray::{Array1, ArrayD, ArrayView2, Ix2, IxDyn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PlotError, Result};

/// Possible attribute values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// String attribute
    Text(String),
    /// Numeric attribute (stored as f64 for simplicity)
    Number(f64),
    /// Array of numbers
    NumberArray(Vec<f64>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

/// A raw table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Text(String),
    Missing,
}

impl DataValue {
    /// Numeric value of the cell; `None` when missing, a type error for text.
    pub fn as_number(&self) -> Result<Option<f64>> {
        match self {
            DataValue::Number(v) => Ok(Some(*v)),
            DataValue::Missing => Ok(None),
            DataValue::Text(s) => Err(PlotError::Type {
                message: format!("expected a number, got text {:?}", s),
            }),
        }
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

/// Convert cells to numbers, with missing cells as NaN.
pub fn to_numeric(values: &[DataValue]) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value
                .as_number()
                .map(|v| v.unwrap_or(f64::NAN))
                .map_err(|e| match e {
                    PlotError::Type { message } => PlotError::Type {
                        message: format!("element {}: {}", i, message),
                    },
                    other => other,
                })
        })
        .collect()
}

/// Coordinate values along one dimension
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    Numeric(Array1<f64>),
    /// String labels, drawn at integer positions
    Categorical(Vec<String>),
}

impl Coordinate {
    /// Integer positions `0..len`
    pub fn indices(len: usize) -> Self {
        Coordinate::Numeric(Array1::from_iter((0..len).map(|i| i as f64)))
    }

    pub fn len(&self) -> usize {
        match self {
            Coordinate::Numeric(values) => values.len(),
            Coordinate::Categorical(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric positions; categorical labels map to their index
    pub fn positions(&self) -> Array1<f64> {
        match self {
            Coordinate::Numeric(values) => values.clone(),
            Coordinate::Categorical(labels) => {
                Array1::from_iter((0..labels.len()).map(|i| i as f64))
            }
        }
    }

    pub fn labels(&self) -> Option<&[String]> {
        match self {
            Coordinate::Categorical(labels) => Some(labels),
            Coordinate::Numeric(_) => None,
        }
    }

    /// Numeric coordinate running from high to low
    pub fn is_reversed(&self) -> bool {
        match self {
            Coordinate::Numeric(values) => values.len() > 1 && values[1] < values[0],
            Coordinate::Categorical(_) => false,
        }
    }
}

/// A coordinate together with its own name and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledCoordinate {
    pub name: Option<String>,
    pub attributes: HashMap<String, AttributeValue>,
    pub values: Coordinate,
}

impl LabeledCoordinate {
    pub fn new(values: Coordinate) -> Self {
        Self {
            name: None,
            attributes: HashMap::new(),
            values,
        }
    }

    pub fn numeric(values: Vec<f64>) -> Self {
        Self::new(Coordinate::Numeric(Array1::from(values)))
    }

    pub fn categorical<S: Into<String>>(labels: Vec<S>) -> Self {
        Self::new(Coordinate::Categorical(
            labels.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn label(&self, units: bool) -> String {
        auto_label(self.name.as_deref(), &self.attributes, units)
    }
}

/// An n-dimensional array with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
    pub data: ArrayD<f64>,
    pub name: Option<String>,
    pub attributes: HashMap<String, AttributeValue>,
    /// Dimension names, outermost first
    pub dims: Vec<String>,
    /// Coordinates keyed by dimension name
    pub coords: HashMap<String, LabeledCoordinate>,
}

impl LabeledArray {
    pub fn new(data: ArrayD<f64>) -> Self {
        Self {
            data,
            name: None,
            attributes: HashMap::new(),
            dims: Vec::new(),
            coords: HashMap::new(),
        }
    }

    pub fn from_array2(data: ndarray::Array2<f64>) -> Self {
        Self::new(data.into_dyn())
    }

    /// Build a 2D array from row-major table cells.
    ///
    /// Missing cells become NaN; any text cell is a type error.
    pub fn from_cells(rows: usize, cols: usize, cells: &[DataValue]) -> Result<Self> {
        if rows * cols != cells.len() {
            return Err(PlotError::shape(format!(
                "{} cells cannot fill a {}x{} array",
                cells.len(),
                rows,
                cols
            )));
        }
        let values = to_numeric(cells)?;
        let data = ArrayD::from_shape_vec(IxDyn(&[rows, cols]), values)
            .map_err(|e| PlotError::shape(e.to_string()))?;
        Ok(Self::new(data))
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_dims(mut self, dims: &[&str]) -> Self {
        self.dims = dims.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Attach a coordinate to a dimension; the coordinate is named after the
    /// dimension unless it already has a name.
    pub fn with_coord(mut self, dim: &str, mut coord: LabeledCoordinate) -> Self {
        if coord.name.is_none() {
            coord.name = Some(dim.to_string());
        }
        self.coords.insert(dim.to_string(), coord);
        self
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Coordinate along `axis`.
    ///
    /// Falls back to integer indices, named after the dimension if it has one.
    pub fn coordinate(&self, axis: usize) -> LabeledCoordinate {
        let len = self.shape().get(axis).copied().unwrap_or(0);
        match self.dims.get(axis) {
            Some(dim) => match self.coords.get(dim) {
                Some(coord) => coord.clone(),
                None => LabeledCoordinate::new(Coordinate::indices(len)).with_name(dim),
            },
            None => LabeledCoordinate::new(Coordinate::indices(len)),
        }
    }

    pub fn label(&self, units: bool) -> String {
        auto_label(self.name.as_deref(), &self.attributes, units)
    }

    pub fn as_array2(&self) -> Result<ArrayView2<'_, f64>> {
        self.data
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| {
                PlotError::shape(format!(
                    "expected a 2-dimensional array, got shape {:?}",
                    self.shape()
                ))
            })
    }
}

/// Build a label from a name and common metadata attributes.
///
/// `long_name` wins over `standard_name`, which wins over the plain name.
/// Units are appended in parentheses, or used alone when there is no name.
pub fn auto_label(
    name: Option<&str>,
    attributes: &HashMap<String, AttributeValue>,
    units: bool,
) -> String {
    let mut label = name.unwrap_or("").to_string();
    for key in ["standard_name", "long_name"] {
        if let Some(text) = attributes.get(key).and_then(|v| v.as_text()) {
            label = text.to_string();
        }
    }
    let label = label.trim().to_string();

    if !units {
        return label;
    }
    match attributes.get("units").and_then(|v| v.as_text()) {
        Some(u) if !u.trim().is_empty() && !label.is_empty() => format!("{} ({})", label, u.trim()),
        Some(u) if !u.trim().is_empty() => u.trim().to_string(),
        _ => label,
    }
}
