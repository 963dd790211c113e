//! Input normalization stage.
//!
//! Validates the fields of a draw call and settles its coordinates: missing
//! coordinates are inferred from the first field, categorical coordinates
//! become integer positions with tick labels, descending coordinates flag
//! their axis as reversed, and coordinates are converted between cell centers
//! and cell edges to match the plot kind.

use ndarray::Array1;

use super::{AxisFormat, DrawCall, DrawContext, Stage};
use crate::data::{Coordinate, LabeledCoordinate};
use crate::error::{PlotError, Result};
use crate::levels::{centers, edges};

/// First pipeline stage; see the module docs
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeInputs;

impl Stage for NormalizeInputs {
    fn name(&self) -> &str {
        "normalize_inputs"
    }

    fn apply(&self, mut call: DrawCall, _ctx: &DrawContext<'_>) -> Result<DrawCall> {
        let (ny, nx) = check_fields(&call)?;

        let x = call.x.take().unwrap_or_else(|| call.fields[0].coordinate(1));
        let y = call.y.take().unwrap_or_else(|| call.fields[0].coordinate(0));

        let wants_edges = call.kind.wants_edges();
        let x = conform_coordinate(x, nx, wants_edges, "x", &mut call.xaxis)?;
        let y = conform_coordinate(y, ny, wants_edges, "y", &mut call.yaxis)?;

        call.x = Some(x);
        call.y = Some(y);
        Ok(call)
    }
}

/// Check that there is at least one field, that all are 2D and share a shape.
///
/// Returns `(rows, columns)`.
fn check_fields(call: &DrawCall) -> Result<(usize, usize)> {
    let first = call.fields.first().ok_or_else(|| {
        PlotError::invalid_parameter("fields", "draw call needs at least one field")
    })?;

    for field in &call.fields {
        if field.ndim() != 2 {
            return Err(PlotError::shape(format!(
                "fields must be 2-dimensional, got shape {:?}",
                field.shape()
            )));
        }
    }

    if call.fields.iter().any(|f| f.shape() != first.shape()) {
        let shapes: Vec<&[usize]> = call.fields.iter().map(|f| f.shape()).collect();
        return Err(PlotError::shape(format!(
            "fields must share a shape, got shapes {:?}",
            shapes
        )));
    }

    let shape = first.shape();
    Ok((shape[0], shape[1]))
}

/// Turn a coordinate into numeric centers or edges for `n` cells.
fn conform_coordinate(
    mut coord: LabeledCoordinate,
    n: usize,
    wants_edges: bool,
    axis: &str,
    format: &mut AxisFormat,
) -> Result<LabeledCoordinate> {
    if let Some(labels) = coord.values.labels() {
        format.tick_labels = Some(labels.to_vec());
    }
    format.reversed = coord.values.is_reversed();
    let positions: Array1<f64> = coord.values.positions();
    let len = positions.len();

    let converted = if wants_edges {
        if len == n + 1 {
            positions
        } else if len == n {
            let values = positions.to_vec();
            Array1::from(edges(&values).map_err(|_| {
                PlotError::shape(format!(
                    "cannot infer {} edges from {} center(s)",
                    axis, len
                ))
            })?)
        } else {
            return Err(mismatch(axis, len, n));
        }
    } else if len == n {
        positions
    } else if len == n + 1 {
        Array1::from(centers(&positions.to_vec()))
    } else {
        return Err(mismatch(axis, len, n));
    };

    coord.values = Coordinate::Numeric(converted);
    Ok(coord)
}

fn mismatch(axis: &str, len: usize, n: usize) -> PlotError {
    PlotError::shape(format!(
        "{} coordinate has length {}, but the data needs {} centers or {} edges",
        axis,
        len,
        n,
        n + 1
    ))
}
