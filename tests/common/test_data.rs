//! Test data generation utilities.
//!
//! Labeled fields and sample matrices with known patterns.

use levelplot::{LabeledArray, LabeledCoordinate};
use ndarray::Array2;

/// A surface temperature field on a regular lat/lon grid.
///
/// Values rise linearly from 270 K in the south-west corner to 300 K in the
/// north-east corner. Latitudes run north to south.
pub fn temperature_field(nlat: usize, nlon: usize) -> (LabeledArray, LabeledCoordinate, LabeledCoordinate) {
    let data = Array2::from_shape_fn((nlat, nlon), |(i, j)| {
        let north = (nlat - 1 - i) as f64 / (nlat - 1) as f64;
        let east = j as f64 / (nlon - 1) as f64;
        270.0 + 15.0 * (north + east)
    });

    let lats: Vec<f64> = (0..nlat)
        .map(|i| 90.0 - i as f64 * 180.0 / (nlat - 1) as f64)
        .collect();
    let lons: Vec<f64> = (0..nlon).map(|j| j as f64 * 360.0 / nlon as f64).collect();

    let field = LabeledArray::from_array2(data)
        .with_name("tas")
        .with_attr("long_name", "Surface air temperature")
        .with_attr("units", "K")
        .with_dims(&["lat", "lon"]);
    let lat = LabeledCoordinate::numeric(lats)
        .with_name("lat")
        .with_attr("units", "degrees_north");
    let lon = LabeledCoordinate::numeric(lons)
        .with_name("lon")
        .with_attr("units", "degrees_east");
    (field, lat, lon)
}

/// A field with a NaN hole in the middle
pub fn field_with_gap(size: usize) -> LabeledArray {
    let mid = size / 2;
    let data = Array2::from_shape_fn((size, size), |(i, j)| {
        if i == mid && j == mid {
            f64::NAN
        } else {
            (i * size + j) as f64
        }
    });
    LabeledArray::from_array2(data).with_name("counts")
}

/// Samples for statistics: 5 rows, 3 columns with known spreads.
pub fn sample_matrix() -> Array2<f64> {
    ndarray::arr2(&[
        [1.0, 10.0, -2.0],
        [2.0, 20.0, -1.0],
        [3.0, 30.0, 0.0],
        [4.0, 40.0, 1.0],
        [5.0, 50.0, 2.0],
    ])
}
