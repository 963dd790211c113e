//! Common test utilities for levelplot.
//!
//! Shared fixtures, assertions and image checks for the integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod image_utils;
pub mod test_data;
