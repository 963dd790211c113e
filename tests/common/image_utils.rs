//! Image checking utilities for testing.

use image::RgbaImage;
use std::collections::BTreeSet;

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(
    image: &RgbaImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

/// Set of distinct colors in an image
pub fn distinct_colors(image: &RgbaImage) -> BTreeSet<[u8; 4]> {
    image.pixels().map(|p| p.0).collect()
}

/// Number of fully transparent pixels
pub fn transparent_count(image: &RgbaImage) -> usize {
    image.pixels().filter(|p| p.0[3] == 0).count()
}

/// Distinct colors along one row, in left-to-right order of first appearance
pub fn row_colors(image: &RgbaImage, y: u32) -> Vec<[u8; 4]> {
    let mut out: Vec<[u8; 4]> = Vec::new();
    for x in 0..image.width() {
        let color = image.get_pixel(x, y).0;
        if out.last() != Some(&color) {
            out.push(color);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_row_colors() {
        let mut img = RgbaImage::new(4, 1);
        img.put_pixel(0, 0, Rgba([1, 1, 1, 255]));
        img.put_pixel(1, 0, Rgba([1, 1, 1, 255]));
        img.put_pixel(2, 0, Rgba([2, 2, 2, 255]));
        assert_eq!(row_colors(&img, 0).len(), 3);
        assert_eq!(transparent_count(&img), 1);
        assert_eq!(distinct_colors(&img).len(), 3);
        assert!(assert_image_dimensions(&img, 4, 1).is_ok());
        assert!(assert_image_dimensions(&img, 4, 2).is_err());
    }
}
