//! Raster rendering.
//!
//! [`RasterRenderer`] paints the first field of a prepared draw call into an
//! RGBA image using the resolved bin normalizer and colormap.
//! [`render_colorbar`] paints the matching discrete colorbar.

use image::{ImageBuffer, Rgba, RgbaImage};
use ndarray::ArrayView2;
use tracing::debug;

use super::{DrawCall, DrawContext, Renderer, ResolvedStyle};
use crate::colormaps::Colormap;
use crate::error::{PlotError, Result};
use crate::norm::BinNorm;

/// Transparent black for NaN/missing values
const MISSING: [u8; 4] = [0, 0, 0, 0];

/// Default image dimensions
const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

/// Renders a draw call into an in-memory RGBA image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl RasterRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Renderer for RasterRenderer {
    type Output = RgbaImage;

    fn render(&self, call: &DrawCall, ctx: &DrawContext<'_>) -> Result<RgbaImage> {
        let style = call.resolved.as_ref().ok_or_else(|| {
            PlotError::invalid_parameter(
                "style",
                "draw call has no resolved style; run the style stage first",
            )
        })?;
        let field = call.fields.first().ok_or_else(|| {
            PlotError::invalid_parameter("fields", "draw call needs at least one field")
        })?;
        let data = field.as_array2()?;

        debug!(
            draw_id = ctx.draw_id,
            width = self.width,
            height = self.height,
            rows = data.nrows(),
            cols = data.ncols(),
            "Rendering field"
        );

        paint_field(
            data,
            style,
            self.width,
            self.height,
            ctx.config.image.origin_upper,
        )
    }
}

/// Paint a 2D field with nearest-cell sampling.
///
/// Row 0 of the data is drawn at the bottom of the image unless
/// `origin_upper` is set.
fn paint_field(
    data: ArrayView2<f64>,
    style: &ResolvedStyle,
    width: u32,
    height: u32,
    origin_upper: bool,
) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(PlotError::ImageGeneration {
            message: format!("image dimensions must be positive, got {}x{}", width, height),
        });
    }
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return Err(PlotError::ImageGeneration {
            message: "cannot render an empty field".to_string(),
        });
    }

    let ncolors = style.norm.ncolors();
    let lut = style.cmap.lookup_table(ncolors);

    let mut img = ImageBuffer::new(width, height);
    for py in 0..height {
        let cell_row = (py as usize * rows) / height as usize;
        let row = if origin_upper {
            cell_row
        } else {
            rows - 1 - cell_row
        };
        for px in 0..width {
            let col = (px as usize * cols) / width as usize;
            let color = match style.norm.color_index(data[[row, col]]) {
                Some(index) => lut[index],
                None => MISSING,
            };
            img.put_pixel(px, py, Rgba(color));
        }
    }
    Ok(img)
}

/// Paint a horizontal discrete colorbar.
///
/// Every segment, extend segments included, gets the same width; segments
/// run from low values on the left to high values on the right.
pub fn render_colorbar(
    norm: &BinNorm,
    cmap: &dyn Colormap,
    length: u32,
    thickness: u32,
) -> Result<RgbaImage> {
    if length == 0 || thickness == 0 {
        return Err(PlotError::ImageGeneration {
            message: format!(
                "colorbar dimensions must be positive, got {}x{}",
                length, thickness
            ),
        });
    }

    let segments = norm.segments();
    let colors: Vec<[u8; 4]> = segments
        .iter()
        .map(|s| cmap.color_for_index(s.color_index, norm.ncolors()))
        .collect();

    let mut img = ImageBuffer::new(length, thickness);
    for px in 0..length {
        let segment = (px as usize * colors.len()) / length as usize;
        let color = Rgba(colors[segment]);
        for py in 0..thickness {
            img.put_pixel(px, py, color);
        }
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::{get_colormap, ListedColormap};
    use crate::config::Config;
    use crate::data::LabeledArray;
    use crate::norm::Extend;
    use crate::pipeline::{Pipeline, PlotKind};
    use crate::levels::LevelSpec;
    use ndarray::arr2;
    use std::sync::Arc;

    fn gray() -> Arc<dyn Colormap> {
        Arc::new(ListedColormap::new("gray", vec![[0, 0, 0], [255, 255, 255]], false).unwrap())
    }

    #[test]
    fn test_render_requires_style() {
        let config = Config::default();
        let ctx = DrawContext {
            config: &config,
            draw_id: "test",
        };
        let call = DrawCall::new(
            PlotKind::Contourf,
            LabeledArray::from_array2(arr2(&[[1.0]])),
        );
        assert!(RasterRenderer::new(4, 4).render(&call, &ctx).is_err());
    }

    #[test]
    fn test_paint_orientation() {
        let norm = BinNorm::new(&[0.0, 1.0, 2.0], Extend::Neither, 2).unwrap();
        let style = ResolvedStyle {
            cmap: gray(),
            levels: vec![0.0, 1.0, 2.0],
            extend: Extend::Neither,
            norm,
        };
        // Row 0 is low, row 1 is high
        let data = arr2(&[[0.5, 0.5], [1.5, f64::NAN]]);

        let img = paint_field(data.view(), &style, 2, 2, false).unwrap();
        // Bottom-left is row 0
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(1, 0).0, MISSING);

        let img = paint_field(data.view(), &style, 2, 2, true).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);

        assert!(paint_field(data.view(), &style, 0, 2, false).is_err());
    }

    #[test]
    fn test_colorbar_segments() {
        let norm = BinNorm::new(&[0.0, 1.0, 2.0, 3.0], Extend::Both, 5).unwrap();
        let cmap = gray();
        let bar = render_colorbar(&norm, cmap.as_ref(), 50, 3).unwrap();
        assert_eq!(bar.dimensions(), (50, 3));
        // Five segments of 10 pixels, darkest on the left
        assert_eq!(bar.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(bar.get_pixel(49, 2).0, [255, 255, 255, 255]);
        assert_eq!(bar.get_pixel(20, 1), bar.get_pixel(29, 1));
        assert_ne!(bar.get_pixel(19, 1), bar.get_pixel(20, 1));

        assert!(render_colorbar(&norm, cmap.as_ref(), 0, 3).is_err());
    }

    #[test]
    fn test_standard_pipeline_render() {
        let config = Config::default();
        let field = LabeledArray::from_array2(arr2(&[[0.0, 1.0], [2.0, 3.0]]));
        let call = DrawCall::new(PlotKind::Pcolor, field)
            .with_levels(LevelSpec::Explicit(vec![0.0, 1.5, 3.0]));
        let img = Pipeline::standard(RasterRenderer::new(20, 10))
            .run(call, &config)
            .unwrap();
        assert_eq!(img.dimensions(), (20, 10));

        let viridis = get_colormap("viridis").unwrap();
        let low = viridis.color_for_index(0, 256);
        // Bottom-left cell (row 0, col 0) holds the lowest value
        assert_eq!(img.get_pixel(0, 9).0, low);
    }
}
