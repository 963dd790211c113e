//! Default-style injection stage.
//!
//! Resolves the colormap, extend mode and levels of a draw call, falling
//! back to the configuration for anything the caller left unset, and builds
//! the bin normalizer used to color the data.

use tracing::warn;

use super::{DrawCall, DrawContext, ResolvedStyle, Stage};
use crate::colormaps::get_colormap;
use crate::error::Result;
use crate::levels::{data_limits, resolve_levels, AutoLevelOptions, LevelSpec};
use crate::logging::log_norm_built;
use crate::norm::{build_norm, default_norm_name, BinNorm, BinNormOptions, Extend};

/// Third pipeline stage; see the module docs
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectStyle;

impl Stage for InjectStyle {
    fn name(&self) -> &str {
        "inject_style"
    }

    fn apply(&self, mut call: DrawCall, ctx: &DrawContext<'_>) -> Result<DrawCall> {
        let image = &ctx.config.image;
        let style = &call.style;

        let cmap_name = style.cmap.as_deref().unwrap_or(&image.cmap);
        let cmap = get_colormap(cmap_name)?;
        let cyclic = cmap.is_cyclic();

        let mut extend = style.extend.unwrap_or(image.extend);
        if cyclic && extend != Extend::Neither {
            warn!(
                draw_id = ctx.draw_id,
                cmap = cmap.name(),
                extend = %extend,
                "Cyclic colormap requires extend=neither, overriding"
            );
            extend = Extend::Neither;
        }

        let requested_norm = style.norm.as_deref();
        let log = requested_norm.is_some_and(|n| n.eq_ignore_ascii_case("log"));

        // Logarithmic levels only see the positive part of the data
        let values = call.fields.iter().flat_map(|f| f.data.iter().copied());
        let (zmin, zmax) = if log {
            data_limits(values.filter(|&v| v > 0.0))
        } else {
            data_limits(values)
        };
        let spec = style
            .levels
            .clone()
            .unwrap_or(LevelSpec::Count(image.levels));
        let options = AutoLevelOptions {
            vmin: style.vmin,
            vmax: style.vmax,
            symmetric: style.symmetric,
            extend,
            log,
        };
        let levels = resolve_levels(&spec, zmin, zmax, &options, requested_norm)?;

        let norm_name = requested_norm.unwrap_or_else(|| default_norm_name(&levels));
        let child = build_norm(norm_name, &levels)?;
        let norm = BinNorm::with_norm(
            &levels,
            BinNormOptions {
                extend,
                ncolors: image.lut_size,
                cyclic,
            },
            Some(child.as_ref()),
        )?;
        log_norm_built(ctx.draw_id, levels.len(), extend.as_str(), image.lut_size, cyclic);

        call.resolved = Some(ResolvedStyle {
            cmap,
            levels,
            extend,
            norm,
        });
        Ok(call)
    }
}
