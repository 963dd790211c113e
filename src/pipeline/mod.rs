//! Draw pipeline.
//!
//! A draw call is an explicit value passed through an ordered chain of
//! stages before it reaches a renderer:
//!
//! - **NormalizeInputs**: validates arrays and infers coordinates
//! - **ExtractMetadata**: derives axis labels and titles from metadata
//! - **InjectStyle**: fills in colormap, levels and the bin normalizer
//! - **Renderer**: turns the prepared call into output
//!
//! Each stage is a pure function of the call and an immutable
//! [`DrawContext`], which carries the session configuration.

pub mod metadata;
pub mod normalize;
pub mod render;
pub mod style;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::colormaps::Colormap;
use crate::config::Config;
use crate::data::{LabeledArray, LabeledCoordinate};
use crate::error::Result;
use crate::levels::LevelSpec;
use crate::logging::{
    generate_draw_id, log_error, log_operation_end, log_operation_start, log_stage_error,
    log_timed_operation,
};
use crate::norm::{BinNorm, Extend};

pub use metadata::ExtractMetadata;
pub use normalize::NormalizeInputs;
pub use render::{render_colorbar, RasterRenderer};
pub use style::InjectStyle;

/// Kind of 2D plot being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Quadrilateral cells; coordinates are cell edges
    Pcolor,
    /// Same as `Pcolor`
    Pcolormesh,
    /// Contour lines; coordinates are cell centers
    Contour,
    /// Filled contours; coordinates are cell centers
    Contourf,
}

impl PlotKind {
    /// Whether the plot expects coordinate edges rather than centers
    pub fn wants_edges(self) -> bool {
        matches!(self, PlotKind::Pcolor | PlotKind::Pcolormesh)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlotKind::Pcolor => "pcolor",
            PlotKind::Pcolormesh => "pcolormesh",
            PlotKind::Contour => "contour",
            PlotKind::Contourf => "contourf",
        }
    }
}

/// Formatting resolved for one axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisFormat {
    pub label: Option<String>,
    /// Tick labels at integer positions, for categorical coordinates
    pub tick_labels: Option<Vec<String>>,
    /// Coordinates run from high to low
    pub reversed: bool,
}

/// Style options requested by the caller; unset fields use configuration defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRequest {
    pub cmap: Option<String>,
    pub levels: Option<LevelSpec>,
    pub extend: Option<Extend>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub symmetric: bool,
    /// Name of the normalizer spacing the bins
    pub norm: Option<String>,
}

/// Style resolved by [`InjectStyle`]
#[derive(Clone)]
pub struct ResolvedStyle {
    pub cmap: Arc<dyn Colormap>,
    pub levels: Vec<f64>,
    pub extend: Extend,
    pub norm: BinNorm,
}

impl fmt::Debug for ResolvedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedStyle")
            .field("cmap", &self.cmap.name())
            .field("levels", &self.levels)
            .field("extend", &self.extend)
            .field("norm", &self.norm)
            .finish()
    }
}

/// A draw call flowing through the pipeline
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub kind: PlotKind,
    pub x: Option<LabeledCoordinate>,
    pub y: Option<LabeledCoordinate>,
    /// 2D fields; the first one is rendered, all must share a shape
    pub fields: Vec<LabeledArray>,
    pub style: StyleRequest,
    pub xaxis: AxisFormat,
    pub yaxis: AxisFormat,
    pub title: Option<String>,
    pub resolved: Option<ResolvedStyle>,
}

impl DrawCall {
    pub fn new(kind: PlotKind, field: LabeledArray) -> Self {
        Self {
            kind,
            x: None,
            y: None,
            fields: vec![field],
            style: StyleRequest::default(),
            xaxis: AxisFormat::default(),
            yaxis: AxisFormat::default(),
            title: None,
            resolved: None,
        }
    }

    pub fn with_x(mut self, x: LabeledCoordinate) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: LabeledCoordinate) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_field(mut self, field: LabeledArray) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_cmap(mut self, cmap: &str) -> Self {
        self.style.cmap = Some(cmap.to_string());
        self
    }

    pub fn with_levels(mut self, levels: LevelSpec) -> Self {
        self.style.levels = Some(levels);
        self
    }

    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.style.extend = Some(extend);
        self
    }

    pub fn with_limits(mut self, vmin: Option<f64>, vmax: Option<f64>) -> Self {
        self.style.vmin = vmin;
        self.style.vmax = vmax;
        self
    }

    pub fn with_norm(mut self, norm: &str) -> Self {
        self.style.norm = Some(norm.to_string());
        self
    }

    pub fn symmetric(mut self) -> Self {
        self.style.symmetric = true;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

/// Read-only state shared by every stage of one draw
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub config: &'a Config,
    pub draw_id: &'a str,
}

/// One transformation of a draw call
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, call: DrawCall, ctx: &DrawContext<'_>) -> Result<DrawCall>;
}

/// Terminal consumer of a prepared draw call
pub trait Renderer {
    type Output;

    fn render(&self, call: &DrawCall, ctx: &DrawContext<'_>) -> Result<Self::Output>;
}

/// Ordered stages followed by a renderer
pub struct Pipeline<R> {
    stages: Vec<Box<dyn Stage>>,
    renderer: R,
}

impl<R: Renderer> Pipeline<R> {
    /// A pipeline with no stages
    pub fn new(renderer: R) -> Self {
        Self {
            stages: Vec::new(),
            renderer,
        }
    }

    /// Input normalization, metadata extraction and style injection, in that order
    pub fn standard(renderer: R) -> Self {
        Self::new(renderer)
            .with_stage(NormalizeInputs)
            .with_stage(ExtractMetadata)
            .with_stage(InjectStyle)
    }

    pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn apply_stages(&self, mut call: DrawCall, ctx: &DrawContext<'_>) -> Result<DrawCall> {
        for stage in &self.stages {
            let start = Instant::now();
            call = stage.apply(call, ctx).map_err(|e| {
                log_stage_error(&e, stage.name(), ctx.draw_id);
                e
            })?;
            debug!(
                draw_id = ctx.draw_id,
                stage = stage.name(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Stage applied"
            );
        }
        Ok(call)
    }

    /// Run the stages only, returning the prepared call
    pub fn prepare(&self, call: DrawCall, config: &Config) -> Result<DrawCall> {
        let draw_id = generate_draw_id();
        let ctx = DrawContext {
            config,
            draw_id: &draw_id,
        };
        self.apply_stages(call, &ctx)
    }

    /// Run every stage, then hand the call to the renderer
    pub fn run(&self, call: DrawCall, config: &Config) -> Result<R::Output> {
        let start = Instant::now();
        let draw_id = generate_draw_id();
        let ctx = DrawContext {
            config,
            draw_id: &draw_id,
        };
        log_operation_start("draw", Some(call.kind.as_str()));

        let result = self
            .apply_stages(call, &ctx)
            .and_then(|call| {
                log_timed_operation("render", || self.renderer.render(&call, &ctx)).map_err(
                    |e| {
                        log_error(&e, "render");
                        e
                    },
                )
            });

        log_operation_end("draw", start, result.is_ok());
        result
    }
}
