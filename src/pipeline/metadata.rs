//! Metadata extraction stage.
//!
//! Fills in axis labels from coordinate metadata and the title from the first
//! field, unless the caller already set them or autoformatting is off.

use super::{DrawCall, DrawContext, Stage};
use crate::error::Result;

/// Second pipeline stage; see the module docs
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractMetadata;

impl Stage for ExtractMetadata {
    fn name(&self) -> &str {
        "extract_metadata"
    }

    fn apply(&self, mut call: DrawCall, ctx: &DrawContext<'_>) -> Result<DrawCall> {
        let format = &ctx.config.format;
        if !format.autoformat {
            return Ok(call);
        }

        if let Some(x) = &call.x {
            if call.xaxis.label.is_none() {
                call.xaxis.label = non_empty(x.label(format.units_in_labels));
            }
        }
        if let Some(y) = &call.y {
            if call.yaxis.label.is_none() {
                call.yaxis.label = non_empty(y.label(format.units_in_labels));
            }
        }

        // Titles never carry units
        if call.title.is_none() {
            call.title = call.fields.first().and_then(|f| non_empty(f.label(false)));
        }

        Ok(call)
    }
}

fn non_empty(label: String) -> Option<String> {
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}
