//! Logging utilities for levelplot.
//!
//! This module provides structured logging helpers so that draw calls,
//! pipeline stages and errors can be traced with consistent fields.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::PlotError;

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation failed"
        );
    }
}

/// Run a closure and log its duration under a fresh operation id
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let operation_id = Uuid::new_v4();

    debug!(
        operation = operation,
        operation_id = %operation_id,
        "Starting operation"
    );

    let result = f();

    info!(
        operation = operation,
        operation_id = %operation_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log the outcome of building a bin normalizer
pub fn log_norm_built(draw_id: &str, nlevels: usize, extend: &str, ncolors: usize, cyclic: bool) {
    debug!(
        draw_id = draw_id,
        nlevels = nlevels,
        extend = extend,
        ncolors = ncolors,
        cyclic = cyclic,
        "Bin normalizer built"
    );
}

/// Log an error with context
pub fn log_error(error: &PlotError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Log an error raised by one pipeline stage of a draw call
pub fn log_stage_error(error: &PlotError, stage: &str, draw_id: &str) {
    error!(
        error = %error,
        stage = stage,
        draw_id = draw_id,
        "Draw pipeline stage failed"
    );
}

/// Generate a unique draw ID
pub fn generate_draw_id() -> String {
    Uuid::new_v4().to_string()
}
