//! Logging utilities for riskmap.
//!
//! Structured `tracing` helpers used around every plotting call so that
//! figure generation can be followed and timed from the logs.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    // A subscriber may already be installed (tests, embedding applications).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
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
            "Operation completed with warnings"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let plot_id = generate_plot_id();

    debug!(
        operation = operation,
        plot_id = %plot_id,
        "Starting operation"
    );

    let result = f();

    info!(
        operation = operation,
        plot_id = %plot_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log summary statistics of a rendered figure
pub fn log_figure_stats(operation: &str, panels: usize, points: usize, width: u32, height: u32) {
    info!(
        operation = operation,
        panels = panels,
        points = points,
        width = width,
        height = height,
        "Figure rendered"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::RiskmapError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Generate a unique id for one plotting call
pub fn generate_plot_id() -> String {
    Uuid::new_v4().to_string()
}
