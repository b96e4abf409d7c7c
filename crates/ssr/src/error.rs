//! Render errors including I/O operations.

use inkstream_core::CoreError;
use thiserror::Error;

/// Render errors including I/O operations.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Failed to load server bundle from {path}: {reason}")]
    BundleLoad { path: String, reason: String },

    #[error("JavaScript execution error: {0}")]
    JsExecution(String),

    #[error("Shell render failed: {0}")]
    Shell(String),

    #[error("Hydration failed: {0}")]
    Hydration(String),

    #[error("Render aborted before the shell was ready")]
    RenderAborted,

    #[error("Worker channel closed")]
    ChannelClosed,

    #[error("Render timeout after {0}ms")]
    Timeout(u64),

    #[error("Service overloaded, retry after {retry_after_secs}s")]
    Overloaded { retry_after_secs: u32 },
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Sanitize error messages for client-facing responses.
///
/// Hides internal details while providing useful feedback.
pub fn sanitize_error(error: &RenderError) -> String {
    match error {
        // Safe to expose
        RenderError::Timeout(ms) => format!("Render timed out after {ms}ms"),
        RenderError::ChannelClosed => "Service temporarily unavailable".to_string(),
        RenderError::RenderAborted => "Render was cancelled".to_string(),
        RenderError::Overloaded { retry_after_secs } => {
            format!("Service busy, retry after {retry_after_secs}s")
        }
        // Hide internal details
        RenderError::BundleLoad { .. } => "Internal configuration error".to_string(),
        RenderError::JsExecution(_) | RenderError::Shell(_) => "Render failed".to_string(),
        RenderError::Hydration(_) => "Hydration failed".to_string(),
        RenderError::Core(_) => "Invalid request".to_string(),
    }
}
