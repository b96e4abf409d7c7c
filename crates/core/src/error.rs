//! Core error types (pure - no I/O variants).

use thiserror::Error;

/// Maximum size for a render config payload (1MB).
pub const MAX_RENDER_DATA_SIZE: usize = 1024 * 1024;

/// Core errors (pure - no I/O variants).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config serialization failed: {0}")]
    Serialization(String),

    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("Stream timeout must be positive")]
    InvalidTimeout,

    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Style cache is sealed after extraction")]
    CacheSealed,
}

pub type Result<T> = std::result::Result<T, CoreError>;
