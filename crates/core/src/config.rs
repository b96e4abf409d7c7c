//! Configuration types with validation.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, MAX_RENDER_DATA_SIZE};

/// Grace period past the streaming timeout before the render is aborted,
/// leaving time to flush still-pending boundaries.
pub const ABORT_GRACE_MS: u64 = 1_000;

/// Configuration for a single render request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Data injected into the bundle as `globalThis.__INKSTREAM_DATA__`.
    #[serde(rename = "renderData")]
    pub render_data: serde_json::Value,
}

impl RenderConfig {
    /// Create a new render config with the given data.
    ///
    /// Validates that the payload size is within limits.
    pub fn new(render_data: serde_json::Value) -> Result<Self> {
        let size = serde_json::to_string(&render_data)
            .map(|s| s.len())
            .unwrap_or(0);

        if size > MAX_RENDER_DATA_SIZE {
            return Err(CoreError::PayloadTooLarge {
                size,
                max: MAX_RENDER_DATA_SIZE,
            });
        }

        Ok(Self { render_data })
    }

    /// Serialize config to JSON string (pure transformation).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

/// Streaming timing budget, threaded explicitly into the responder so the
/// orchestration stays testable without real timers.
#[derive(Clone, Copy, Debug)]
pub struct RenderTimings {
    /// Streaming timeout in milliseconds.
    pub stream_timeout_ms: u64,
}

impl RenderTimings {
    /// Create and validate timings.
    pub fn new(stream_timeout_ms: u64) -> Result<Self> {
        if stream_timeout_ms == 0 {
            return Err(CoreError::InvalidTimeout);
        }
        Ok(Self { stream_timeout_ms })
    }

    /// Default 5s streaming budget.
    pub fn with_defaults() -> Self {
        Self {
            stream_timeout_ms: 5_000,
        }
    }

    /// Total delay before the render is forcibly aborted.
    pub fn abort_after_ms(&self) -> u64 {
        self.stream_timeout_ms + ABORT_GRACE_MS
    }
}

/// Configuration for the renderer worker pool (validated).
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Maximum pending requests before rejecting.
    pub max_pending: usize,
    /// NODE_ENV value for the hosted bundle.
    pub node_env: String,
}

impl RendererConfig {
    /// Create and validate pool config.
    pub fn new(worker_count: usize, max_pending: usize, node_env: String) -> Result<Self> {
        if worker_count == 0 {
            return Err(CoreError::InvalidWorkerCount);
        }

        Ok(Self {
            worker_count,
            max_pending,
            node_env,
        })
    }

    /// Create with defaults (100 pending, production).
    pub fn with_defaults(worker_count: usize) -> Result<Self> {
        Self::new(worker_count, 100, "production".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_new_valid() {
        let data = serde_json::json!({"url": "/"});
        let config = RenderConfig::new(data).unwrap();
        assert_eq!(config.render_data["url"], "/");
    }

    #[test]
    fn test_render_config_payload_too_large() {
        let large_string = "x".repeat(2 * 1024 * 1024);
        let data = serde_json::json!({"large": large_string});
        let result = RenderConfig::new(data);
        assert!(matches!(result, Err(CoreError::PayloadTooLarge { .. })));
    }

    #[test]
    fn test_render_config_to_json() {
        let config = RenderConfig::new(serde_json::json!({"url": "/about"})).unwrap();
        let json = config.to_json().unwrap();
        assert!(json.contains("url"));
        assert!(json.contains("/about"));
    }

    #[test]
    fn test_timings_valid() {
        let timings = RenderTimings::new(5_000).unwrap();
        assert_eq!(timings.stream_timeout_ms, 5_000);
        assert_eq!(timings.abort_after_ms(), 6_000);
    }

    #[test]
    fn test_timings_zero_rejected() {
        assert!(matches!(RenderTimings::new(0), Err(CoreError::InvalidTimeout)));
    }

    #[test]
    fn test_timings_defaults() {
        let timings = RenderTimings::with_defaults();
        assert_eq!(timings.stream_timeout_ms, 5_000);
    }

    #[test]
    fn test_renderer_config_valid() {
        let config = RendererConfig::new(4, 100, "production".to_string()).unwrap();
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.max_pending, 100);
        assert_eq!(config.node_env, "production");
    }

    #[test]
    fn test_renderer_config_zero_workers() {
        let result = RendererConfig::new(0, 100, "production".to_string());
        assert!(matches!(result, Err(CoreError::InvalidWorkerCount)));
    }

    #[test]
    fn test_renderer_config_with_defaults() {
        let config = RendererConfig::with_defaults(8).unwrap();
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.max_pending, 100);
        assert_eq!(config.node_env, "production");
    }
}
