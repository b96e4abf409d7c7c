use std::env;

use inkstream_core::RenderTimings;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Streaming timeout in milliseconds (default: 5,000)
    pub stream_timeout_ms: u64,
    /// Render statically: wait for all content on every request (default: false)
    pub prerender: bool,
    /// Directory served under /dist (default: "dist")
    pub assets_dir: String,
    /// URL of the client bundle referenced by rendered pages
    /// (default: "/dist/client.js")
    pub client_bundle_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STREAM_TIMEOUT_MS` - Streaming timeout in milliseconds (default: 5,000)
    /// - `PRERENDER` - Set to wait for all content on every request
    /// - `ASSETS_DIR` - Static asset directory (default: "dist")
    /// - `CLIENT_BUNDLE_URL` - Client bundle URL (default: "/dist/client.js")
    pub fn from_env() -> Self {
        Self {
            stream_timeout_ms: env::var("STREAM_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            prerender: env::var("PRERENDER").is_ok(),
            assets_dir: env::var("ASSETS_DIR").unwrap_or_else(|_| "dist".to_string()),
            client_bundle_url: env::var("CLIENT_BUNDLE_URL")
                .unwrap_or_else(|_| "/dist/client.js".to_string()),
        }
    }

    /// Streaming budget as validated timings.
    pub fn timings(&self) -> inkstream_core::Result<RenderTimings> {
        RenderTimings::new(self.stream_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timings_conversion() {
        let config = Config {
            stream_timeout_ms: 2_500,
            prerender: false,
            assets_dir: "dist".to_string(),
            client_bundle_url: "/dist/client.js".to_string(),
        };

        let timings = config.timings().unwrap();
        assert_eq!(timings.stream_timeout_ms, 2_500);
        assert_eq!(timings.abort_after_ms(), 3_500);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            stream_timeout_ms: 0,
            prerender: false,
            assets_dir: "dist".to_string(),
            client_bundle_url: "/dist/client.js".to_string(),
        };

        assert!(config.timings().is_err());
    }

    #[test]
    fn test_default_values() {
        env::remove_var("STREAM_TIMEOUT_MS");
        env::remove_var("PRERENDER");
        env::remove_var("ASSETS_DIR");
        env::remove_var("CLIENT_BUNDLE_URL");

        let config = Config::from_env();

        assert_eq!(config.stream_timeout_ms, 5_000);
        assert!(!config.prerender);
        assert_eq!(config.assets_dir, "dist");
        assert_eq!(config.client_bundle_url, "/dist/client.js");
    }
}
