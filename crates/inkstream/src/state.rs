//! Shared application state.
//!
//! Cloned into every request handler. The render pool is optional so the
//! router can be exercised in tests without a JS runtime; handlers fall
//! back to the client-side page when it is absent.

use std::path::PathBuf;
use std::sync::Arc;

use inkstream_core::RenderTimings;
use inkstream_ssr::RenderPool;

use crate::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Render worker pool. None when SSR is not initialized (e.g., in tests).
    pub pool: Option<Arc<RenderPool>>,
    /// Streaming timing budget threaded into every responder call.
    pub timings: RenderTimings,
    /// Wait for all content on every request (static prerender mode).
    pub prerender: bool,
    /// Directory served under /dist.
    pub assets_dir: PathBuf,
    /// Client bundle URL referenced by rendered and fallback pages.
    pub client_bundle_url: String,
}

impl AppState {
    /// State from config, without a render pool.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            pool: None,
            timings: config.timings()?,
            prerender: config.prerender,
            assets_dir: PathBuf::from(&config.assets_dir),
            client_bundle_url: config.client_bundle_url.clone(),
        })
    }

    /// Attach the render pool.
    pub fn with_pool(mut self, pool: RenderPool) -> Self {
        self.pool = Some(Arc::new(pool));
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            pool: None,
            timings: RenderTimings::with_defaults(),
            prerender: false,
            assets_dir: PathBuf::from("dist"),
            client_bundle_url: "/dist/client.js".to_string(),
        }
    }
}
