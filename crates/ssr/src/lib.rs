//! Streaming SSR shell - Imperative Shell.
//!
//! This crate orchestrates I/O operations using pure functions from
//! `inkstream_core`. It hosts the server bundle in a `deno_core` worker
//! pool, transforms the rendered stream through the style injector, and
//! drives the responder that turns lifecycle events into a committed
//! response.
//!
//! # Architecture
//!
//! - **Functional Core** (`inkstream_core`): injection, classification,
//!   cache, config, bridge generation
//! - **Imperative Shell** (this crate): I/O, threading, JsRuntime
//!   execution, stream plumbing
//!
//! # Example
//!
//! ```ignore
//! use inkstream_ssr::{respond, RenderPool};
//! use inkstream_core::{ready_path, RenderConfig, RenderTimings, RendererConfig};
//! use std::path::Path;
//!
//! // Create pool (I/O: reads bundle, spawns threads)
//! let pool = RenderPool::new(
//!     RendererConfig::with_defaults(4).unwrap(),
//!     Path::new("dist/server.js"),
//! ).unwrap();
//!
//! // Render (streaming: the handle produces chunks while the bundle runs)
//! let config = RenderConfig::new(serde_json::json!({ "url": "/" })).unwrap();
//! let handle = pool.render_stream(config).await.unwrap();
//! let path = ready_path(Some("Mozilla/5.0"), false);
//! let response = respond(handle, path, RenderTimings::with_defaults()).await.unwrap();
//! ```

mod client;
mod error;
mod event;
mod injector;
mod pool;
mod responder;
mod runtime;
mod worker;

// Re-export core types for convenience
pub use inkstream_core::{
    ready_path, style_tag, ReadyPath, RenderConfig, RenderTimings, RendererConfig, StyleCache,
    STYLE_ELEMENT_ID,
};

// Export shell types
pub use client::{hydrate, ClientContext, InteractiveRoot};
pub use error::{sanitize_error, RenderError, Result};
pub use event::{AbortHandle, RenderEvent, RenderHandle};
pub use injector::StyleInjector;
pub use pool::{HealthStatus, RenderPool, RenderPoolStats};
pub use responder::{respond, SsrResponse};
