//! Pure styling/SSR logic - no I/O, no async, no side effects.
//!
//! This crate provides:
//! - The style collection cache and its serialized `<style>` element
//! - Single-chunk marker injection (the text substitution behind the
//!   streaming injector)
//! - Requester classification (shell-ready vs all-ready)
//! - Configuration types with validation
//! - Render bridge script generation for the hosted bundle
//!
//! # Example
//!
//! ```
//! use inkstream_core::{inject_once, ready_path, style_tag, ReadyPath, HEAD_CLOSE_MARKER};
//!
//! // Crawlers wait for the fully-resolved tree
//! assert_eq!(ready_path(Some("Googlebot/2.1"), false), ReadyPath::AllReady);
//!
//! // Styles land immediately before the closing head tag
//! let payload = style_tag(".btn{color:red}");
//! let out = inject_once("<head></head>", HEAD_CLOSE_MARKER, &payload).unwrap();
//! assert!(out.starts_with("<head><style id=\"inkstream-styles\">"));
//! ```

mod bridge;
mod cache;
mod classify;
mod config;
mod error;
mod inject;

pub use bridge::generate_bridge;
pub use cache::{style_tag, StyleCache, STYLE_ELEMENT_ID};
pub use classify::{is_crawler, ready_path, ReadyPath};
pub use config::{RenderConfig, RenderTimings, RendererConfig, ABORT_GRACE_MS};
pub use error::{CoreError, Result, MAX_RENDER_DATA_SIZE};
pub use inject::{inject_once, HEAD_CLOSE_MARKER};
