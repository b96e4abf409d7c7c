//! JsRuntime execution for the streaming render.
//!
//! This module contains the impure side-effect code that executes the
//! server bundle inside a `deno_core` JsRuntime. The bundle drives the
//! render through the `__inkstream__` bridge installed by
//! `inkstream_core::generate_bridge`; each bridge call lands in one of the
//! ops below and is forwarded over the per-render channels.

use std::cell::RefCell;

use deno_core::{extension, op2, JsRuntime, RuntimeOptions};
use inkstream_core::{generate_bridge, StyleCache};
use tokio::sync::{mpsc, oneshot};

use crate::{
    error::{RenderError, Result},
    event::RenderEvent,
};

/// Per-render bridge state: channel ends plus the style collection cache.
struct RenderBridge {
    chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
    event_tx: mpsc::UnboundedSender<RenderEvent>,
    styles: StyleCache,
    extracted: Option<String>,
}

impl RenderBridge {
    /// Serialize the cache on the first ready signal; replay the same text
    /// on any later one. The cache seals on first extraction, so a bundle
    /// that signals both shell-ready and all-ready still observes the
    /// extract-once lifecycle.
    fn ready_styles(&mut self) -> String {
        if self.extracted.is_none() {
            self.extracted = Some(self.styles.extract().unwrap_or_default());
        }
        self.extracted.clone().unwrap_or_default()
    }
}

thread_local! {
    /// Bridge for the render currently executing on this worker thread.
    /// Ops can't carry per-render state, so it lives here; one render runs
    /// at a time per thread.
    static BRIDGE: RefCell<Option<RenderBridge>> = const { RefCell::new(None) };
}

fn with_bridge(f: impl FnOnce(&mut RenderBridge)) {
    BRIDGE.with(|cell| {
        if let Some(bridge) = cell.borrow_mut().as_mut() {
            f(bridge);
        }
    });
}

/// A rendered markup chunk from the bundle.
#[op2(fast)]
fn op_emit_chunk(#[string] chunk: String) {
    with_bridge(|bridge| {
        let _ = bridge.chunk_tx.send(chunk.into_bytes());
    });
}

/// A style rule computed during the render. Late rules arriving after the
/// cache sealed are dropped, matching the cache lifecycle.
#[op2(fast)]
fn op_collect_style(#[string] key: String, #[string] css: String) {
    with_bridge(|bridge| {
        let _ = bridge.styles.insert(&key, &css);
    });
}

#[op2(fast)]
fn op_shell_ready() {
    with_bridge(|bridge| {
        let styles = bridge.ready_styles();
        let _ = bridge.event_tx.send(RenderEvent::ShellReady { styles });
    });
}

#[op2(fast)]
fn op_all_ready() {
    with_bridge(|bridge| {
        let styles = bridge.ready_styles();
        let _ = bridge.event_tx.send(RenderEvent::AllReady { styles });
    });
}

#[op2(fast)]
fn op_shell_error(#[string] message: String) {
    with_bridge(|bridge| {
        let _ = bridge.event_tx.send(RenderEvent::ShellError { message });
    });
}

#[op2(fast)]
fn op_stream_error(#[string] message: String) {
    with_bridge(|bridge| {
        let _ = bridge.event_tx.send(RenderEvent::StreamError { message });
    });
}

extension!(
    render_ext,
    ops = [
        op_emit_chunk,
        op_collect_style,
        op_shell_ready,
        op_all_ready,
        op_shell_error,
        op_stream_error
    ]
);

/// Execute one streaming render.
///
/// **MUST be called from a dedicated thread** - `JsRuntime` is not `Send`.
/// Chunks and events flow out over the given channels while the bundle
/// runs; firing `abort_rx` stops the event loop and flushes what was
/// already emitted. The channels close when this returns.
pub async fn render(
    bundle_code: &str,
    config_json: &str,
    node_env: &str,
    chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
    event_tx: mpsc::UnboundedSender<RenderEvent>,
    abort_rx: oneshot::Receiver<()>,
) -> Result<()> {
    let bridge_script = generate_bridge(config_json, node_env).map_err(RenderError::Core)?;

    BRIDGE.with(|cell| {
        *cell.borrow_mut() = Some(RenderBridge {
            chunk_tx,
            event_tx: event_tx.clone(),
            styles: StyleCache::new(),
            extracted: None,
        });
    });

    let result = execute(bundle_code, bridge_script, abort_rx).await;

    // Dropping the bridge closes the chunk channel and ends the stream.
    BRIDGE.with(|cell| cell.borrow_mut().take());

    if let Err(e) = &result {
        // A failed script surfaces through the shell-error path; if the
        // response was already committed the responder just logs it.
        let _ = event_tx.send(RenderEvent::ShellError {
            message: e.to_string(),
        });
    }

    result
}

async fn execute(
    bundle_code: &str,
    bridge_script: String,
    abort_rx: oneshot::Receiver<()>,
) -> Result<()> {
    let mut runtime = JsRuntime::new(RuntimeOptions {
        extensions: vec![render_ext::init()],
        ..Default::default()
    });

    runtime
        .execute_script("<bridge>", bridge_script)
        .map_err(|e| RenderError::JsExecution(e.to_string()))?;

    runtime
        .execute_script("<server-bundle>", bundle_code.to_string())
        .map_err(|e| RenderError::JsExecution(e.to_string()))?;

    // Run the event loop to completion (async subtrees resolve here),
    // racing the abort switch. Losing the race is a forced flush, not an
    // error: whatever the bundle emitted so far has already been sent.
    tokio::select! {
        res = runtime.run_event_loop(Default::default()) => {
            res.map_err(|e| RenderError::JsExecution(e.to_string()))
        }
        _ = abort_rx => {
            tracing::debug!("render aborted, flushing emitted chunks");
            Ok(())
        }
    }
}
