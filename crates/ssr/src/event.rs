//! Render lifecycle events and the per-render handle.
//!
//! The hosted renderer signals completion through callbacks; here those are
//! modeled as an explicit event channel with two success events and two
//! failure events, consumed by the responder's state machine.

use tokio::sync::{mpsc, oneshot};

/// Lifecycle event reported by an in-flight render.
///
/// The ready events carry the styles extracted from the render's style
/// cache at the moment the event fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderEvent {
    /// The synchronously-renderable shell is complete.
    ShellReady { styles: String },
    /// Every subtree has resolved.
    AllReady { styles: String },
    /// Fatal failure before the shell completed; no response can be built.
    ShellError { message: String },
    /// Failure inside an already-committed stream; log-only.
    StreamError { message: String },
}

/// One-shot abort switch for an in-flight render.
///
/// Firing it stops the renderer's event loop; chunks emitted so far are
/// flushed and the chunk channel closes. It is a forced flush, not an error.
#[derive(Debug)]
pub struct AbortHandle {
    tx: Option<oneshot::Sender<()>>,
}

impl AbortHandle {
    pub(crate) fn new(tx: oneshot::Sender<()>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Abort the render. Idempotent; a no-op once the render has finished.
    pub fn abort(mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Handle to one in-flight render: its chunk stream, its lifecycle events,
/// and the abort switch. Consumed exactly once by the responder.
#[derive(Debug)]
pub struct RenderHandle {
    /// Rendered markup, in arrival order, arbitrary chunk boundaries.
    pub chunks: mpsc::UnboundedReceiver<Vec<u8>>,
    /// Lifecycle events, in the order the renderer reported them.
    pub events: mpsc::UnboundedReceiver<RenderEvent>,
    /// Abort switch for the timeout path.
    pub abort: AbortHandle,
}

impl RenderHandle {
    /// Build a handle from raw channel ends.
    ///
    /// Exposed so tests (and alternative renderer backends) can drive the
    /// responder without a JS runtime.
    pub fn from_parts(
        chunks: mpsc::UnboundedReceiver<Vec<u8>>,
        events: mpsc::UnboundedReceiver<RenderEvent>,
        abort_tx: oneshot::Sender<()>,
    ) -> Self {
        Self {
            chunks,
            events,
            abort: AbortHandle::new(abort_tx),
        }
    }
}
