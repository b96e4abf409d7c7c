//! Render worker thread management.
//!
//! Each worker runs in a dedicated thread with its own Tokio runtime
//! because `deno_core::JsRuntime` is not `Send`.

use std::sync::Arc;

use inkstream_core::RendererConfig;
use tokio::sync::{mpsc, oneshot};

use crate::{event::RenderEvent, runtime};

/// Job sent to a worker: one streaming render.
pub struct RenderJob {
    /// Serialized render config JSON.
    pub config_json: String,
    /// Sink for rendered markup chunks.
    pub chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
    /// Sink for lifecycle events.
    pub event_tx: mpsc::UnboundedSender<RenderEvent>,
    /// Abort switch wired to the responder's timeout timer.
    pub abort_rx: oneshot::Receiver<()>,
}

/// A dedicated render worker thread.
///
/// Each worker runs a single-threaded Tokio runtime in its own OS thread
/// to host the non-Send JsRuntime. The bounded job channel provides
/// backpressure.
pub struct RenderWorker {
    job_tx: mpsc::Sender<RenderJob>,
}

impl RenderWorker {
    /// Spawn a new worker thread.
    pub fn spawn(bundle_code: Arc<String>, config: Arc<RendererConfig>) -> Self {
        let (job_tx, mut job_rx) = mpsc::channel::<RenderJob>(config.max_pending);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create Tokio runtime for render worker");

            rt.block_on(async move {
                tracing::debug!("render worker started");

                while let Some(job) = job_rx.recv().await {
                    if let Err(e) = runtime::render(
                        &bundle_code,
                        &job.config_json,
                        &config.node_env,
                        job.chunk_tx,
                        job.event_tx,
                        job.abort_rx,
                    )
                    .await
                    {
                        tracing::error!(error = %e, "render failed");
                    }
                }

                tracing::debug!("render worker shutting down");
            });
        });

        Self { job_tx }
    }

    /// Check if the worker has capacity for more jobs.
    pub fn has_capacity(&self) -> bool {
        self.job_tx.capacity() > 0
    }

    /// Get a clone of the sender for submitting jobs.
    pub fn sender(&self) -> mpsc::Sender<RenderJob> {
        self.job_tx.clone()
    }
}
