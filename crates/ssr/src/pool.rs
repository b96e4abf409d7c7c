//! Render worker pool.
//!
//! The pool manages multiple worker threads, distributing renders using
//! round-robin scheduling with backpressure support. Unlike a
//! render-to-string pool, submitting a job returns a [`RenderHandle`]
//! immediately; the render streams through it while the bundle executes.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use inkstream_core::{RenderConfig, RendererConfig};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::{
    error::{RenderError, Result},
    event::{RenderEvent, RenderHandle},
    worker::{RenderJob, RenderWorker},
};

/// Timeout for the active health probe.
const HEALTH_PROBE_TIMEOUT_MS: u64 = 5_000;

/// A pool of render workers.
pub struct RenderPool {
    workers: Vec<RenderWorker>,
    next_worker: AtomicUsize,
    config: Arc<RendererConfig>,
}

impl RenderPool {
    /// Create a new render pool.
    ///
    /// This is an I/O operation that:
    /// - Reads the server bundle from disk
    /// - Spawns worker threads
    pub fn new(config: RendererConfig, bundle_path: &Path) -> Result<Self> {
        let canonical = bundle_path
            .canonicalize()
            .map_err(|e| RenderError::BundleLoad {
                path: bundle_path.display().to_string(),
                reason: e.to_string(),
            })?;

        if canonical.extension() != Some(OsStr::new("js")) {
            return Err(RenderError::BundleLoad {
                path: bundle_path.display().to_string(),
                reason: "Bundle must be a .js file".to_string(),
            });
        }

        let bundle_code =
            std::fs::read_to_string(&canonical).map_err(|e| RenderError::BundleLoad {
                path: canonical.display().to_string(),
                reason: e.to_string(),
            })?;

        let bundle_code = Arc::new(bundle_code);
        let config = Arc::new(config);

        let workers: Vec<_> = (0..config.worker_count)
            .map(|_| RenderWorker::spawn(Arc::clone(&bundle_code), Arc::clone(&config)))
            .collect();

        tracing::info!(
            worker_count = workers.len(),
            bundle_path = %canonical.display(),
            "render pool initialized"
        );

        Ok(Self {
            workers,
            next_worker: AtomicUsize::new(0),
            config,
        })
    }

    /// Submit a streaming render to the pool.
    ///
    /// Uses round-robin scheduling to distribute jobs across workers.
    /// Returns `Overloaded` if no worker has capacity. The returned handle
    /// starts producing chunks and events as soon as the worker picks the
    /// job up.
    pub async fn render_stream(&self, config: RenderConfig) -> Result<RenderHandle> {
        // Check capacity before queueing (backpressure)
        let available = self.workers.iter().filter(|w| w.has_capacity()).count();
        if available == 0 {
            return Err(RenderError::Overloaded {
                retry_after_secs: 5,
            });
        }

        // Serialize config (pure operation from core)
        let config_json = config.to_json().map_err(RenderError::Core)?;

        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (abort_tx, abort_rx) = oneshot::channel();

        // Round-robin worker selection
        let worker_idx = self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len();
        let worker = &self.workers[worker_idx];

        worker
            .sender()
            .send(RenderJob {
                config_json,
                chunk_tx,
                event_tx,
                abort_rx,
            })
            .await
            .map_err(|_| RenderError::ChannelClosed)?;

        Ok(RenderHandle::from_parts(chunk_rx, event_rx, abort_tx))
    }

    /// Get pool statistics (passive - no I/O).
    pub fn stats(&self) -> RenderPoolStats {
        RenderPoolStats {
            worker_count: self.workers.len(),
            workers_with_capacity: self.workers.iter().filter(|w| w.has_capacity()).count(),
        }
    }

    /// Active health check - verifies workers can complete a render.
    ///
    /// Submits a minimal probe render and waits for a ready event.
    /// Returns `Ok(HealthStatus)` with latency if healthy.
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let start = std::time::Instant::now();

        let probe_config = RenderConfig::new(serde_json::json!({
            "probe": true,
            "url": "/__probe",
        }))
        .map_err(RenderError::Core)?;

        let mut handle = self.render_stream(probe_config).await?;

        let probe_timeout = std::time::Duration::from_millis(HEALTH_PROBE_TIMEOUT_MS);
        let outcome = tokio::time::timeout(probe_timeout, async {
            while let Some(event) = handle.events.recv().await {
                match event {
                    RenderEvent::ShellReady { .. } | RenderEvent::AllReady { .. } => {
                        return Ok(());
                    }
                    RenderEvent::ShellError { message } => {
                        return Err(message);
                    }
                    RenderEvent::StreamError { .. } => continue,
                }
            }
            Err("render ended without a ready signal".to_string())
        })
        .await;

        // Stop the probe render; its output is not consumed.
        handle.abort.abort();

        match outcome {
            Ok(Ok(())) => Ok(HealthStatus {
                healthy: true,
                latency_ms: start.elapsed().as_millis() as u64,
                stats: self.stats(),
                error: None,
            }),
            Ok(Err(message)) => Ok(HealthStatus {
                healthy: false,
                latency_ms: start.elapsed().as_millis() as u64,
                stats: self.stats(),
                error: Some(message),
            }),
            Err(_) => Err(RenderError::Timeout(HEALTH_PROBE_TIMEOUT_MS)),
        }
    }

    /// NODE_ENV the pool was configured with.
    pub fn node_env(&self) -> &str {
        &self.config.node_env
    }
}

/// Pool statistics (passive data).
#[derive(Debug, Clone, Serialize)]
pub struct RenderPoolStats {
    pub worker_count: usize,
    pub workers_with_capacity: usize,
}

/// Health check result.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub latency_ms: u64,
    pub stats: RenderPoolStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
