mod app;
mod config;
mod handlers;
mod state;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use inkstream_core::RendererConfig;
use inkstream_ssr::RenderPool;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::create_app, config::Config, state::AppState};

/// inkstream - streaming SSR with CSS-in-JS style extraction
#[derive(Parser, Debug)]
#[command(name = "inkstream")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Path to the server render bundle
    #[arg(long, default_value = "dist/server.js", env = "SERVER_BUNDLE")]
    bundle: PathBuf,

    /// Number of render workers (default: available parallelism)
    #[arg(long, env = "RENDER_WORKERS")]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkstream=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    // Initialize the render pool
    let pool = init_render_pool(&cli)?;

    // Create application state
    let state = AppState::new(&config)?.with_pool(pool);

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Initialize the render worker pool from the CLI-provided bundle path,
/// sizing workers to available parallelism unless overridden.
fn init_render_pool(cli: &Cli) -> Result<RenderPool> {
    let worker_count = cli.workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4)
    });

    let pool_config = RendererConfig::with_defaults(worker_count)?;

    tracing::info!(
        workers = worker_count,
        bundle = %cli.bundle.display(),
        "Initializing render pool"
    );

    Ok(RenderPool::new(pool_config, &cli.bundle)?)
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
