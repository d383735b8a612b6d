mod handlers;
mod state;

use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use hostprobe_core::collector::{
    DEFAULT_PROC_PATH, HostSnapshotAssembler, RealCommandRunner, RealFs, RealHostEnv,
};

use state::SharedSource;

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(
    name = "hostprobe-web",
    about = "Host telemetry JSON endpoint",
    version = hostprobe_core::VERSION
)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080", env = "HOSTPROBE_LISTEN")]
    listen: String,

    /// Time limit for each external command (`sensors`, `df`), in milliseconds.
    #[arg(
        long,
        default_value_t = RealCommandRunner::DEFAULT_TIMEOUT_MS,
        env = "HOSTPROBE_COMMAND_TIMEOUT_MS"
    )]
    command_timeout_ms: u64,
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("hostprobe_web=info,hostprobe_core=info")
            }),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };

    runtime.block_on(async_main(args));
}

async fn async_main(args: Args) {
    info!(version = hostprobe_core::VERSION, "starting hostprobe-web");

    let addr: SocketAddr = match args.listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(listen = %args.listen, error = %e, "invalid listen address");
            process::exit(1);
        }
    };

    let timeout = Duration::from_millis(args.command_timeout_ms);
    let source: SharedSource = Arc::new(HostSnapshotAssembler::new(
        RealFs::new(),
        RealCommandRunner::new(timeout),
        RealHostEnv::new(),
        DEFAULT_PROC_PATH,
    ));

    let app = handlers::router(source);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(%addr, command_timeout_ms = args.command_timeout_ms, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        process::exit(1);
    }

    info!("stopped");
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
