use std::path::PathBuf;

use clap::Parser;

use speedtest_server::config::load_config;
use speedtest_server::http::HttpServer;
use speedtest_server::lifecycle::{signals, Shutdown};
use speedtest_server::net;
use speedtest_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "speedtest-server")]
#[command(about = "HTTP endpoints for download, upload and ping measurements", long_about = None)]
struct Args {
    /// Optional TOML configuration file. `PORT` overrides the port.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability);

    tracing::info!("speedtest-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        tls = config.listener.tls.is_some(),
        download_bytes = config.payload.download_bytes,
        max_upload_bytes = ?config.payload.max_upload_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = net::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
