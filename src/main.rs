//! tlsopt-serve: a minimal server bootstrapped from TLS flags.
//!
//! ```text
//! tlsopt-serve [--tls-cert <path>] [--tls-key <path>] [--tls-ca <path>]
//!              [--config <file>] [--bind <addr>]
//! ```
//!
//! TLS flags (or `TLS_CERT`/`TLS_KEY`/`TLS_CA`) are consumed before clap sees
//! the remaining arguments.

use std::path::PathBuf;

use axum::{routing::get, Router};
use clap::Parser;

use tlsopt::config::{load_config, ListenerOptions};
use tlsopt::lifecycle::shutdown_signal;
use tlsopt::net::Listener;
use tlsopt::observability::logging::init_logging;
use tlsopt::tls;

#[derive(Parser)]
#[command(name = "tlsopt-serve")]
#[command(about = "Serve HTTP or HTTPS depending on TLS options", long_about = None)]
struct Cli {
    /// TOML listener configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let (loaded, args) = tls::read_process(false).await?;
    let cli = Cli::parse_from(args);

    let mut options = match &cli.config {
        Some(path) => load_config(path)?,
        None => ListenerOptions::default(),
    };
    if let Some(bind) = cli.bind {
        options.bind_address = bind;
    }

    let secure = loaded.is_some();
    let router = Router::new().route(
        "/",
        get(move || async move {
            if secure {
                "tlsopt-serve (tls)\n"
            } else {
                "tlsopt-serve (plain)\n"
            }
        }),
    );

    let listener = Listener::from_loaded(options, loaded, router);
    tracing::info!(tls = listener.is_tls(), "tlsopt-serve starting");

    let bound = listener.bind().await?;
    bound.serve(shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
