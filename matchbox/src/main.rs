mod config;
mod engine;
mod error;
mod match_service;
mod metrics;
mod server;
mod store;

use clap::Parser;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sticker trade match service", long_about = None)]
struct Args {
    /// Path of the runtime config file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::try_init().unwrap_or_default();
    let args = Args::parse();
    let config = config::install(config::RuntimeConfig::from_toml(&args.config));

    let mut server = server::Server::builder(config).await?;
    server.start().await?;
    shutdown_signal().await;
    server.stop();
    Ok(())
}
