//! Stackable Server Runtime
//!
//! Entry point: CLI args, tracing setup, store + sweeper startup, and
//! the axum serve loop with graceful ctrl-c shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use stackable::config::AppConfig;
use stackable::generator::OpenAiGenerator;
use stackable::payment::FacilitatorClient;
use stackable::server::{build_router, AppState};
use stackable::store::{sweeper::StoreSweeper, SkillStore, SWEEP_INTERVAL};

const VERSION: &str = "0.1.0";

/// Stackable -- paid Claude Code skill builder
#[derive(Parser, Debug)]
#[command(
    name = "stackable",
    version = VERSION,
    about = "Generate, validate, and sell Claude Code skill packages over x402"
)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stackable=info,tower_http=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    info!("Stackable v{} starting", VERSION);
    info!(
        "Payment gate: network={} price={} {} facilitator={}",
        config.network, config.skill_price, config.asset, config.facilitator_url
    );

    let store = Arc::new(SkillStore::new());
    let mut sweeper = StoreSweeper::new(Arc::clone(&store), SWEEP_INTERVAL);
    sweeper.start();

    let generator = Arc::new(OpenAiGenerator::from_config(&config));
    let settlement = Arc::new(FacilitatorClient::new(config.facilitator_url.clone()));

    let state = AppState::new(config, store, generator, settlement);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .context("Invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.stop();
    info!("Stackable stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_err() {
        // If the signal handler cannot be installed, run until killed.
        std::future::pending::<()>().await;
    }
}
