//! Waypoint mock API server entrypoint.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use waypoint_api::{AppState, create_router};
use waypoint_data::MockDirectory;

#[derive(Parser)]
#[command(name = "waypoint-server")]
#[command(author, version, about = "Waypoint admin mock API server", long_about = None)]
struct Args {
    /// Address to bind.
    #[arg(long, env = "WAYPOINT_ADDR", default_value = "127.0.0.1:4000")]
    addr: String,

    /// Simulated backend latency in milliseconds.
    #[arg(long, env = "WAYPOINT_DELAY_MS", default_value_t = 400)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let directory = Arc::new(MockDirectory::new().with_delay(Duration::from_millis(args.delay_ms)));
    let state = Arc::new(AppState::new(directory.clone(), directory));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    tracing::info!(addr = %args.addr, "waypoint mock API listening");
    axum::serve(listener, router).await?;

    Ok(())
}
