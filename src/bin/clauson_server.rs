//! Clauson dictionary HTTP server.
//!
//! ```bash
//! CLAUSON_ADMIN_SECRET=... clauson-server --bind-addr 127.0.0.1:8787
//! ```

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clauson_dict::api::{build_router, AppState};
use clauson_dict::config::ServerConfig;
use clauson_dict::database;

#[derive(Parser)]
#[command(name = "clauson-server")]
#[command(version)]
#[command(about = "REST API for the Clauson etymological dictionary")]
struct Cli {
    #[command(flatten)]
    server: ServerConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,clauson_dict=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Cli { server } = Cli::parse();
    server.limits.validate()?;

    if server.admin_secret().is_none() {
        warn!("CLAUSON_ADMIN_SECRET is not set; admin endpoints will answer 503");
    }

    let pool = database::connect(&server.database)
        .await
        .with_context(|| format!("failed to open {}", server.database.database_url))?;
    let state = AppState::new(pool, server.admin_secret(), server.limits);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", server.bind_addr))?;
    info!(addr = %server.bind_addr, "Clauson dictionary API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
