//! quill API server binary.

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use quill_api::{app, AppState};
use quill_core::AppConfig;
use quill_db::Database;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quill_api=debug,quill_db=debug,tower_http=debug,info"));

    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    info!(
        subsystem = "api",
        component = "main",
        host = %config.host,
        port = config.port,
        "Starting quill API server"
    );

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    info!(
        subsystem = "api",
        component = "main",
        "Database connected and migrations applied"
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = AppState::new(db, config);
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        subsystem = "api",
        component = "main",
        addr = %addr,
        "Listening"
    );

    axum::serve(listener, router).await?;
    Ok(())
}
